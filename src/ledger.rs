// 📒 Tenant Ledger - Expected recurring payments
//
// Three meaningful columns, order-dependent: tenant id (text), amount due
// (numeric), due date (date-parseable text). Header row present, discarded.
// Unlike the bank statement, the ledger is the authoritative input: a row
// whose amount cell cannot be read is a fatal load error, not skippable
// noise. Only the due date keeps skip semantics (missing date is a real
// ledger state and classifies as DateMissing downstream).

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::dates::DueDate;

// ============================================================================
// EXPECTED PAYMENT
// ============================================================================

/// ExpectedPayment - One tenant ledger row
///
/// Immutable once loaded; lives for one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedPayment {
    pub tenant: String,
    pub amount: f64,
    pub due_date: Option<DueDate>,
}

// ============================================================================
// LOADER
// ============================================================================

/// Load the tenant ledger
///
/// Column order is fixed: tenant, amount, due date. The amount accepts both
/// a decimal point and a decimal comma (the statement side of the data uses
/// the comma convention). Row order is preserved; the report keeps it.
pub fn load_ledger(path: &Path) -> Result<Vec<ExpectedPayment>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open ledger file: {}", path.display()))?;

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut payments = Vec::new();

    for (line_num, result) in reader.records().enumerate() {
        let record = result.with_context(|| {
            format!("Failed to read ledger row {} in {}", line_num + 2, path.display())
        })?;

        let tenant = record.get(0).unwrap_or("").trim().to_string();

        let amount_text = record.get(1).unwrap_or("").trim().replace(',', ".");
        let amount = amount_text.parse::<f64>().with_context(|| {
            format!(
                "Bad amount {:?} for tenant {:?} (ledger row {})",
                amount_text,
                tenant,
                line_num + 2
            )
        })?;

        let due_date = DueDate::parse(record.get(2).unwrap_or(""));

        payments.push(ExpectedPayment {
            tenant,
            amount,
            due_date,
        });
    }

    Ok(payments)
}

// ============================================================================
// TESTS
// ============================================================================
