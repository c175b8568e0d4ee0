// 💾 Report Writer - Per-tenant payment-status table
//
// The only place classification results turn into display text. Filenames
// embed the generation timestamp to the minute so repeated runs never
// overwrite each other.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::reconcile::{PaymentState, PaymentStatus};

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentState::DateMissing => write!(f, "Date missing"),
            PaymentState::Received(date) => write!(f, "Received ({})", date),
            PaymentState::NotYetDue => write!(f, "Not yet due"),
            PaymentState::PendingGrace => write!(f, "Pending"),
            PaymentState::Overdue(due) => write!(f, "Overdue (since {})", due),
        }
    }
}

/// Write the payment-status report
///
/// CSV with columns [tenant, due date, amount, status], one row per expected
/// payment in ledger order. Returns the path of the file it created,
/// `rent_report_YYYYMMDD_HHMM.csv` inside `out_dir`.
pub fn write_report(
    statuses: &[PaymentStatus],
    out_dir: &Path,
    generated_at: DateTime<Local>,
) -> Result<PathBuf> {
    let filename = format!("rent_report_{}.csv", generated_at.format("%Y%m%d_%H%M"));
    let path = out_dir.join(filename);

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;

    writer
        .write_record(["tenant", "due date", "amount", "status"])
        .context("Failed to write report header")?;

    for row in statuses {
        let due_date = row
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        let amount = format!("{:.2}", row.amount);
        let status = row.state.to_string();

        writer
            .write_record([row.tenant.as_str(), &due_date, &amount, &status])
            .with_context(|| format!("Failed to write report row for {}", row.tenant))?;
    }

    writer.flush().context("Failed to flush report file")?;

    Ok(path)
}

// ============================================================================
// TESTS
// ============================================================================
