use anyhow::Result;
use chrono::Local;
use std::path::Path;

use rent_recon::{load_ledger, load_statement, write_report, ReconciliationEngine};

// Fixed input locations: this is a one-shot batch tool, no flags
const LEDGER_PATH: &str = "data/rent_ledger.csv";
const STATEMENT_DIR: &str = "data/bank_statement";
const REPORT_DIR: &str = "data";

fn main() -> Result<()> {
    println!("🏠 Garage Rent Reconciliation");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load tenant ledger
    println!("\n📂 Loading tenant ledger...");
    let payments = load_ledger(Path::new(LEDGER_PATH))?;
    println!("✓ Loaded {} expected payments", payments.len());

    // 2. Load bank statement
    println!("\n🏦 Loading bank statement...");
    let (transactions, stats) = load_statement(Path::new(STATEMENT_DIR))?;
    println!(
        "✓ {} pages loaded, {} pages skipped",
        stats.pages_loaded, stats.pages_skipped
    );
    println!(
        "✓ {} transactions recognized, {} rows skipped ({} short, {} no date marker, {} bad date, {} bad amount)",
        stats.rows_parsed,
        stats.rows_skipped(),
        stats.too_few_columns,
        stats.no_date_marker,
        stats.bad_date,
        stats.bad_amount
    );

    // 3. Classify payments
    println!("\n⚖️  Checking payments...");
    let now = Local::now();
    let engine = ReconciliationEngine::new();
    let statuses = engine.reconcile(&payments, &transactions, now.date_naive());

    // 4. Write report
    println!("\n💾 Writing report...");
    let report_path = write_report(&statuses, Path::new(REPORT_DIR), now)?;
    println!("✓ Report saved as: {}", report_path.display());

    // 5. Echo results
    println!("\nResults:");
    for row in &statuses {
        let due_date = row
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<12} {:>10} {:>10.2}  {}",
            row.tenant, due_date, row.amount, row.state
        );
    }

    Ok(())
}
