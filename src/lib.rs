// Garage Rent Reconciliation - Core Library
// Exposes all modules for use in the CLI and tests

pub mod dates;
pub mod ledger;
pub mod reconcile;
pub mod report;
pub mod statement;

// Re-export commonly used types
pub use dates::{last_day_of_month, DueDate};
pub use ledger::{load_ledger, ExpectedPayment};
pub use reconcile::{
    PaymentState, PaymentStatus, ReconciliationEngine, AMOUNT_TOLERANCE, GRACE_DAYS,
};
pub use report::write_report;
pub use statement::{
    load_statement, parse_statement_row, SkipReason, StatementStats, Transaction, MAX_PAGES,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
