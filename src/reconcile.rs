// ⚖️ Reconciliation Engine - Classify each tenant's payment state
//
// For each expected payment: normalize the due date, search the statement
// for a matching amount posted on or before today, classify. The engine is
// pure: `today` is an explicit parameter, never read from the clock here,
// so every classification is deterministic and testable.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ledger::ExpectedPayment;
use crate::statement::Transaction;

/// Tolerance for amount comparisons
///
/// Amounts come out of text parsing and carry floating-point noise; exact
/// equality here is a correctness bug. 1500.00 must match 1500.0000001 and
/// must not match 1500.02.
pub const AMOUNT_TOLERANCE: f64 = 0.01;

/// Days after the due date before a payment counts as overdue
pub const GRACE_DAYS: i64 = 3;

// ============================================================================
// PAYMENT STATE
// ============================================================================

/// PaymentState - Classification outcome for one expected payment
///
/// A tagged variant, not a display string: presentation formatting lives at
/// the report boundary (see `report.rs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentState {
    /// Due date absent or unparseable; short-circuits everything else
    DateMissing,
    /// A matching deposit exists; carries the latest matching date ≤ today
    Received(NaiveDate),
    /// Today is strictly before the due date
    NotYetDue,
    /// Inside the grace window: due date ≤ today ≤ due date + 3 days
    PendingGrace,
    /// Past the grace window; carries the (adjusted) due date
    Overdue(NaiveDate),
}

/// PaymentStatus - One output row, derived from one ExpectedPayment
///
/// `due_date` is the ADJUSTED due date (the one the classification used),
/// which is also what the report shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub tenant: String,
    pub due_date: Option<NaiveDate>,
    pub amount: f64,
    pub state: PaymentState,
}

// ============================================================================
// RECONCILIATION ENGINE
// ============================================================================

pub struct ReconciliationEngine {
    /// Tolerance for amount comparisons (default: 0.01)
    pub tolerance: f64,

    /// Grace window length in days (default: 3)
    pub grace_days: i64,
}

impl ReconciliationEngine {
    pub fn new() -> Self {
        ReconciliationEngine {
            tolerance: AMOUNT_TOLERANCE,
            grace_days: GRACE_DAYS,
        }
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        ReconciliationEngine {
            tolerance,
            grace_days: GRACE_DAYS,
        }
    }

    /// Classify every expected payment against the transaction list
    ///
    /// One output per input payment, same order. Inputs are never mutated.
    pub fn reconcile(
        &self,
        payments: &[ExpectedPayment],
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> Vec<PaymentStatus> {
        payments
            .iter()
            .map(|payment| {
                let due_date = payment.due_date.and_then(|d| d.adjust());
                let state = self.classify(payment.amount, due_date, transactions, today);

                PaymentStatus {
                    tenant: payment.tenant.clone(),
                    due_date,
                    amount: payment.amount,
                    state,
                }
            })
            .collect()
    }

    fn classify(
        &self,
        amount: f64,
        due_date: Option<NaiveDate>,
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> PaymentState {
        let Some(due_date) = due_date else {
            return PaymentState::DateMissing;
        };

        // A transaction dated after today never counts, even on an exact
        // amount match: pre-dated or erroneous future entries must not mark
        // a payment as received early.
        let received = transactions
            .iter()
            .filter(|tx| self.amounts_match(tx.amount, amount) && tx.date <= today)
            .map(|tx| tx.date)
            .max();

        if let Some(paid_on) = received {
            // Several deposits can match the same amount; the most recent
            // one on or before today is reported as "the" receipt.
            return PaymentState::Received(paid_on);
        }

        if today < due_date {
            PaymentState::NotYetDue
        } else if today <= due_date + Duration::days(self.grace_days) {
            // Inclusive on both ends: the due date itself is already grace,
            // never NotYetDue
            PaymentState::PendingGrace
        } else {
            PaymentState::Overdue(due_date)
        }
    }

    fn amounts_match(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.tolerance
    }
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
