//! The leave balance ledger.
//!
//! Balances are keyed by employee, leave type and year. Every change to a
//! balance row is paired with an append-only [`LeaveTransaction`] inside the
//! same unit, so the row can always be rebuilt from its log.
//!
//! [`LeaveTransaction`]: crate::models::LeaveTransaction

mod balance;
mod initialize;
mod pro_rata;
mod reconcile;

pub use balance::{LedgerPosting, credit, debit};
pub use initialize::initialize_employee_balances;
pub use pro_rata::{compute_pro_rata_credit, remaining_months};
pub use reconcile::{BalanceReconciliation, reconcile_balance};
