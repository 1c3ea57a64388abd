//! Balance reconciliation against the transaction log.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BalanceKey, EmployeeLeaveBalance, TransactionKind};
use crate::store::Repository;

/// A balance row compared with the sum of its transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReconciliation {
    /// The balance compared.
    pub key: BalanceKey,
    /// The stored row, if any.
    pub recorded: Option<EmployeeLeaveBalance>,
    /// Sum of CREDIT transactions.
    pub logged_credits: Decimal,
    /// Sum of DEBIT transactions.
    pub logged_debits: Decimal,
    /// Stored closing minus the closing implied by the log.
    pub drift: Decimal,
}

impl BalanceReconciliation {
    /// Returns true if the stored row agrees with its log and with itself.
    pub fn is_balanced(&self) -> bool {
        let row_ok = self.recorded.as_ref().is_none_or(|row| {
            row.is_consistent()
                && row.credited == self.logged_credits
                && row.used == self.logged_debits
        });
        row_ok && self.drift.is_zero()
    }
}

/// Compares a balance row with the transactions recorded against it.
///
/// A missing row is treated as zero throughout, so a log with entries but no
/// row shows up as drift.
pub fn reconcile_balance(repo: &dyn Repository, key: BalanceKey) -> BalanceReconciliation {
    let (logged_credits, logged_debits) = repo
        .transactions_for(key.employee_id)
        .iter()
        .filter(|t| t.applies_to(&key))
        .fold((Decimal::ZERO, Decimal::ZERO), |(credits, debits), t| {
            match t.kind {
                TransactionKind::Credit => (credits + t.days, debits),
                TransactionKind::Debit => (credits, debits + t.days),
            }
        });

    let recorded = repo.balance(&key);
    let (opening, closing) = recorded
        .as_ref()
        .map_or((Decimal::ZERO, Decimal::ZERO), |row| (row.opening, row.closing));

    BalanceReconciliation {
        key,
        recorded,
        logged_credits,
        logged_debits,
        drift: closing - (opening + logged_credits - logged_debits),
    }
}
