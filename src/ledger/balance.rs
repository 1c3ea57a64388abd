//! Credit and debit operations on balance rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    BalanceKey, EmployeeId, EmployeeLeaveBalance, LeaveTransaction, LeaveType, TransactionId,
    TransactionKind,
};
use crate::store::{Repository, Sequence};

/// One movement of days into or out of a balance row.
#[derive(Debug, Clone)]
pub struct LedgerPosting<'a> {
    /// The employee whose balance moves.
    pub employee_id: EmployeeId,
    /// The leave type of the balance.
    pub leave_type: &'a LeaveType,
    /// The balance year.
    pub year: i32,
    /// Days moved; must be positive.
    pub amount: Decimal,
    /// Recorded on the transaction.
    pub reason: String,
}

impl LedgerPosting<'_> {
    fn key(&self) -> BalanceKey {
        BalanceKey {
            employee_id: self.employee_id,
            leave_type_id: self.leave_type.id,
            year: self.year,
        }
    }

    fn check_amount(&self) -> EngineResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(EngineError::validation(
                "amount",
                format!("ledger postings must be positive, got {}", self.amount),
            ));
        }
        Ok(())
    }

    fn record(
        &self,
        repo: &mut dyn Repository,
        kind: TransactionKind,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        let id = TransactionId(repo.reserve_sequence(Sequence::LeaveTransaction));
        repo.append_transaction(LeaveTransaction {
            id,
            employee_id: self.employee_id,
            leave_type_id: self.leave_type.id,
            leave_type_code: self.leave_type.code.clone(),
            year: self.year,
            kind,
            days: self.amount,
            reason: self.reason.clone(),
            created_at: now,
        })
    }
}

/// Adds days to a balance row, creating it with a zero opening if needed.
///
/// Credits are not deduplicated; callers guard against double accrual.
///
/// # Errors
///
/// `Validation` if the amount is not positive.
pub fn credit(
    repo: &mut dyn Repository,
    posting: &LedgerPosting<'_>,
    now: DateTime<Utc>,
) -> EngineResult<EmployeeLeaveBalance> {
    posting.check_amount()?;

    let key = posting.key();
    let mut balance = repo
        .balance(&key)
        .unwrap_or_else(|| EmployeeLeaveBalance::empty(key));
    balance.credited += posting.amount;
    balance.closing += posting.amount;
    repo.save_balance(balance.clone());
    posting.record(repo, TransactionKind::Credit, now)?;

    debug!(
        balance = %key,
        leave_type = %posting.leave_type.code,
        days = %posting.amount,
        closing = %balance.closing,
        "leave credited"
    );
    Ok(balance)
}

/// Removes days from an existing balance row.
///
/// The closing balance may go negative; sufficiency is checked when the
/// application is submitted.
///
/// # Errors
///
/// - `Validation` if the amount is not positive
/// - `InsufficientBalance` with zero available if the row does not exist
pub fn debit(
    repo: &mut dyn Repository,
    posting: &LedgerPosting<'_>,
    now: DateTime<Utc>,
) -> EngineResult<EmployeeLeaveBalance> {
    posting.check_amount()?;

    let key = posting.key();
    let mut balance = repo
        .balance(&key)
        .ok_or(EngineError::InsufficientBalance {
            required: posting.amount,
            available: Decimal::ZERO,
        })?;
    balance.used += posting.amount;
    balance.closing -= posting.amount;
    repo.save_balance(balance.clone());
    posting.record(repo, TransactionKind::Debit, now)?;

    debug!(
        balance = %key,
        leave_type = %posting.leave_type.code,
        days = %posting.amount,
        closing = %balance.closing,
        "leave debited"
    );
    Ok(balance)
}
