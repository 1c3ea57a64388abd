//! Leave reference data and ledger models.
//!
//! [`LeaveTemplate`] and [`LeaveType`] are immutable reference data.
//! [`EmployeeLeaveBalance`] rows and the append-only [`LeaveTransaction`]
//! log make up the ledger proper.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmployeeId, LeaveTemplateId, LeaveTypeId, TransactionId};

/// A named leave policy grouping a set of leave types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTemplate {
    /// Unique identifier for the template.
    pub id: LeaveTemplateId,
    /// Display name (e.g., "Standard Policy 2026").
    pub name: String,
}

/// A kind of leave within a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    /// Unique identifier for the leave type.
    pub id: LeaveTypeId,
    /// The template this type belongs to.
    pub template_id: LeaveTemplateId,
    /// Short code (e.g., "CL", "EL", "SL", "LOP", "CO").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Days granted per year.
    pub annual_quota: Decimal,
    /// Whether the leave is paid; paid leave requires balance.
    pub is_paid: bool,
    /// Whether unused balance carries into the next year.
    pub carry_forward: bool,
}

/// The unique key of a balance row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BalanceKey {
    /// The employee owning the balance.
    pub employee_id: EmployeeId,
    /// The leave type of the balance.
    pub leave_type_id: LeaveTypeId,
    /// The leave year.
    pub year: i32,
}

impl std::fmt::Display for BalanceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "employee {} / leave type {} / {}",
            self.employee_id, self.leave_type_id, self.year
        )
    }
}

/// A per-employee, per-leave-type, per-year balance.
///
/// `closing == opening + credited - used` holds after every ledger mutation;
/// the ledger only ever moves `credited`/`used` together with `closing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeLeaveBalance {
    /// The employee owning the balance.
    pub employee_id: EmployeeId,
    /// The leave type of the balance.
    pub leave_type_id: LeaveTypeId,
    /// The leave year.
    pub year: i32,
    /// Balance brought forward at the start of the year.
    pub opening: Decimal,
    /// Total credited during the year.
    pub credited: Decimal,
    /// Total used during the year.
    pub used: Decimal,
    /// Current available balance.
    pub closing: Decimal,
}

impl EmployeeLeaveBalance {
    /// Creates an empty balance row with a zero opening.
    pub fn empty(key: BalanceKey) -> Self {
        Self {
            employee_id: key.employee_id,
            leave_type_id: key.leave_type_id,
            year: key.year,
            opening: Decimal::ZERO,
            credited: Decimal::ZERO,
            used: Decimal::ZERO,
            closing: Decimal::ZERO,
        }
    }

    /// Returns the unique key of this row.
    pub fn key(&self) -> BalanceKey {
        BalanceKey {
            employee_id: self.employee_id,
            leave_type_id: self.leave_type_id,
            year: self.year,
        }
    }

    /// Returns true if `closing == opening + credited - used`.
    pub fn is_consistent(&self) -> bool {
        self.closing == self.opening + self.credited - self.used
    }
}

/// The direction of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Days added to a balance.
    Credit,
    /// Days taken from a balance.
    Debit,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Credit => write!(f, "CREDIT"),
            TransactionKind::Debit => write!(f, "DEBIT"),
        }
    }
}

/// An append-only ledger row recording one credit or debit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTransaction {
    /// Unique identifier for the transaction.
    pub id: TransactionId,
    /// The employee whose balance moved.
    pub employee_id: EmployeeId,
    /// The leave type whose balance moved.
    pub leave_type_id: LeaveTypeId,
    /// Display copy of the leave type code.
    pub leave_type_code: String,
    /// The balance year the transaction applies to.
    pub year: i32,
    /// Credit or debit.
    pub kind: TransactionKind,
    /// Number of days moved (always positive).
    pub days: Decimal,
    /// Human-readable reason.
    pub reason: String,
    /// When the transaction was recorded.
    pub created_at: DateTime<Utc>,
}

impl LeaveTransaction {
    /// Returns true if this transaction moved the given balance row.
    pub fn applies_to(&self, key: &BalanceKey) -> bool {
        self.employee_id == key.employee_id
            && self.leave_type_id == key.leave_type_id
            && self.year == key.year
    }
}
