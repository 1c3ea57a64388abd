//! Status transition tables.
//!
//! Each workflow declares its legal `(from, to)` moves and the side effects
//! the move triggers. Operations look the move up, fail with `Conflict` when
//! it is not listed, and then perform the listed effects in the same unit.

use std::fmt::Display;

use crate::error::{EngineError, EngineResult};
use crate::models::{CompOffStatus, LeaveStatus, PayrollStatus};

/// A side effect attached to a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Credit the payroll record's earned leave into the ledger.
    CreditEarnedLeave,
    /// Credit the claim's days into the comp-off balance.
    CreditCompOff,
    /// Debit the application's days from its leave balance.
    DebitApprovedLeave,
    /// Record when the payroll record was processed.
    StampProcessedAt,
    /// Record when the payroll record was paid.
    StampPaidAt,
}

/// The outcome of looking up a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The requested status equals the current one; nothing happens.
    Unchanged,
    /// The move is legal and triggers these effects.
    Apply(&'static [Effect]),
}

type Table<S> = &'static [(S, S, &'static [Effect])];

const PAYROLL_TRANSITIONS: Table<PayrollStatus> = &[
    (
        PayrollStatus::Draft,
        PayrollStatus::Processed,
        &[Effect::CreditEarnedLeave, Effect::StampProcessedAt],
    ),
    (
        PayrollStatus::Processed,
        PayrollStatus::Paid,
        &[Effect::StampPaidAt],
    ),
];

const LEAVE_TRANSITIONS: Table<LeaveStatus> = &[
    (LeaveStatus::Pending, LeaveStatus::L1Approved, &[]),
    (LeaveStatus::L1Approved, LeaveStatus::L2Approved, &[]),
    (
        LeaveStatus::Pending,
        LeaveStatus::Approved,
        &[Effect::DebitApprovedLeave],
    ),
    (
        LeaveStatus::L1Approved,
        LeaveStatus::Approved,
        &[Effect::DebitApprovedLeave],
    ),
    (
        LeaveStatus::L2Approved,
        LeaveStatus::Approved,
        &[Effect::DebitApprovedLeave],
    ),
    (LeaveStatus::Pending, LeaveStatus::Rejected, &[]),
    (LeaveStatus::L1Approved, LeaveStatus::Rejected, &[]),
    (LeaveStatus::L2Approved, LeaveStatus::Rejected, &[]),
];

const COMP_OFF_TRANSITIONS: Table<CompOffStatus> = &[(
    CompOffStatus::Pending,
    CompOffStatus::Active,
    &[Effect::CreditCompOff],
)];

fn lookup<S: Copy + PartialEq + Display>(
    table: Table<S>,
    entity: &str,
    from: S,
    to: S,
) -> EngineResult<&'static [Effect]> {
    table
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, effects)| *effects)
        .ok_or_else(|| {
            EngineError::conflict(format!(
                "{} cannot move from {} to {}",
                entity, from, to
            ))
        })
}

/// Looks up a payroll status change. Repeating the current status is a no-op.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::PayrollStatus;
/// use payroll_ledger::workflow::{Effect, Transition, payroll_transition};
///
/// let publish = payroll_transition(PayrollStatus::Draft, PayrollStatus::Processed).unwrap();
/// assert_eq!(
///     publish,
///     Transition::Apply(&[Effect::CreditEarnedLeave, Effect::StampProcessedAt])
/// );
///
/// let again = payroll_transition(PayrollStatus::Processed, PayrollStatus::Processed).unwrap();
/// assert_eq!(again, Transition::Unchanged);
///
/// assert!(payroll_transition(PayrollStatus::Paid, PayrollStatus::Draft).is_err());
/// ```
pub fn payroll_transition(from: PayrollStatus, to: PayrollStatus) -> EngineResult<Transition> {
    if from == to {
        return Ok(Transition::Unchanged);
    }
    lookup(PAYROLL_TRANSITIONS, "payroll record", from, to).map(Transition::Apply)
}

/// Looks up a leave application status change.
///
/// Repeating the current status is a conflict.
pub fn leave_transition(from: LeaveStatus, to: LeaveStatus) -> EngineResult<Transition> {
    lookup(LEAVE_TRANSITIONS, "leave application", from, to).map(Transition::Apply)
}

/// Looks up a comp-off status change.
pub fn comp_off_transition(from: CompOffStatus, to: CompOffStatus) -> EngineResult<Transition> {
    lookup(COMP_OFF_TRANSITIONS, "comp-off", from, to).map(Transition::Apply)
}

impl Transition {
    /// The effects to perform; empty when unchanged.
    pub fn effects(&self) -> &'static [Effect] {
        match self {
            Transition::Unchanged => &[],
            Transition::Apply(effects) => *effects,
        }
    }

    /// Returns true if the transition triggers `effect`.
    pub fn triggers(&self, effect: Effect) -> bool {
        self.effects().contains(&effect)
    }
}
