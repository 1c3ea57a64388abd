//! The leave application workflow.
//!
//! Submission validates the request in a fixed order: date range, working
//! day count, overlap with other live applications, then balance
//! sufficiency for paid leave. Approval debits the ledger in the same unit
//! that flips the status.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::{LeavePolicy, MissingBalancePolicy};
use crate::error::{EngineError, EngineResult};
use crate::ledger::{LedgerPosting, debit};
use crate::models::{
    BalanceKey, HolidayCalendar, LeaveApplication, LeaveApplicationId, LeaveRequest, LeaveStatus,
};
use crate::store::{Repository, Sequence};
use crate::workflow::{Effect, leave_transition};

use super::day_count::count_leave_days;

/// Validates and records a new leave application in `PENDING`.
///
/// # Errors
///
/// - `NotFound` if the employee or leave type does not exist
/// - `Conflict` if the employee is separated
/// - `Validation` if the range is inverted, the reason is blank, or no
///   chargeable day remains after excluding weekends, holidays and half days
/// - `LeaveOverlap` if a pending, stage-approved or approved application of
///   the employee intersects the range
/// - `InsufficientBalance` if the leave is paid and the closing balance for
///   the year of `from_date` is below the requested days
pub fn submit_leave(
    repo: &mut dyn Repository,
    request: LeaveRequest,
    policy: &LeavePolicy,
    now: DateTime<Utc>,
) -> EngineResult<LeaveApplication> {
    let employee = repo.employee(request.employee_id)?;
    let leave_type = repo.leave_type(request.leave_type_id)?;

    if employee.status.is_separated() {
        return Err(EngineError::conflict(format!(
            "employee {} is {} and cannot apply for leave",
            employee.code, employee.status
        )));
    }
    if request.reason.trim().is_empty() {
        return Err(EngineError::validation("reason", "must not be blank"));
    }
    if request.from_date > request.to_date {
        return Err(EngineError::validation(
            "to_date",
            format!(
                "{} is before the start date {}",
                request.to_date, request.from_date
            ),
        ));
    }

    let holidays = repo.holidays_between(request.from_date, request.to_date);
    let count = count_leave_days(
        request.from_date,
        request.to_date,
        request.half_day_start,
        request.half_day_end,
        &HolidayCalendar::from_holidays(&holidays),
        policy.half_day_value,
    );
    if count.total_days <= Decimal::ZERO {
        return Err(EngineError::validation(
            "total_days",
            "all dates are holidays/weekends",
        ));
    }

    let overlapping = repo
        .leave_applications_for(request.employee_id)
        .into_iter()
        .find(|a| a.status.occupies_dates() && a.overlaps(request.from_date, request.to_date));
    if let Some(existing) = overlapping {
        return Err(EngineError::LeaveOverlap {
            existing_id: existing.id.0,
            from: existing.from_date,
            to: existing.to_date,
        });
    }

    if leave_type.is_paid {
        let key = BalanceKey {
            employee_id: request.employee_id,
            leave_type_id: leave_type.id,
            year: request.from_date.year(),
        };
        let available = repo
            .balance(&key)
            .map_or(Decimal::ZERO, |balance| balance.closing);
        if available < count.total_days {
            return Err(EngineError::InsufficientBalance {
                required: count.total_days,
                available,
            });
        }
    }

    let application = LeaveApplication {
        id: LeaveApplicationId(repo.reserve_sequence(Sequence::LeaveApplication)),
        employee_id: request.employee_id,
        leave_type_id: leave_type.id,
        from_date: request.from_date,
        to_date: request.to_date,
        half_day_start: request.half_day_start,
        half_day_end: request.half_day_end,
        total_days: count.total_days,
        reason: request.reason,
        contact_during_leave: request.contact_during_leave,
        status: LeaveStatus::Pending,
        created_at: now,
    };
    repo.insert_leave_application(application.clone())?;

    info!(
        application_id = %application.id,
        employee_id = %application.employee_id,
        leave_type = %leave_type.code,
        from = %application.from_date,
        to = %application.to_date,
        days = %application.total_days,
        "leave application submitted"
    );
    Ok(application)
}

/// Moves an application to `APPROVED`, debiting its days.
///
/// The debit targets the balance for the year of `from_date`. When that row
/// does not exist the configured [`MissingBalancePolicy`] decides between
/// approving without a ledger entry and failing the whole unit.
///
/// # Errors
///
/// - `NotFound` if the application does not exist
/// - `Conflict` if the application is already approved or rejected
/// - `InsufficientBalance` if the balance row is missing and the policy is
///   [`MissingBalancePolicy::Reject`]
pub fn approve_leave(
    repo: &mut dyn Repository,
    id: LeaveApplicationId,
    policy: &LeavePolicy,
    now: DateTime<Utc>,
) -> EngineResult<LeaveApplication> {
    transition(repo, id, LeaveStatus::Approved, policy, now)
}

/// Moves an application to `REJECTED`. No ledger effect.
pub fn reject_leave(
    repo: &mut dyn Repository,
    id: LeaveApplicationId,
    policy: &LeavePolicy,
    now: DateTime<Utc>,
) -> EngineResult<LeaveApplication> {
    transition(repo, id, LeaveStatus::Rejected, policy, now)
}

/// Records an intermediate approval (`L1_APPROVED` or `L2_APPROVED`).
///
/// # Errors
///
/// `Validation` if `stage` is not an intermediate status, `Conflict` if the
/// application cannot reach it from where it is.
pub fn record_stage_approval(
    repo: &mut dyn Repository,
    id: LeaveApplicationId,
    stage: LeaveStatus,
    policy: &LeavePolicy,
    now: DateTime<Utc>,
) -> EngineResult<LeaveApplication> {
    if !matches!(stage, LeaveStatus::L1Approved | LeaveStatus::L2Approved) {
        return Err(EngineError::validation(
            "stage",
            format!("{} is not an approval stage", stage),
        ));
    }
    transition(repo, id, stage, policy, now)
}

fn transition(
    repo: &mut dyn Repository,
    id: LeaveApplicationId,
    to: LeaveStatus,
    policy: &LeavePolicy,
    now: DateTime<Utc>,
) -> EngineResult<LeaveApplication> {
    let mut application = repo.leave_application(id)?;
    let from = application.status;
    let transition = leave_transition(from, to)?;

    for effect in transition.effects() {
        if *effect == Effect::DebitApprovedLeave {
            debit_approved(repo, &application, policy, now)?;
        }
    }

    application.status = to;
    repo.update_leave_application(application.clone())?;

    info!(
        application_id = %id,
        employee_id = %application.employee_id,
        from = %from,
        to = %to,
        "leave application status changed"
    );
    Ok(application)
}

fn debit_approved(
    repo: &mut dyn Repository,
    application: &LeaveApplication,
    policy: &LeavePolicy,
    now: DateTime<Utc>,
) -> EngineResult<()> {
    let leave_type = repo.leave_type(application.leave_type_id)?;
    let key = BalanceKey {
        employee_id: application.employee_id,
        leave_type_id: leave_type.id,
        year: application.from_date.year(),
    };

    if repo.balance(&key).is_none() {
        return match policy.missing_balance {
            MissingBalancePolicy::Warn => {
                warn!(
                    application_id = %application.id,
                    balance = %key,
                    days = %application.total_days,
                    "no balance row to debit; approving without a ledger entry"
                );
                Ok(())
            }
            MissingBalancePolicy::Reject => Err(EngineError::InsufficientBalance {
                required: application.total_days,
                available: Decimal::ZERO,
            }),
        };
    }

    let posting = LedgerPosting {
        employee_id: application.employee_id,
        leave_type: &leave_type,
        year: key.year,
        amount: application.total_days,
        reason: format!("Leave Approved (#{})", application.id),
    };
    debit(repo, &posting, now)?;
    Ok(())
}
