//! The comp-off workflow.

use chrono::{DateTime, Datelike, Days, Utc};
use tracing::{error, info};

use crate::config::{CompOffPolicy, LeaveCodes};
use crate::error::{EngineError, EngineResult};
use crate::ledger::{LedgerPosting, credit};
use crate::models::{CompOffId, CompOffRecord, CompOffRequest, CompOffStatus, Employee, LeaveType};
use crate::store::{Repository, Sequence};
use crate::workflow::{Effect, comp_off_transition};

/// Records a comp-off claim in `PENDING`.
///
/// The claim expires `expiry_days` after it is made and is worth
/// `credit_days` once approved.
///
/// # Errors
///
/// - `NotFound` if the employee does not exist
/// - `MissingReferenceData` if the employee's template has no comp-off type
/// - `Validation` if the worked date is in the future, the reason is blank or
///   the expiry date is out of range
/// - `Conflict` if the employee already claimed the same date
pub fn request_comp_off(
    repo: &mut dyn Repository,
    request: CompOffRequest,
    policy: &CompOffPolicy,
    codes: &LeaveCodes,
    now: DateTime<Utc>,
) -> EngineResult<CompOffRecord> {
    let employee = repo.employee(request.employee_id)?;
    comp_off_type(repo, &employee, codes)?;
    let today = now.date_naive();

    if request.worked_date > today {
        return Err(EngineError::validation(
            "worked_date",
            format!("{} is in the future", request.worked_date),
        ));
    }
    if request.reason.trim().is_empty() {
        return Err(EngineError::validation("reason", "must not be blank"));
    }
    if repo
        .comp_offs_for(employee.id)
        .iter()
        .any(|c| c.worked_date == request.worked_date)
    {
        return Err(EngineError::conflict(format!(
            "comp-off for {} was already claimed by {}",
            request.worked_date, employee.code
        )));
    }

    let expiry_date = u64::try_from(policy.expiry_days)
        .ok()
        .and_then(|days| today.checked_add_days(Days::new(days)))
        .ok_or_else(|| {
            EngineError::validation(
                "expiry_days",
                format!("{} days after {} is out of range", policy.expiry_days, today),
            )
        })?;

    let record = CompOffRecord {
        id: CompOffId(repo.reserve_sequence(Sequence::CompOff)),
        employee_id: employee.id,
        worked_date: request.worked_date,
        reason: request.reason,
        status: CompOffStatus::Pending,
        expiry_date,
        credited_days: policy.credit_days,
        balance_days: policy.credit_days,
        created_at: now,
    };
    repo.insert_comp_off(record.clone())?;

    info!(
        comp_off_id = %record.id,
        employee_id = %record.employee_id,
        worked_date = %record.worked_date,
        expiry_date = %record.expiry_date,
        "comp-off requested"
    );
    Ok(record)
}

/// Activates a pending claim and credits the employee's comp-off balance
/// for the current year.
///
/// # Errors
///
/// - `NotFound` if the claim or employee does not exist
/// - `Conflict` if the claim is not pending
/// - `MissingReferenceData` if the employee's template has no comp-off type
pub fn approve_comp_off(
    repo: &mut dyn Repository,
    id: CompOffId,
    codes: &LeaveCodes,
    now: DateTime<Utc>,
) -> EngineResult<CompOffRecord> {
    let mut record = repo.comp_off(id)?;
    let transition = comp_off_transition(record.status, CompOffStatus::Active)?;

    if transition.triggers(Effect::CreditCompOff) {
        let employee = repo.employee(record.employee_id)?;
        let leave_type = comp_off_type(repo, &employee, codes)?;
        let posting = LedgerPosting {
            employee_id: record.employee_id,
            leave_type: &leave_type,
            year: now.year(),
            amount: record.credited_days,
            reason: format!("Comp-Off Approved: {}", record.reason),
        };
        credit(repo, &posting, now)?;
    }

    record.status = CompOffStatus::Active;
    repo.update_comp_off(record.clone())?;

    info!(
        comp_off_id = %id,
        employee_id = %record.employee_id,
        days = %record.credited_days,
        "comp-off approved"
    );
    Ok(record)
}

fn comp_off_type(
    repo: &dyn Repository,
    employee: &Employee,
    codes: &LeaveCodes,
) -> EngineResult<LeaveType> {
    let found = employee.leave_template_id.and_then(|template_id| {
        repo.leave_types_for_template(template_id)
            .into_iter()
            .find(|lt| lt.code == codes.comp_off)
    });

    found.ok_or_else(|| {
        error!(
            employee_id = %employee.id,
            code = %codes.comp_off,
            "comp-off leave type is not configured"
        );
        EngineError::missing_reference(format!(
            "leave type '{}' is not configured for employee {}",
            codes.comp_off, employee.code
        ))
    })
}
