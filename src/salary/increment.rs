//! Salary assignment and increments.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Employee, EmployeeId, MAX_COMPONENT_AMOUNT, SalaryComponents, SalaryHistory, SalaryHistoryId,
    SalaryRevision, SalaryStructure,
};
use crate::store::{Repository, Sequence};

use super::resolver::{archived_snapshot, salary_snapshot};

/// The result of an increment: the archived row and the new live structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementOutcome {
    /// The structure that was replaced.
    pub history: SalaryHistory,
    /// The structure now in force.
    pub structure: SalaryStructure,
}

fn check_components(components: &SalaryComponents) -> EngineResult<()> {
    if let Some(name) = components.negative_components().first() {
        return Err(EngineError::validation(*name, "must not be negative"));
    }
    if let Some(name) = components.oversized_components().first() {
        return Err(EngineError::validation(
            *name,
            format!("must not exceed {}", MAX_COMPONENT_AMOUNT),
        ));
    }
    Ok(())
}

fn active_employee(repo: &dyn Repository, employee_id: EmployeeId) -> EngineResult<Employee> {
    let employee = repo.employee(employee_id)?;
    if employee.status.is_separated() {
        return Err(EngineError::conflict(format!(
            "employee {} is {} and cannot receive a salary change",
            employee.code, employee.status
        )));
    }
    Ok(employee)
}

fn build_structure(
    employee_id: EmployeeId,
    components: SalaryComponents,
    effective_from: NaiveDate,
) -> SalaryStructure {
    let snapshot = salary_snapshot(&components);
    SalaryStructure {
        employee_id,
        components,
        effective_from,
        effective_to: None,
        ctc_annual: Some(snapshot.ctc_annual),
        net_salary_annual: Some(snapshot.net_salary_annual),
        net_salary_monthly: Some(snapshot.net_salary_monthly),
    }
}

/// Sets the first salary structure of an employee.
///
/// # Errors
///
/// - `NotFound` if the employee does not exist
/// - `Conflict` if the employee is separated or already has a structure
/// - `Validation` if a component is negative or above [`MAX_COMPONENT_AMOUNT`]
pub fn assign_salary(
    repo: &mut dyn Repository,
    employee_id: EmployeeId,
    components: SalaryComponents,
    effective_from: NaiveDate,
) -> EngineResult<SalaryStructure> {
    let employee = active_employee(repo, employee_id)?;
    check_components(&components)?;

    if repo.salary_structure(employee_id).is_some() {
        return Err(EngineError::conflict(format!(
            "employee {} already has a salary structure; use an increment",
            employee.code
        )));
    }

    let structure = build_structure(employee_id, components, effective_from);
    repo.save_salary_structure(structure.clone());

    info!(
        employee_id = %employee_id,
        effective_from = %effective_from,
        "salary structure assigned"
    );
    Ok(structure)
}

/// Archives the live structure and replaces it with a revision.
///
/// The archived row covers `[current.effective_from, revision.effective_from)`
/// and records its totals, recomputing them when the live row lacks them.
/// Both writes belong to the caller's unit.
///
/// # Errors
///
/// - `NotFound` if the employee or the live structure does not exist
/// - `Conflict` if the employee is separated
/// - `Validation` if a component is negative or above
///   [`MAX_COMPONENT_AMOUNT`], or the revision does not start after the live
///   structure
pub fn apply_increment(
    repo: &mut dyn Repository,
    employee_id: EmployeeId,
    revision: SalaryRevision,
) -> EngineResult<IncrementOutcome> {
    active_employee(repo, employee_id)?;
    check_components(&revision.components)?;

    let current = repo
        .salary_structure(employee_id)
        .ok_or_else(|| EngineError::not_found("Salary structure", employee_id))?;

    if revision.effective_from <= current.effective_from {
        return Err(EngineError::validation(
            "effective_from",
            format!(
                "revision must start after the current structure ({})",
                current.effective_from
            ),
        ));
    }

    let snapshot = archived_snapshot(&current);
    let history = SalaryHistory {
        id: SalaryHistoryId(repo.reserve_sequence(Sequence::SalaryHistory)),
        employee_id,
        components: current.components,
        ctc_annual: snapshot.ctc_annual,
        net_salary_annual: snapshot.net_salary_annual,
        net_salary_monthly: snapshot.net_salary_monthly,
        effective_from: current.effective_from,
        effective_to: revision.effective_from,
        reason: revision.archive_reason(),
    };
    repo.insert_salary_history(history.clone())?;

    let structure = build_structure(employee_id, revision.components, revision.effective_from);
    repo.save_salary_structure(structure.clone());

    info!(
        employee_id = %employee_id,
        effective_from = %structure.effective_from,
        reason = %history.reason,
        "salary increment applied"
    );
    Ok(IncrementOutcome { history, structure })
}
