//! Employee lifecycle: creation, publishing and separation.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::EmployeeCodeFormat;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, EmployeeId, EmployeeStatus, NewEmployee};
use crate::store::{Repository, Sequence};

/// Creates a DRAFT employee with the next employee code.
///
/// The code is taken from the `EmployeeCode` sequence inside the caller's
/// unit, so two concurrent creations never share a code.
///
/// # Errors
///
/// - `Validation` if a name is blank
/// - `NotFound` if the leave template does not exist
pub fn create_employee(
    repo: &mut dyn Repository,
    new: NewEmployee,
    code_format: &EmployeeCodeFormat,
) -> EngineResult<Employee> {
    if new.first_name.trim().is_empty() {
        return Err(EngineError::validation("first_name", "must not be blank"));
    }
    if new.last_name.trim().is_empty() {
        return Err(EngineError::validation("last_name", "must not be blank"));
    }
    if let Some(template_id) = new.leave_template_id {
        repo.leave_template(template_id)?;
    }

    let employee = Employee {
        id: EmployeeId(repo.reserve_sequence(Sequence::EmployeeId)),
        code: code_format.format(repo.reserve_sequence(Sequence::EmployeeCode)),
        first_name: new.first_name,
        last_name: new.last_name,
        date_of_joining: new.date_of_joining,
        leave_template_id: new.leave_template_id,
        status: EmployeeStatus::Draft,
        date_of_leaving: None,
    };
    repo.insert_employee(employee.clone())?;

    info!(
        employee_id = %employee.id,
        employee_code = %employee.code,
        "employee created"
    );
    Ok(employee)
}

/// Moves a DRAFT employee to PUBLISHED. Publishing twice is a no-op.
///
/// # Errors
///
/// - `NotFound` if the employee does not exist
/// - `Conflict` if the employee is separated
pub fn publish_employee(repo: &mut dyn Repository, id: EmployeeId) -> EngineResult<Employee> {
    let mut employee = repo.employee(id)?;

    match employee.status {
        EmployeeStatus::Published => {
            debug!(employee_id = %id, "employee already published");
            return Ok(employee);
        }
        status if status.is_separated() => {
            return Err(EngineError::conflict(format!(
                "employee {} is {} and cannot be published",
                employee.code, status
            )));
        }
        _ => {}
    }

    employee.status = EmployeeStatus::Published;
    repo.update_employee(employee.clone())?;

    info!(employee_id = %id, employee_code = %employee.code, "employee published");
    Ok(employee)
}

/// Separates an employee with a RESIGNED, TERMINATED or ABSCONDING status.
///
/// # Errors
///
/// - `Validation` if `status` is not a separation status
/// - `NotFound` if the employee does not exist
/// - `Conflict` if the employee is already separated
pub fn separate_employee(
    repo: &mut dyn Repository,
    id: EmployeeId,
    status: EmployeeStatus,
    date_of_leaving: NaiveDate,
) -> EngineResult<Employee> {
    if !status.is_separated() {
        return Err(EngineError::validation(
            "status",
            format!("{} is not a separation status", status),
        ));
    }

    let mut employee = repo.employee(id)?;
    if employee.status.is_separated() {
        return Err(EngineError::conflict(format!(
            "employee {} is already {}",
            employee.code, employee.status
        )));
    }

    employee.status = status;
    employee.date_of_leaving = Some(date_of_leaving);
    repo.update_employee(employee.clone())?;

    info!(
        employee_id = %id,
        employee_code = %employee.code,
        status = %status,
        date_of_leaving = %date_of_leaving,
        "employee separated"
    );
    Ok(employee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::LeaveTemplateId;
    use crate::store::{MemoryStore, Store};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_employee(first: &str) -> NewEmployee {
        NewEmployee {
            first_name: first.to_string(),
            last_name: "Menon".to_string(),
            date_of_joining: date(2026, 1, 5),
            leave_template_id: None,
        }
    }

    fn create(store: &MemoryStore, new: NewEmployee) -> EngineResult<Employee> {
        store.transaction(|repo| create_employee(repo, new, &EmployeeCodeFormat::default()))
    }

    #[test]
    fn test_create_assigns_sequential_codes() {
        let store = MemoryStore::new();
        let first = create(&store, new_employee("Arjun")).unwrap();
        let second = create(&store, new_employee("Divya")).unwrap();

        assert_eq!(first.code, "EMP001");
        assert_eq!(second.code, "EMP002");
        assert_eq!(first.status, EmployeeStatus::Draft);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_failed_create_does_not_consume_code() {
        let store = MemoryStore::new();
        let mut bad = new_employee("Arjun");
        bad.leave_template_id = Some(LeaveTemplateId(99));

        let result = create(&store, bad);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);

        let employee = create(&store, new_employee("Divya")).unwrap();
        assert_eq!(employee.code, "EMP001");
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let store = MemoryStore::new();
        let result = create(&store, new_employee("  "));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_publish_is_idempotent() {
        let store = MemoryStore::new();
        let employee = create(&store, new_employee("Arjun")).unwrap();

        let published = store.transaction(|repo| publish_employee(repo, employee.id)).unwrap();
        assert_eq!(published.status, EmployeeStatus::Published);

        let again = store.transaction(|repo| publish_employee(repo, employee.id)).unwrap();
        assert_eq!(again.status, EmployeeStatus::Published);
    }

    #[test]
    fn test_separate_sets_leaving_date() {
        let store = MemoryStore::new();
        let employee = create(&store, new_employee("Arjun")).unwrap();

        let separated = store
            .transaction(|repo| {
                separate_employee(repo, employee.id, EmployeeStatus::Resigned, date(2026, 6, 30))
            })
            .unwrap();
        assert_eq!(separated.status, EmployeeStatus::Resigned);
        assert_eq!(separated.date_of_leaving, Some(date(2026, 6, 30)));
    }

    #[test]
    fn test_separate_twice_is_conflict() {
        let store = MemoryStore::new();
        let employee = create(&store, new_employee("Arjun")).unwrap();
        store
            .transaction(|repo| {
                separate_employee(repo, employee.id, EmployeeStatus::Terminated, date(2026, 2, 1))
            })
            .unwrap();

        let result = store.transaction(|repo| {
            separate_employee(repo, employee.id, EmployeeStatus::Resigned, date(2026, 3, 1))
        });
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Conflict);

        let result = store.transaction(|repo| publish_employee(repo, employee.id));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_separate_to_non_separation_status_is_validation_error() {
        let store = MemoryStore::new();
        let employee = create(&store, new_employee("Arjun")).unwrap();
        let result = store.transaction(|repo| {
            separate_employee(repo, employee.id, EmployeeStatus::Published, date(2026, 3, 1))
        });
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
    }
}
