//! Yearly balance initialisation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::config::{LeaveCodes, LeavePolicy};
use crate::error::EngineResult;
use crate::models::{BalanceKey, Employee, EmployeeLeaveBalance};
use crate::store::Repository;

use super::balance::{LedgerPosting, credit};
use super::pro_rata::{compute_pro_rata_credit, remaining_months};

/// Opens the `year` balance rows of one employee.
///
/// Every leave type of the employee's template without a row for `year` gets
/// one, credited with its pro-rata opening amount when that is positive.
/// Rows that already exist are left alone, so running this twice credits
/// nothing the second time. Employees without a template are skipped.
///
/// Returns the number of rows created.
pub fn initialize_employee_balances(
    repo: &mut dyn Repository,
    employee: &Employee,
    year: i32,
    policy: &LeavePolicy,
    codes: &LeaveCodes,
    now: DateTime<Utc>,
) -> EngineResult<usize> {
    let Some(template_id) = employee.leave_template_id else {
        return Ok(0);
    };

    let months = remaining_months(employee.date_of_joining, year, policy.pro_rata_cutoff_day);
    let mut created = 0;

    for leave_type in repo.leave_types_for_template(template_id) {
        let key = BalanceKey {
            employee_id: employee.id,
            leave_type_id: leave_type.id,
            year,
        };
        if repo.balance(&key).is_some() {
            continue;
        }

        let amount = compute_pro_rata_credit(&leave_type, months, codes);
        if amount > Decimal::ZERO {
            let posting = LedgerPosting {
                employee_id: employee.id,
                leave_type: &leave_type,
                year,
                amount,
                reason: format!("Pro-rata Opening Credit {}", year),
            };
            credit(repo, &posting, now)?;
        } else {
            repo.save_balance(EmployeeLeaveBalance::empty(key));
        }
        created += 1;
    }

    if created > 0 {
        info!(
            employee_id = %employee.id,
            year,
            months,
            rows = created,
            "leave balances initialised"
        );
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeId, EmployeeStatus, LeaveTemplateId, LeaveType, LeaveTypeId};
    use crate::store::{MemoryStore, Store};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .transaction(|repo| {
                for (id, code, quota) in [(1, "CL", "12"), (2, "EL", "15"), (3, "LOP", "0")] {
                    repo.insert_leave_type(LeaveType {
                        id: LeaveTypeId(id),
                        template_id: LeaveTemplateId(1),
                        code: code.to_string(),
                        name: code.to_string(),
                        annual_quota: dec(quota),
                        is_paid: code != "LOP",
                        carry_forward: false,
                    })?;
                }
                Ok(())
            })
            .unwrap();
        store
    }

    fn create_test_employee(template: Option<LeaveTemplateId>) -> Employee {
        Employee {
            id: EmployeeId(1),
            code: "EMP001".to_string(),
            first_name: "Meera".to_string(),
            last_name: "Iyer".to_string(),
            date_of_joining: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
            leave_template_id: template,
            status: EmployeeStatus::Published,
            date_of_leaving: None,
        }
    }

    fn initialize(store: &MemoryStore, employee: &Employee) -> usize {
        store
            .transaction(|repo| {
                initialize_employee_balances(
                    repo,
                    employee,
                    2026,
                    &LeavePolicy::default(),
                    &LeaveCodes::default(),
                    Utc::now(),
                )
            })
            .unwrap()
    }

    #[test]
    fn test_initialise_creates_every_row() {
        let store = create_test_store();
        let employee = create_test_employee(Some(LeaveTemplateId(1)));

        assert_eq!(initialize(&store, &employee), 3);

        let balances = store.read(|repo| repo.balances_for(EmployeeId(1), 2026));
        assert_eq!(balances.len(), 3);
        let cl = balances.iter().find(|b| b.leave_type_id == LeaveTypeId(1)).unwrap();
        assert_eq!(cl.closing, dec("9.00"));
        let el = balances.iter().find(|b| b.leave_type_id == LeaveTypeId(2)).unwrap();
        assert_eq!(el.closing, Decimal::ZERO);

        // Only the positive credit is logged.
        let log = store.read(|repo| repo.transactions_for(EmployeeId(1)));
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].reason, "Pro-rata Opening Credit 2026");
    }

    #[test]
    fn test_initialise_is_idempotent() {
        let store = create_test_store();
        let employee = create_test_employee(Some(LeaveTemplateId(1)));

        initialize(&store, &employee);
        assert_eq!(initialize(&store, &employee), 0);

        let log = store.read(|repo| repo.transactions_for(EmployeeId(1)));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_employee_without_template_is_skipped() {
        let store = create_test_store();
        let employee = create_test_employee(None);
        assert_eq!(initialize(&store, &employee), 0);
    }
}
