//! Payroll run generation.
//!
//! A run creates one DRAFT record per eligible employee for a month. Each
//! employee is generated in its own unit, so one failure is recorded in the
//! summary without undoing the records already created.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Employee, EmployeeId, EmployeeStatus, FailedEmployee, PayrollRecord, PayrollRecordId,
    PayrollRunSummary, PayrollStatus, SkippedEmployee,
};
use crate::rounding::round2;
use crate::salary::resolve_salary;
use crate::store::{Repository, Sequence, Store};

/// What happened to one employee in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// A new DRAFT record was created.
    Created(PayrollRecordId),
    /// A record for the period already existed and was left untouched.
    Existing(PayrollRecordId),
    /// No record was created, for the given reason.
    Skipped(String),
}

/// Returns the last calendar day of a payroll month.
///
/// # Errors
///
/// `Validation` if the month is outside 1..=12 or the year is out of range.
///
/// # Example
///
/// ```
/// use payroll_ledger::payroll::last_day_of_month;
/// use chrono::NaiveDate;
///
/// assert_eq!(last_day_of_month(2, 2028).unwrap(), NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
/// assert_eq!(last_day_of_month(12, 2026).unwrap(), NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
/// assert!(last_day_of_month(13, 2026).is_err());
/// ```
pub fn last_day_of_month(month: u32, year: i32) -> EngineResult<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::validation(
            "month",
            format!("{} is not between 1 and 12", month),
        ));
    }
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .ok_or_else(|| EngineError::validation("year", format!("{} is out of range", year)))
}

/// Earned leave accrued per processed payroll: the template's EL quota / 12.
fn earned_leave_credit(
    repo: &dyn Repository,
    employee: &Employee,
    config: &EngineConfig,
) -> Decimal {
    employee
        .leave_template_id
        .and_then(|template_id| {
            repo.leave_types_for_template(template_id)
                .into_iter()
                .find(|lt| lt.code == config.codes.earned_leave)
        })
        .map_or(Decimal::ZERO, |el| round2(el.annual_quota / Decimal::from(12)))
}

/// Creates the DRAFT record of one employee for `(month, year)`.
///
/// The employee is re-read inside the unit, so one who was separated after
/// the run started is skipped rather than paid.
pub fn generate_for_employee(
    repo: &mut dyn Repository,
    employee_id: EmployeeId,
    month: u32,
    year: i32,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> EngineResult<GenerationOutcome> {
    let period_end = last_day_of_month(month, year)?;
    let employee = repo.employee(employee_id)?;

    if let Some(existing) = repo.payroll_record_for(employee_id, year, month) {
        return Ok(GenerationOutcome::Existing(existing.id));
    }
    if !employee.is_payroll_eligible(period_end) {
        return Ok(GenerationOutcome::Skipped(format!(
            "employee is {} with joining date {}",
            employee.status, employee.date_of_joining
        )));
    }
    let Some(structure) = repo.salary_structure(employee_id) else {
        return Ok(GenerationOutcome::Skipped(
            "no salary structure configured".to_string(),
        ));
    };

    let components = &structure.components;
    let amount = |value: Option<Decimal>| value.unwrap_or(Decimal::ZERO);
    let breakdown = resolve_salary(components);
    let working_days = config.payroll.total_working_days;

    let record = PayrollRecord {
        id: PayrollRecordId(repo.reserve_sequence(Sequence::PayrollRecord)),
        employee_id,
        year,
        month,
        payroll_date: now.date_naive(),
        total_working_days: working_days,
        present_days: working_days,
        paid_leave_days: Decimal::ZERO,
        unpaid_leave_days: Decimal::ZERO,
        lop_days: Decimal::ZERO,
        basic: amount(components.basic),
        hra: amount(components.hra),
        da: amount(components.da),
        ta: amount(components.ta),
        special_allowance: amount(components.special_allowance),
        other_allowances: amount(components.other_allowances),
        gross_salary: breakdown.gross,
        provident_fund: amount(components.provident_fund),
        esi: amount(components.esi),
        professional_tax: amount(components.professional_tax),
        income_tax: amount(components.income_tax),
        lop_deduction: Decimal::ZERO,
        other_deductions: amount(components.other_deductions),
        total_deductions: breakdown.total_deductions,
        net_salary: breakdown.net,
        el_credit: earned_leave_credit(repo, &employee, config),
        status: PayrollStatus::Draft,
        processed_at: None,
        paid_at: None,
    };
    repo.insert_payroll_record(record.clone())?;

    Ok(GenerationOutcome::Created(record.id))
}

/// Generates DRAFT payroll for every eligible employee for `(month, year)`.
///
/// Eligible employees are PUBLISHED and joined on or before the last day of
/// the month. Running the same period twice creates nothing new.
///
/// # Errors
///
/// Only an invalid period fails the run; per-employee errors are collected
/// in [`PayrollRunSummary::failed`].
pub fn generate_payroll_run<S: Store>(
    store: &S,
    month: u32,
    year: i32,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> EngineResult<PayrollRunSummary> {
    let period_end = last_day_of_month(month, year)?;
    let run_id = Uuid::new_v4();

    let eligible: Vec<Employee> = store.read(|repo| {
        repo.employees_with_status(EmployeeStatus::Published)
            .into_iter()
            .filter(|e| e.is_payroll_eligible(period_end))
            .collect()
    });

    info!(
        run_id = %run_id,
        month,
        year,
        eligible = eligible.len(),
        "payroll run started"
    );

    let mut summary = PayrollRunSummary {
        run_id,
        month,
        year,
        total: eligible.len(),
        created: Vec::new(),
        existing: Vec::new(),
        skipped: Vec::new(),
        failed: Vec::new(),
    };

    for employee in eligible {
        let outcome = store.transaction(|repo| {
            generate_for_employee(repo, employee.id, month, year, config, now)
        });

        match outcome {
            Ok(GenerationOutcome::Created(id)) => summary.created.push(id),
            Ok(GenerationOutcome::Existing(id)) => summary.existing.push(id),
            Ok(GenerationOutcome::Skipped(reason)) => {
                warn!(
                    run_id = %run_id,
                    employee_id = %employee.id,
                    employee_code = %employee.code,
                    %reason,
                    "employee skipped"
                );
                summary.skipped.push(SkippedEmployee {
                    employee_id: employee.id,
                    employee_code: employee.code,
                    reason,
                });
            }
            Err(e) => {
                error!(
                    run_id = %run_id,
                    employee_id = %employee.id,
                    employee_code = %employee.code,
                    error = %e,
                    "payroll generation failed"
                );
                summary.failed.push(FailedEmployee {
                    employee_id: employee.id,
                    employee_code: employee.code,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        run_id = %run_id,
        created = summary.created_count(),
        existing = summary.existing_count(),
        skipped = summary.skipped_count(),
        failed = summary.failed_count(),
        "payroll run finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{
        LeaveTemplateId, LeaveType, LeaveTypeId, SalaryComponents, SalaryStructure,
    };
    use crate::store::MemoryStore;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> DateTime<Utc> {
        date(2026, 3, 31).and_hms_opt(18, 0, 0).unwrap().and_utc()
    }

    fn create_test_employee(id: u64, status: EmployeeStatus, joined: NaiveDate) -> Employee {
        Employee {
            id: EmployeeId(id),
            code: format!("EMP{:03}", id),
            first_name: "Test".to_string(),
            last_name: format!("Employee {}", id),
            date_of_joining: joined,
            leave_template_id: Some(LeaveTemplateId(1)),
            status,
            date_of_leaving: None,
        }
    }

    fn create_test_structure(id: u64) -> SalaryStructure {
        SalaryStructure {
            employee_id: EmployeeId(id),
            components: SalaryComponents {
                basic: Some(dec("30000")),
                hra: Some(dec("12000")),
                special_allowance: Some(dec("3000")),
                other_allowances: Some(dec("500")),
                provident_fund: Some(dec("1800")),
                professional_tax: Some(dec("200")),
                income_tax: Some(dec("3000")),
                ..Default::default()
            },
            effective_from: date(2025, 1, 1),
            effective_to: None,
            ctc_annual: None,
            net_salary_annual: None,
            net_salary_monthly: None,
        }
    }

    /// Employees:
    /// 1 published with salary, 2 published without salary,
    /// 3 draft with salary, 4 published joining in April.
    fn create_test_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .transaction(|repo| {
                repo.insert_leave_type(LeaveType {
                    id: LeaveTypeId(1),
                    template_id: LeaveTemplateId(1),
                    code: "EL".to_string(),
                    name: "Earned Leave".to_string(),
                    annual_quota: dec("15"),
                    is_paid: true,
                    carry_forward: true,
                })?;
                let employees = [
                    (1, EmployeeStatus::Published, date(2025, 1, 1)),
                    (2, EmployeeStatus::Published, date(2025, 1, 1)),
                    (3, EmployeeStatus::Draft, date(2025, 1, 1)),
                    (4, EmployeeStatus::Published, date(2026, 4, 1)),
                ];
                for (id, status, joined) in employees {
                    repo.insert_employee(create_test_employee(id, status, joined))?;
                }
                repo.save_salary_structure(create_test_structure(1));
                repo.save_salary_structure(create_test_structure(3));
                repo.save_salary_structure(create_test_structure(4));
                Ok(())
            })
            .unwrap();
        store
    }

    #[test]
    fn test_run_creates_records_for_eligible_employees() {
        let store = create_test_store();
        let summary =
            generate_payroll_run(&store, 3, 2026, &EngineConfig::default(), now()).unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.created_count(), 1);
        assert_eq!(summary.skipped_count(), 1);
        assert_eq!(summary.skipped[0].employee_code, "EMP002");
        assert_eq!(summary.failed_count(), 0);

        let record = store
            .read(|repo| repo.payroll_record_for(EmployeeId(1), 2026, 3))
            .unwrap();
        assert_eq!(record.status, PayrollStatus::Draft);
        assert_eq!(record.gross_salary, dec("45500"));
        assert_eq!(record.total_deductions, dec("5000"));
        assert_eq!(record.net_salary, dec("40500"));
        assert_eq!(record.el_credit, dec("1.25"));
        assert_eq!(record.total_working_days, dec("26"));
        assert_eq!(record.present_days, dec("26"));
        assert!(record.is_reconciled());
    }

    #[test]
    fn test_second_run_creates_nothing() {
        let store = create_test_store();
        let config = EngineConfig::default();
        generate_payroll_run(&store, 3, 2026, &config, now()).unwrap();

        let summary = generate_payroll_run(&store, 3, 2026, &config, now()).unwrap();
        assert_eq!(summary.created_count(), 0);
        assert_eq!(summary.existing_count(), 1);
        assert_eq!(store.read(|repo| repo.payroll_records_for_period(2026, 3)).len(), 1);
    }

    #[test]
    fn test_invalid_month_is_validation_error() {
        let store = create_test_store();
        for month in [0, 13] {
            let result =
                generate_payroll_run(&store, month, 2026, &EngineConfig::default(), now());
            assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn test_employee_joining_next_month_is_included_then() {
        let store = create_test_store();
        let summary =
            generate_payroll_run(&store, 4, 2026, &EngineConfig::default(), now()).unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.created_count(), 2);
    }

    #[test]
    fn test_template_without_earned_leave_accrues_nothing() {
        let store = create_test_store();
        store
            .transaction(|repo| {
                let mut employee = repo.employee(EmployeeId(1))?;
                employee.leave_template_id = None;
                repo.update_employee(employee)
            })
            .unwrap();

        generate_payroll_run(&store, 3, 2026, &EngineConfig::default(), now()).unwrap();
        let record = store
            .read(|repo| repo.payroll_record_for(EmployeeId(1), 2026, 3))
            .unwrap();
        assert_eq!(record.el_credit, Decimal::ZERO);
    }
}
