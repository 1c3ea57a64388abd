//! Payroll record recalculation and status changes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, PayrollPolicy};
use crate::error::{EngineError, EngineResult};
use crate::ledger::{LedgerPosting, credit};
use crate::models::{
    MAX_COMPONENT_AMOUNT, PayrollRecord, PayrollRecordId, PayrollStatus, PayrollUpdate,
};
use crate::rounding::round2;
use crate::store::Repository;
use crate::workflow::{Effect, payroll_transition};

fn money_amount(field: &str, value: Decimal) -> EngineResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(EngineError::validation(field, "must not be negative"));
    }
    if value > Decimal::from(MAX_COMPONENT_AMOUNT) {
        return Err(EngineError::validation(
            field,
            format!("must not exceed {}", MAX_COMPONENT_AMOUNT),
        ));
    }
    Ok(value)
}

/// Recomputes a record's financial fields with the update applied.
///
/// Fields absent from the update keep their stored values. The LOP daily
/// rate is the base earnings (basic, HRA, DA, TA, special allowance) divided
/// by `lop_divisor`; other allowances and statutory deductions are taken
/// from the record itself.
///
/// # Errors
///
/// `Validation` if LOP days fall outside `0..=total_working_days` or a money
/// field is negative or above [`MAX_COMPONENT_AMOUNT`].
///
/// # Example
///
/// ```
/// # use payroll_ledger::models::*;
/// # use payroll_ledger::config::PayrollPolicy;
/// # use payroll_ledger::payroll::recalculate;
/// # use chrono::NaiveDate;
/// # use rust_decimal::Decimal;
/// # let zero = Decimal::ZERO;
/// # let record = PayrollRecord {
/// #     id: PayrollRecordId(1), employee_id: EmployeeId(1), year: 2026, month: 3,
/// #     payroll_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
/// #     total_working_days: Decimal::from(26), present_days: Decimal::from(26),
/// #     paid_leave_days: zero, unpaid_leave_days: zero, lop_days: zero,
/// #     basic: Decimal::from(30000), hra: zero, da: zero, ta: zero, special_allowance: zero,
/// #     other_allowances: zero, gross_salary: Decimal::from(30000),
/// #     provident_fund: zero, esi: zero, professional_tax: zero, income_tax: zero,
/// #     lop_deduction: zero, other_deductions: zero, total_deductions: zero,
/// #     net_salary: Decimal::from(30000), el_credit: zero,
/// #     status: PayrollStatus::Draft, processed_at: None, paid_at: None,
/// # };
/// let update = PayrollUpdate {
///     lop_days: Some(Decimal::from(2)),
///     ..Default::default()
/// };
/// let recalculated = recalculate(&record, &update, &PayrollPolicy::default()).unwrap();
///
/// // 30000 / 30 per day
/// assert_eq!(recalculated.lop_deduction, Decimal::from(2000));
/// assert_eq!(recalculated.net_salary, Decimal::from(28000));
/// assert_eq!(recalculated.present_days, Decimal::from(24));
/// ```
pub fn recalculate(
    record: &PayrollRecord,
    update: &PayrollUpdate,
    policy: &PayrollPolicy,
) -> EngineResult<PayrollRecord> {
    let lop_days = update.lop_days.unwrap_or(record.lop_days);
    if lop_days < Decimal::ZERO || lop_days > record.total_working_days {
        return Err(EngineError::validation(
            "lop_days",
            format!(
                "{} is outside 0..={}",
                lop_days, record.total_working_days
            ),
        ));
    }
    let other_allowances = money_amount(
        "other_allowances",
        update.other_allowances.unwrap_or(record.other_allowances),
    )?;
    let other_deductions = money_amount(
        "other_deductions",
        update.other_deductions.unwrap_or(record.other_deductions),
    )?;

    let base_earnings = record.base_earnings();
    let daily_rate = base_earnings / policy.lop_divisor;
    let lop_deduction = round2(daily_rate * lop_days);

    let gross_salary = base_earnings + other_allowances;
    let total_deductions = record.statutory_deductions() + lop_deduction + other_deductions;

    Ok(PayrollRecord {
        lop_days,
        present_days: record.total_working_days - lop_days,
        other_allowances,
        other_deductions,
        lop_deduction,
        gross_salary,
        total_deductions,
        net_salary: gross_salary - total_deductions,
        ..record.clone()
    })
}

/// Applies an update to a payroll record.
///
/// Financial changes are recalculated first, then any status change is
/// looked up in the payroll transition table and its effects performed. The
/// first move into PROCESSED credits the record's earned leave; repeating
/// PROCESSED does nothing.
///
/// # Errors
///
/// - `NotFound` if the record does not exist
/// - `Conflict` if financial fields are changed on a non-DRAFT record, or the
///   status change is backwards or skips a step
/// - `Validation` from [`recalculate`]
pub fn update_payroll_record(
    repo: &mut dyn Repository,
    id: PayrollRecordId,
    update: PayrollUpdate,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> EngineResult<PayrollRecord> {
    let stored = repo.payroll_record(id)?;

    let mut record = if update.changes_financials() {
        if stored.status != PayrollStatus::Draft {
            return Err(EngineError::conflict(format!(
                "payroll record {} is {}; only DRAFT records can be edited",
                id, stored.status
            )));
        }
        recalculate(&stored, &update, &config.payroll)?
    } else {
        stored.clone()
    };

    if let Some(target) = update.status {
        let transition = payroll_transition(record.status, target)?;
        for effect in transition.effects() {
            match effect {
                Effect::CreditEarnedLeave => accrue_earned_leave(repo, &record, config, now)?,
                Effect::StampProcessedAt => record.processed_at = Some(now),
                Effect::StampPaidAt => record.paid_at = Some(now),
                Effect::CreditCompOff | Effect::DebitApprovedLeave => {}
            }
        }
        record.status = target;
    }

    if record == stored {
        debug!(payroll_record_id = %id, "payroll update changed nothing");
        return Ok(record);
    }
    repo.update_payroll_record(record.clone())?;

    info!(
        payroll_record_id = %id,
        employee_id = %record.employee_id,
        status = %record.status,
        net_salary = %record.net_salary,
        "payroll record updated"
    );
    Ok(record)
}

fn accrue_earned_leave(
    repo: &mut dyn Repository,
    record: &PayrollRecord,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> EngineResult<()> {
    if record.el_credit <= Decimal::ZERO {
        return Ok(());
    }

    let employee = repo.employee(record.employee_id)?;
    let earned_leave = employee.leave_template_id.and_then(|template_id| {
        repo.leave_types_for_template(template_id)
            .into_iter()
            .find(|lt| lt.code == config.codes.earned_leave)
    });
    let Some(earned_leave) = earned_leave else {
        warn!(
            payroll_record_id = %record.id,
            employee_id = %employee.id,
            "no earned leave type for employee; accrual skipped"
        );
        return Ok(());
    };

    let posting = LedgerPosting {
        employee_id: record.employee_id,
        leave_type: &earned_leave,
        year: record.year,
        amount: record.el_credit,
        reason: format!("Payroll Accrual {}", record.period_label()),
    };
    credit(repo, &posting, now)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{
        BalanceKey, Employee, EmployeeId, EmployeeStatus, LeaveTemplateId, LeaveType,
        LeaveTypeId,
    };
    use crate::store::{MemoryStore, Sequence, Store};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_record(status: PayrollStatus) -> PayrollRecord {
        PayrollRecord {
            id: PayrollRecordId(1),
            employee_id: EmployeeId(1),
            year: 2026,
            month: 3,
            payroll_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            total_working_days: dec("26"),
            present_days: dec("26"),
            paid_leave_days: Decimal::ZERO,
            unpaid_leave_days: Decimal::ZERO,
            lop_days: Decimal::ZERO,
            basic: dec("25000"),
            hra: dec("10000"),
            da: dec("0"),
            ta: dec("1600"),
            special_allowance: dec("3400"),
            other_allowances: dec("0"),
            gross_salary: dec("40000"),
            provident_fund: dec("1800"),
            esi: dec("0"),
            professional_tax: dec("200"),
            income_tax: dec("2000"),
            lop_deduction: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
            total_deductions: dec("4000"),
            net_salary: dec("36000"),
            el_credit: dec("1.25"),
            status,
            processed_at: None,
            paid_at: None,
        }
    }

    fn create_test_store(status: PayrollStatus) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .transaction(|repo| {
                repo.insert_employee(Employee {
                    id: EmployeeId(1),
                    code: "EMP001".to_string(),
                    first_name: "Neha".to_string(),
                    last_name: "Singh".to_string(),
                    date_of_joining: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
                    leave_template_id: Some(LeaveTemplateId(1)),
                    status: EmployeeStatus::Published,
                    date_of_leaving: None,
                })?;
                repo.insert_leave_type(LeaveType {
                    id: LeaveTypeId(7),
                    template_id: LeaveTemplateId(1),
                    code: "EL".to_string(),
                    name: "Earned Leave".to_string(),
                    annual_quota: dec("15"),
                    is_paid: true,
                    carry_forward: true,
                })?;
                repo.reserve_sequence(Sequence::PayrollRecord);
                repo.insert_payroll_record(create_test_record(status))
            })
            .unwrap();
        store
    }

    fn update(store: &MemoryStore, change: PayrollUpdate) -> EngineResult<PayrollRecord> {
        store.transaction(|repo| {
            update_payroll_record(
                repo,
                PayrollRecordId(1),
                change,
                &EngineConfig::default(),
                Utc::now(),
            )
        })
    }

    fn status(target: PayrollStatus) -> PayrollUpdate {
        PayrollUpdate {
            status: Some(target),
            ..Default::default()
        }
    }

    fn el_balance(store: &MemoryStore) -> Option<Decimal> {
        store
            .read(|repo| {
                repo.balance(&BalanceKey {
                    employee_id: EmployeeId(1),
                    leave_type_id: LeaveTypeId(7),
                    year: 2026,
                })
            })
            .map(|b| b.closing)
    }

    // ==========================================================================
    // Recalculation
    // ==========================================================================

    #[test]
    fn test_recalculate_lop_and_bonus() {
        let record = create_test_record(PayrollStatus::Draft);
        let change = PayrollUpdate {
            lop_days: Some(dec("1.5")),
            other_allowances: Some(dec("2500")),
            other_deductions: Some(dec("300")),
            status: None,
        };

        let result = recalculate(&record, &change, &PayrollPolicy::default()).unwrap();

        // 40000 / 30 = 1333.333..., x 1.5 = 2000.00
        assert_eq!(result.lop_deduction, dec("2000.00"));
        assert_eq!(result.gross_salary, dec("42500"));
        assert_eq!(result.total_deductions, dec("6300.00"));
        assert_eq!(result.net_salary, dec("36200.00"));
        assert_eq!(result.present_days, dec("24.5"));
        assert!(result.is_reconciled());
    }

    #[test]
    fn test_recalculate_rounds_lop_deduction() {
        let record = create_test_record(PayrollStatus::Draft);
        let change = PayrollUpdate {
            lop_days: Some(dec("1")),
            ..Default::default()
        };

        let result = recalculate(&record, &change, &PayrollPolicy::default()).unwrap();

        assert_eq!(result.lop_deduction, dec("1333.33"));
        assert_eq!(result.net_salary, dec("34666.67"));
        assert_eq!(result.net_salary, result.gross_salary - result.total_deductions);
    }

    #[test]
    fn test_recalculate_with_no_changes_reproduces_generated_figures() {
        let record = create_test_record(PayrollStatus::Draft);
        let result =
            recalculate(&record, &PayrollUpdate::default(), &PayrollPolicy::default()).unwrap();
        assert_eq!(result, record);
    }

    #[test]
    fn test_recalculate_rejects_out_of_range_lop() {
        let record = create_test_record(PayrollStatus::Draft);
        for lop in ["-1", "26.5"] {
            let change = PayrollUpdate {
                lop_days: Some(dec(lop)),
                ..Default::default()
            };
            let result = recalculate(&record, &change, &PayrollPolicy::default());
            assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn test_recalculate_rejects_negative_bonus() {
        let record = create_test_record(PayrollStatus::Draft);
        let change = PayrollUpdate {
            other_allowances: Some(dec("-100")),
            ..Default::default()
        };
        let result = recalculate(&record, &change, &PayrollPolicy::default());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_recalculate_rejects_oversized_bonus() {
        let record = create_test_record(PayrollStatus::Draft);
        let change = PayrollUpdate {
            other_allowances: Some(Decimal::MAX),
            ..Default::default()
        };
        match recalculate(&record, &change, &PayrollPolicy::default()) {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "other_allowances"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    // ==========================================================================
    // Status changes
    // ==========================================================================

    #[test]
    fn test_publish_credits_earned_leave_once() {
        let store = create_test_store(PayrollStatus::Draft);

        let processed = update(&store, status(PayrollStatus::Processed)).unwrap();
        assert_eq!(processed.status, PayrollStatus::Processed);
        assert!(processed.processed_at.is_some());
        assert_eq!(el_balance(&store), Some(dec("1.25")));

        update(&store, status(PayrollStatus::Processed)).unwrap();
        assert_eq!(el_balance(&store), Some(dec("1.25")));

        let log = store.read(|repo| repo.transactions_for(EmployeeId(1)));
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].reason, "Payroll Accrual 3/2026");
    }

    #[test]
    fn test_financial_edit_after_publish_is_conflict() {
        let store = create_test_store(PayrollStatus::Processed);
        let change = PayrollUpdate {
            lop_days: Some(dec("1")),
            ..Default::default()
        };
        let result = update(&store, change);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_pay_stamps_paid_at() {
        let store = create_test_store(PayrollStatus::Processed);
        let paid = update(&store, status(PayrollStatus::Paid)).unwrap();
        assert_eq!(paid.status, PayrollStatus::Paid);
        assert!(paid.paid_at.is_some());
        assert_eq!(el_balance(&store), None);
    }

    #[test]
    fn test_backwards_transition_is_conflict() {
        let store = create_test_store(PayrollStatus::Paid);
        let result = update(&store, status(PayrollStatus::Draft));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_recalculate_and_publish_in_one_update() {
        let store = create_test_store(PayrollStatus::Draft);
        let change = PayrollUpdate {
            lop_days: Some(dec("1")),
            status: Some(PayrollStatus::Processed),
            ..Default::default()
        };

        let result = update(&store, change).unwrap();
        assert_eq!(result.status, PayrollStatus::Processed);
        assert_eq!(result.lop_deduction, dec("1333.33"));
        assert_eq!(el_balance(&store), Some(dec("1.25")));
    }

    #[test]
    fn test_missing_record_is_not_found() {
        let store = MemoryStore::new();
        let result = update(&store, status(PayrollStatus::Processed));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }
}
