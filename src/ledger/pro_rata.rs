//! Pro-rata opening credits.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::config::LeaveCodes;
use crate::models::LeaveType;
use crate::rounding::round2;

/// Months of `year` an employee accrues leave for.
///
/// Employees who joined before `year` accrue all twelve months; those who
/// join after it accrue none. Joining in `year` counts from the join month,
/// or from the following month when the join day is after `cutoff_day`.
///
/// # Examples
///
/// ```
/// use payroll_ledger::ledger::remaining_months;
/// use chrono::NaiveDate;
///
/// let joined = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
/// assert_eq!(remaining_months(joined, 2026, 15), 9);
/// assert_eq!(remaining_months(joined, 2027, 15), 12);
/// assert_eq!(remaining_months(joined, 2025, 15), 0);
/// ```
pub fn remaining_months(join_date: NaiveDate, year: i32, cutoff_day: u32) -> u32 {
    if join_date.year() < year {
        return 12;
    }
    if join_date.year() > year {
        return 0;
    }

    let mut start = join_date.month0();
    if join_date.day() > cutoff_day {
        start += 1;
    }
    12u32.saturating_sub(start)
}

/// The opening credit of a leave type for the given number of months.
///
/// Earned leave accrues through payroll and gets nothing up front. Loss of
/// pay and comp-off receive their full quota. Everything else receives
/// `quota / 12 × months`, rounded to two places.
pub fn compute_pro_rata_credit(
    leave_type: &LeaveType,
    remaining_months: u32,
    codes: &LeaveCodes,
) -> Decimal {
    if leave_type.code == codes.earned_leave {
        return Decimal::ZERO;
    }
    if codes.is_full_quota(&leave_type.code) {
        return leave_type.annual_quota;
    }
    round2(leave_type.annual_quota / Decimal::from(12) * Decimal::from(remaining_months))
}
