//! Working-day counting for leave requests.
//!
//! This module classifies calendar dates as working days, weekends or
//! holidays and counts the chargeable days in a leave range.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::HolidayCalendar;

/// How a calendar date is treated for leave purposes.
///
/// # Example
///
/// ```
/// use payroll_ledger::leave::{DayKind, classify_day};
/// use payroll_ledger::models::HolidayCalendar;
/// use chrono::NaiveDate;
///
/// // 2026-03-14 is a Saturday
/// let saturday = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
/// assert_eq!(classify_day(saturday, &HolidayCalendar::default()), DayKind::Weekend);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// Monday through Friday, not a holiday. Chargeable.
    Working,
    /// Saturday or Sunday.
    Weekend,
    /// A weekday on the holiday calendar.
    Holiday,
}

impl std::fmt::Display for DayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayKind::Working => write!(f, "Working"),
            DayKind::Weekend => write!(f, "Weekend"),
            DayKind::Holiday => write!(f, "Holiday"),
        }
    }
}

/// Classifies a date. Weekends take precedence over holidays.
pub fn classify_day(date: NaiveDate, calendar: &HolidayCalendar) -> DayKind {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => DayKind::Weekend,
        _ if calendar.is_holiday(date) => DayKind::Holiday,
        _ => DayKind::Working,
    }
}

/// The breakdown of a leave range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDayCount {
    /// Working days in the range.
    pub working_days: u32,
    /// Weekend days in the range.
    pub weekend_days: u32,
    /// Weekday holidays in the range.
    pub holidays: u32,
    /// Chargeable days: working days less the half-day adjustments.
    pub total_days: Decimal,
}

/// Counts the chargeable days in `[from, to]`.
///
/// Each half-day flag subtracts `half_day_value` from the working-day count,
/// whether or not the flagged end falls on a working day. An empty or
/// inverted range counts as zero.
///
/// # Example
///
/// ```
/// use payroll_ledger::leave::count_leave_days;
/// use payroll_ledger::models::HolidayCalendar;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// // Tuesday 10 March to Monday 16 March 2026
/// let count = count_leave_days(
///     NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
///     false,
///     true,
///     &HolidayCalendar::default(),
///     Decimal::new(5, 1),
/// );
/// assert_eq!(count.working_days, 5);
/// assert_eq!(count.weekend_days, 2);
/// assert_eq!(count.total_days, Decimal::new(45, 1));
/// ```
pub fn count_leave_days(
    from: NaiveDate,
    to: NaiveDate,
    half_day_start: bool,
    half_day_end: bool,
    calendar: &HolidayCalendar,
    half_day_value: Decimal,
) -> LeaveDayCount {
    let mut count = LeaveDayCount {
        working_days: 0,
        weekend_days: 0,
        holidays: 0,
        total_days: Decimal::ZERO,
    };

    for date in from.iter_days().take_while(|d| *d <= to) {
        match classify_day(date, calendar) {
            DayKind::Working => count.working_days += 1,
            DayKind::Weekend => count.weekend_days += 1,
            DayKind::Holiday => count.holidays += 1,
        }
    }

    let half_days = u32::from(half_day_start) + u32::from(half_day_end);
    count.total_days =
        Decimal::from(count.working_days) - half_day_value * Decimal::from(half_days);
    count
}
