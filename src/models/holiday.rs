//! Holiday calendar models.
//!
//! This module contains the [`Holiday`] and [`HolidayCalendar`] types used by
//! leave day-counting to exclude non-working dates.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A company holiday.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::Holiday;
/// use chrono::NaiveDate;
///
/// let holiday = Holiday {
///     date: NaiveDate::from_ymd_opt(2026, 1, 26).unwrap(),
///     name: "Republic Day".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
}

/// The set of holiday dates relevant to a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Builds a calendar from a list of holidays.
    pub fn from_holidays<'a>(holidays: impl IntoIterator<Item = &'a Holiday>) -> Self {
        Self {
            dates: holidays.into_iter().map(|h| h.date).collect(),
        }
    }

    /// Checks if a given date is a holiday.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_ledger::models::{Holiday, HolidayCalendar};
    /// use chrono::NaiveDate;
    ///
    /// let holidays = vec![Holiday {
    ///     date: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
    ///     name: "Independence Day".to_string(),
    /// }];
    /// let calendar = HolidayCalendar::from_holidays(&holidays);
    ///
    /// assert!(calendar.is_holiday(NaiveDate::from_ymd_opt(2026, 8, 15).unwrap()));
    /// assert!(!calendar.is_holiday(NaiveDate::from_ymd_opt(2026, 8, 14).unwrap()));
    /// ```
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Returns the number of holidays in the calendar.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the calendar has no holidays.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
