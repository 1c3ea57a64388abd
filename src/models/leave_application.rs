//! Leave application model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmployeeId, LeaveApplicationId, LeaveTypeId};

/// The workflow status of a leave application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    /// Submitted, awaiting a decision.
    Pending,
    /// Approved by the first-level approver.
    L1Approved,
    /// Approved by the second-level approver.
    L2Approved,
    /// Finally approved; balance has been debited.
    Approved,
    /// Rejected; no balance effect.
    Rejected,
}

impl LeaveStatus {
    /// Returns true for statuses no transition may leave.
    pub fn is_terminal(self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Rejected)
    }

    /// Returns true if an application in this status occupies its dates
    /// for overlap purposes.
    pub fn occupies_dates(self) -> bool {
        !matches!(self, LeaveStatus::Rejected)
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "PENDING"),
            LeaveStatus::L1Approved => write!(f, "L1_APPROVED"),
            LeaveStatus::L2Approved => write!(f, "L2_APPROVED"),
            LeaveStatus::Approved => write!(f, "APPROVED"),
            LeaveStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// One employee leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// Unique identifier for the application.
    pub id: LeaveApplicationId,
    /// The requesting employee.
    pub employee_id: EmployeeId,
    /// The leave type requested.
    pub leave_type_id: LeaveTypeId,
    /// First day of leave (inclusive).
    pub from_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub to_date: NaiveDate,
    /// Whether the first day is a half day.
    pub half_day_start: bool,
    /// Whether the last day is a half day.
    pub half_day_end: bool,
    /// Working days requested, computed by the engine.
    pub total_days: Decimal,
    /// Why leave is requested.
    pub reason: String,
    /// How to reach the employee while away.
    #[serde(default)]
    pub contact_during_leave: Option<String>,
    /// Current workflow status.
    pub status: LeaveStatus,
    /// When the application was submitted.
    pub created_at: DateTime<Utc>,
}

impl LeaveApplication {
    /// Returns true if this application's range intersects `[from, to]`.
    ///
    /// Matches when this application starts inside the range, ends inside
    /// the range, or fully contains it.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_ledger::models::{
    ///     EmployeeId, LeaveApplication, LeaveApplicationId, LeaveStatus, LeaveTypeId,
    /// };
    /// use chrono::{NaiveDate, Utc};
    /// use rust_decimal::Decimal;
    ///
    /// let existing = LeaveApplication {
    ///     id: LeaveApplicationId(1),
    ///     employee_id: EmployeeId(1),
    ///     leave_type_id: LeaveTypeId(1),
    ///     from_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
    ///     to_date: NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
    ///     half_day_start: false,
    ///     half_day_end: false,
    ///     total_days: Decimal::new(3, 0),
    ///     reason: "Family event".to_string(),
    ///     contact_during_leave: None,
    ///     status: LeaveStatus::Approved,
    ///     created_at: Utc::now(),
    /// };
    ///
    /// let from = NaiveDate::from_ymd_opt(2026, 3, 12).unwrap();
    /// let to = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
    /// assert!(existing.overlaps(from, to));
    /// ```
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        let starts_inside = self.from_date >= from && self.from_date <= to;
        let ends_inside = self.to_date >= from && self.to_date <= to;
        let contains = self.from_date <= from && self.to_date >= to;
        starts_inside || ends_inside || contains
    }
}

/// Input for submitting a leave application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// The requesting employee.
    pub employee_id: EmployeeId,
    /// The leave type requested.
    pub leave_type_id: LeaveTypeId,
    /// First day of leave (inclusive).
    pub from_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub to_date: NaiveDate,
    /// Whether the first day is a half day.
    #[serde(default)]
    pub half_day_start: bool,
    /// Whether the last day is a half day.
    #[serde(default)]
    pub half_day_end: bool,
    /// Why leave is requested.
    pub reason: String,
    /// How to reach the employee while away.
    #[serde(default)]
    pub contact_during_leave: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn application(from: NaiveDate, to: NaiveDate) -> LeaveApplication {
        LeaveApplication {
            id: LeaveApplicationId(1),
            employee_id: EmployeeId(1),
            leave_type_id: LeaveTypeId(1),
            from_date: from,
            to_date: to,
            half_day_start: false,
            half_day_end: false,
            total_days: Decimal::ONE,
            reason: "Personal".to_string(),
            contact_during_leave: None,
            status: LeaveStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_overlap_when_existing_starts_inside() {
        let existing = application(date(2026, 3, 12), date(2026, 3, 20));
        assert!(existing.overlaps(date(2026, 3, 10), date(2026, 3, 13)));
    }

    #[test]
    fn test_overlap_when_existing_ends_inside() {
        let existing = application(date(2026, 3, 1), date(2026, 3, 10));
        assert!(existing.overlaps(date(2026, 3, 10), date(2026, 3, 13)));
    }

    #[test]
    fn test_overlap_when_existing_contains_range() {
        let existing = application(date(2026, 3, 1), date(2026, 3, 31));
        assert!(existing.overlaps(date(2026, 3, 10), date(2026, 3, 13)));
    }

    #[test]
    fn test_no_overlap_for_adjacent_ranges() {
        let existing = application(date(2026, 3, 10), date(2026, 3, 12));
        assert!(!existing.overlaps(date(2026, 3, 13), date(2026, 3, 14)));
        assert!(!existing.overlaps(date(2026, 3, 5), date(2026, 3, 9)));
    }

    #[test]
    fn test_status_serialization_uses_stage_names() {
        assert_eq!(
            serde_json::to_string(&LeaveStatus::L1Approved).unwrap(),
            "\"L1_APPROVED\""
        );
        let status: LeaveStatus = serde_json::from_str("\"L2_APPROVED\"").unwrap();
        assert_eq!(status, LeaveStatus::L2Approved);
    }

    #[test]
    fn test_in_flight_statuses_occupy_dates() {
        assert!(LeaveStatus::Pending.occupies_dates());
        assert!(LeaveStatus::L1Approved.occupies_dates());
        assert!(LeaveStatus::L2Approved.occupies_dates());
        assert!(LeaveStatus::Approved.occupies_dates());
        assert!(!LeaveStatus::Rejected.occupies_dates());
    }

    #[test]
    fn test_request_half_day_flags_default_to_false() {
        let json = r#"{
            "employee_id": 1,
            "leave_type_id": 2,
            "from_date": "2026-03-10",
            "to_date": "2026-03-12",
            "reason": "Trip"
        }"#;
        let request: LeaveRequest = serde_json::from_str(json).unwrap();
        assert!(!request.half_day_start);
        assert!(!request.half_day_end);
        assert_eq!(request.contact_during_leave, None);
    }
}
