//! Employee model and related types.
//!
//! This module defines the Employee struct and EmployeeStatus enum for
//! representing workers whose payroll and leave the engine manages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EmployeeId, LeaveTemplateId};

/// Represents the employment status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    /// Onboarding in progress; not yet eligible for payroll.
    Draft,
    /// Active employee, eligible for payroll and leave accrual.
    Published,
    /// Left voluntarily.
    Resigned,
    /// Employment ended by the company.
    Terminated,
    /// Stopped reporting without notice.
    Absconding,
}

impl EmployeeStatus {
    /// Returns true for the terminal separation statuses.
    pub fn is_separated(self) -> bool {
        matches!(
            self,
            EmployeeStatus::Resigned | EmployeeStatus::Terminated | EmployeeStatus::Absconding
        )
    }
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmployeeStatus::Draft => write!(f, "DRAFT"),
            EmployeeStatus::Published => write!(f, "PUBLISHED"),
            EmployeeStatus::Resigned => write!(f, "RESIGNED"),
            EmployeeStatus::Terminated => write!(f, "TERMINATED"),
            EmployeeStatus::Absconding => write!(f, "ABSCONDING"),
        }
    }
}

/// Represents an employee known to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: EmployeeId,
    /// Unique human-facing code (e.g., "EMP001").
    pub code: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// The date the employee joined.
    pub date_of_joining: NaiveDate,
    /// The leave template governing this employee's entitlements, if assigned.
    pub leave_template_id: Option<LeaveTemplateId>,
    /// Current employment status.
    pub status: EmployeeStatus,
    /// The last working day, set on separation.
    #[serde(default)]
    pub date_of_leaving: Option<NaiveDate>,
}

impl Employee {
    /// Returns the employee's display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true if the employee is eligible for payroll on `cutoff`:
    /// published and joined on or before that date.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_ledger::models::{Employee, EmployeeId, EmployeeStatus};
    /// use chrono::NaiveDate;
    ///
    /// let employee = Employee {
    ///     id: EmployeeId(1),
    ///     code: "EMP001".to_string(),
    ///     first_name: "Asha".to_string(),
    ///     last_name: "Rao".to_string(),
    ///     date_of_joining: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
    ///     leave_template_id: None,
    ///     status: EmployeeStatus::Published,
    ///     date_of_leaving: None,
    /// };
    /// assert!(employee.is_payroll_eligible(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()));
    /// assert!(!employee.is_payroll_eligible(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()));
    /// ```
    pub fn is_payroll_eligible(&self, cutoff: NaiveDate) -> bool {
        self.status == EmployeeStatus::Published && self.date_of_joining <= cutoff
    }
}

/// Input for creating a new employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// The date the employee joins.
    pub date_of_joining: NaiveDate,
    /// The leave template to assign, if any.
    #[serde(default)]
    pub leave_template_id: Option<LeaveTemplateId>,
}
