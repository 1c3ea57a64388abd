//! Comp-off ("worked on a day off") records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CompOffId, EmployeeId};

/// The workflow status of a comp-off claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompOffStatus {
    /// Claimed by the employee, awaiting HR approval.
    Pending,
    /// Approved; the day has been credited to the CO balance.
    Active,
}

impl std::fmt::Display for CompOffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompOffStatus::Pending => write!(f, "PENDING"),
            CompOffStatus::Active => write!(f, "ACTIVE"),
        }
    }
}

/// One comp-off claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompOffRecord {
    /// Unique identifier for the claim.
    pub id: CompOffId,
    /// The claiming employee.
    pub employee_id: EmployeeId,
    /// The day off that was worked.
    pub worked_date: NaiveDate,
    /// Why the day was worked.
    pub reason: String,
    /// Current workflow status.
    pub status: CompOffStatus,
    /// The last day the earned comp-off may be used.
    pub expiry_date: NaiveDate,
    /// Days credited on approval.
    pub credited_days: Decimal,
    /// Days of this claim still unused.
    pub balance_days: Decimal,
    /// When the claim was made.
    pub created_at: DateTime<Utc>,
}

/// Input for claiming a comp-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompOffRequest {
    /// The claiming employee.
    pub employee_id: EmployeeId,
    /// The day off that was worked.
    pub worked_date: NaiveDate,
    /// Why the day was worked.
    pub reason: String,
}
