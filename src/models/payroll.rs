//! Payroll record models.
//!
//! This module contains the [`PayrollRecord`] type, the [`PayrollUpdate`]
//! input accepted by the mutator, and the [`PayrollRunSummary`] produced by
//! a generation run.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EmployeeId, PayrollRecordId};

/// The lifecycle status of a payroll record. Transitions are one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollStatus {
    /// Editable; financial fields may be recalculated.
    Draft,
    /// Published; earned leave has been accrued. Financial fields are locked.
    Processed,
    /// Salary disbursed.
    Paid,
}

impl std::fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayrollStatus::Draft => write!(f, "DRAFT"),
            PayrollStatus::Processed => write!(f, "PROCESSED"),
            PayrollStatus::Paid => write!(f, "PAID"),
        }
    }
}

/// One employee's payroll for one month.
///
/// Earnings and deductions mirror the salary structure as monthly amounts,
/// plus the per-cycle adjustments (LOP, bonus, extra deductions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for the record.
    pub id: PayrollRecordId,
    /// The employee paid.
    pub employee_id: EmployeeId,
    /// Payroll year.
    pub year: i32,
    /// Payroll month (1-12).
    pub month: u32,
    /// The date the record was generated.
    pub payroll_date: NaiveDate,

    /// Working days in the cycle.
    pub total_working_days: Decimal,
    /// Days present (working days less LOP).
    pub present_days: Decimal,
    /// Paid leave days taken in the cycle.
    pub paid_leave_days: Decimal,
    /// Unpaid leave days taken in the cycle.
    pub unpaid_leave_days: Decimal,
    /// Loss-of-pay days.
    pub lop_days: Decimal,

    /// Basic salary.
    pub basic: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Dearness allowance.
    pub da: Decimal,
    /// Travel allowance.
    pub ta: Decimal,
    /// Special allowance.
    pub special_allowance: Decimal,
    /// Other allowances, including any bonus for the cycle.
    pub other_allowances: Decimal,
    /// Total earnings.
    pub gross_salary: Decimal,

    /// Provident fund contribution.
    pub provident_fund: Decimal,
    /// Employee state insurance.
    pub esi: Decimal,
    /// Professional tax.
    pub professional_tax: Decimal,
    /// Income tax withheld.
    pub income_tax: Decimal,
    /// Deduction for loss-of-pay days.
    pub lop_deduction: Decimal,
    /// Other deductions for the cycle.
    pub other_deductions: Decimal,
    /// Total deductions.
    pub total_deductions: Decimal,

    /// Take-home pay: gross less deductions.
    pub net_salary: Decimal,
    /// Earned leave to accrue when the record is processed.
    pub el_credit: Decimal,

    /// Lifecycle status.
    pub status: PayrollStatus,
    /// When the record moved to PROCESSED.
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
    /// When the record moved to PAID.
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl PayrollRecord {
    /// Recurring earnings excluding other allowances; the base of the LOP daily rate.
    pub fn base_earnings(&self) -> Decimal {
        self.basic + self.hra + self.da + self.ta + self.special_allowance
    }

    /// Recurring statutory deductions (PF, ESI, professional tax, income tax).
    pub fn statutory_deductions(&self) -> Decimal {
        self.provident_fund + self.esi + self.professional_tax + self.income_tax
    }

    /// Returns true if `net_salary == gross_salary - total_deductions`.
    pub fn is_reconciled(&self) -> bool {
        self.net_salary == self.gross_salary - self.total_deductions
    }

    /// Returns the cycle label used in ledger reasons, e.g. `"3/2026"`.
    pub fn period_label(&self) -> String {
        format!("{}/{}", self.month, self.year)
    }
}

/// Changes requested on a payroll record. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollUpdate {
    /// New loss-of-pay days.
    #[serde(default)]
    pub lop_days: Option<Decimal>,
    /// New other allowances (bonus).
    #[serde(default)]
    pub other_allowances: Option<Decimal>,
    /// New other deductions.
    #[serde(default)]
    pub other_deductions: Option<Decimal>,
    /// Requested status.
    #[serde(default)]
    pub status: Option<PayrollStatus>,
}

impl PayrollUpdate {
    /// Returns true if the update touches any financial field.
    pub fn changes_financials(&self) -> bool {
        self.lop_days.is_some() || self.other_allowances.is_some() || self.other_deductions.is_some()
    }
}

/// An employee left out of a payroll run without error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEmployee {
    /// The employee skipped.
    pub employee_id: EmployeeId,
    /// The employee's code.
    pub employee_code: String,
    /// Why the employee was skipped.
    pub reason: String,
}

/// An employee whose payroll could not be generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedEmployee {
    /// The employee that failed.
    pub employee_id: EmployeeId,
    /// The employee's code.
    pub employee_code: String,
    /// The error message.
    pub error: String,
}

/// The outcome of a payroll generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunSummary {
    /// Correlation id of the run.
    pub run_id: Uuid,
    /// Payroll month.
    pub month: u32,
    /// Payroll year.
    pub year: i32,
    /// Eligible employees considered.
    pub total: usize,
    /// Records created by this run.
    pub created: Vec<PayrollRecordId>,
    /// Records that already existed for the period.
    pub existing: Vec<PayrollRecordId>,
    /// Employees skipped (e.g. no salary configured).
    pub skipped: Vec<SkippedEmployee>,
    /// Employees whose generation failed.
    pub failed: Vec<FailedEmployee>,
}

impl PayrollRunSummary {
    /// Number of records created.
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    /// Number of records that already existed.
    pub fn existing_count(&self) -> usize {
        self.existing.len()
    }

    /// Number of employees skipped.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Number of employees that failed.
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}
