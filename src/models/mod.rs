//! Core data models for the Payroll & Leave Ledger Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod comp_off;
mod employee;
mod holiday;
mod ids;
mod leave;
mod leave_application;
mod payroll;
mod salary;

pub use comp_off::{CompOffRecord, CompOffRequest, CompOffStatus};
pub use employee::{Employee, EmployeeStatus, NewEmployee};
pub use holiday::{Holiday, HolidayCalendar};
pub use ids::{
    CompOffId, EmployeeId, LeaveApplicationId, LeaveTemplateId, LeaveTypeId, PayrollRecordId,
    SalaryHistoryId, TransactionId,
};
pub use leave::{
    BalanceKey, EmployeeLeaveBalance, LeaveTemplate, LeaveTransaction, LeaveType, TransactionKind,
};
pub use leave_application::{LeaveApplication, LeaveRequest, LeaveStatus};
pub use payroll::{
    FailedEmployee, PayrollRecord, PayrollRunSummary, PayrollStatus, PayrollUpdate,
    SkippedEmployee,
};
pub use salary::{
    MAX_COMPONENT_AMOUNT, SalaryComponents, SalaryHistory, SalaryRevision, SalaryStructure,
};
