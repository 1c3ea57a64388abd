//! Persistence seam for the engine.
//!
//! Operations are written against [`Repository`], a synchronous typed view of
//! every table the engine touches. A [`Store`] hands out that view inside an
//! atomic unit: all writes made by the unit become visible together, or none
//! do if the unit returns an error.
//!
//! [`MemoryStore`] is the bundled implementation.

mod memory;
mod seed;

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::{
    BalanceKey, CompOffId, CompOffRecord, Employee, EmployeeId, EmployeeLeaveBalance,
    EmployeeStatus, Holiday, LeaveApplication, LeaveApplicationId, LeaveTemplate,
    LeaveTemplateId, LeaveTransaction, LeaveType, LeaveTypeId, PayrollRecord, PayrollRecordId,
    SalaryHistory, SalaryStructure,
};

pub use memory::MemoryStore;
pub use seed::{SeedReport, seed_reference_data};

/// Named counters handed out by [`Repository::reserve_sequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sequence {
    /// Employee ids.
    EmployeeId,
    /// The numeric part of employee codes.
    EmployeeCode,
    /// Leave template ids.
    LeaveTemplate,
    /// Leave type ids.
    LeaveType,
    /// Leave application ids.
    LeaveApplication,
    /// Comp-off claim ids.
    CompOff,
    /// Payroll record ids.
    PayrollRecord,
    /// Ledger transaction ids.
    LeaveTransaction,
    /// Salary history ids.
    SalaryHistory,
}

/// Typed access to the engine's tables.
///
/// Lookups by primary key return `NotFound` when absent; lookups by a
/// secondary key return `Option`. Inserts fail with `Conflict` on a
/// duplicate key, updates with `NotFound` when the row does not exist.
pub trait Repository {
    /// Returns the next value of a sequence, starting at 1.
    fn reserve_sequence(&mut self, sequence: Sequence) -> u64;

    // Employees

    /// Fetches an employee.
    fn employee(&self, id: EmployeeId) -> EngineResult<Employee>;
    /// All employees with the given status, ordered by id.
    fn employees_with_status(&self, status: EmployeeStatus) -> Vec<Employee>;
    /// Inserts an employee; the id and the code must both be unused.
    fn insert_employee(&mut self, employee: Employee) -> EngineResult<()>;
    /// Replaces an existing employee.
    fn update_employee(&mut self, employee: Employee) -> EngineResult<()>;

    // Salary

    /// The live salary structure of an employee.
    fn salary_structure(&self, employee_id: EmployeeId) -> Option<SalaryStructure>;
    /// Inserts or replaces the live salary structure of an employee.
    fn save_salary_structure(&mut self, structure: SalaryStructure);
    /// Appends an archived salary structure.
    fn insert_salary_history(&mut self, history: SalaryHistory) -> EngineResult<()>;
    /// Archived structures of an employee, oldest first.
    fn salary_history(&self, employee_id: EmployeeId) -> Vec<SalaryHistory>;

    // Reference data

    /// Fetches a leave template.
    fn leave_template(&self, id: LeaveTemplateId) -> EngineResult<LeaveTemplate>;
    /// Finds a leave template by name.
    fn leave_template_by_name(&self, name: &str) -> Option<LeaveTemplate>;
    /// Inserts a leave template.
    fn insert_leave_template(&mut self, template: LeaveTemplate) -> EngineResult<()>;
    /// Fetches a leave type.
    fn leave_type(&self, id: LeaveTypeId) -> EngineResult<LeaveType>;
    /// Leave types of a template, ordered by id.
    fn leave_types_for_template(&self, template_id: LeaveTemplateId) -> Vec<LeaveType>;
    /// Inserts a leave type; the code must be unused within its template.
    fn insert_leave_type(&mut self, leave_type: LeaveType) -> EngineResult<()>;
    /// Adds a holiday; a second holiday on the same date replaces the first.
    fn insert_holiday(&mut self, holiday: Holiday);
    /// Holidays in `[from, to]`, ordered by date.
    fn holidays_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<Holiday>;

    // Leave ledger

    /// Fetches a balance row.
    fn balance(&self, key: &BalanceKey) -> Option<EmployeeLeaveBalance>;
    /// Inserts or replaces a balance row.
    fn save_balance(&mut self, balance: EmployeeLeaveBalance);
    /// Balance rows of an employee for a year, ordered by leave type.
    fn balances_for(&self, employee_id: EmployeeId, year: i32) -> Vec<EmployeeLeaveBalance>;
    /// Appends a ledger transaction. Transactions are never updated.
    fn append_transaction(&mut self, transaction: LeaveTransaction) -> EngineResult<()>;
    /// Ledger transactions of an employee, oldest first.
    fn transactions_for(&self, employee_id: EmployeeId) -> Vec<LeaveTransaction>;

    // Leave applications

    /// Fetches a leave application.
    fn leave_application(&self, id: LeaveApplicationId) -> EngineResult<LeaveApplication>;
    /// Inserts a leave application.
    fn insert_leave_application(&mut self, application: LeaveApplication) -> EngineResult<()>;
    /// Replaces an existing leave application.
    fn update_leave_application(&mut self, application: LeaveApplication) -> EngineResult<()>;
    /// Leave applications of an employee, ordered by id.
    fn leave_applications_for(&self, employee_id: EmployeeId) -> Vec<LeaveApplication>;

    // Comp-off

    /// Fetches a comp-off claim.
    fn comp_off(&self, id: CompOffId) -> EngineResult<CompOffRecord>;
    /// Inserts a comp-off claim.
    fn insert_comp_off(&mut self, record: CompOffRecord) -> EngineResult<()>;
    /// Replaces an existing comp-off claim.
    fn update_comp_off(&mut self, record: CompOffRecord) -> EngineResult<()>;
    /// Comp-off claims of an employee, ordered by id.
    fn comp_offs_for(&self, employee_id: EmployeeId) -> Vec<CompOffRecord>;

    // Payroll

    /// Fetches a payroll record.
    fn payroll_record(&self, id: PayrollRecordId) -> EngineResult<PayrollRecord>;
    /// Finds the record for an employee and period.
    fn payroll_record_for(
        &self,
        employee_id: EmployeeId,
        year: i32,
        month: u32,
    ) -> Option<PayrollRecord>;
    /// Inserts a payroll record; `(employee, year, month)` must be unused.
    fn insert_payroll_record(&mut self, record: PayrollRecord) -> EngineResult<()>;
    /// Replaces an existing payroll record.
    fn update_payroll_record(&mut self, record: PayrollRecord) -> EngineResult<()>;
    /// Records of a period, ordered by id.
    fn payroll_records_for_period(&self, year: i32, month: u32) -> Vec<PayrollRecord>;
}

/// Runs units of work against a [`Repository`].
pub trait Store: Send + Sync {
    /// Runs `unit` atomically.
    ///
    /// Units are serialised. If `unit` returns an error, every write it made
    /// is discarded and the error is returned unchanged.
    fn transaction<T>(
        &self,
        unit: impl FnOnce(&mut dyn Repository) -> EngineResult<T>,
    ) -> EngineResult<T>;

    /// Runs a read-only query against the committed state.
    fn read<T>(&self, query: impl FnOnce(&dyn Repository) -> T) -> T;
}
