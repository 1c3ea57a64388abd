//! In-memory [`Store`] implementation.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    BalanceKey, CompOffId, CompOffRecord, Employee, EmployeeId, EmployeeLeaveBalance,
    EmployeeStatus, Holiday, LeaveApplication, LeaveApplicationId, LeaveTemplate,
    LeaveTemplateId, LeaveTransaction, LeaveType, LeaveTypeId, PayrollRecord, PayrollRecordId,
    SalaryHistory, SalaryHistoryId, SalaryStructure, TransactionId,
};

use super::{Repository, Sequence, Store};

#[derive(Debug, Clone, Default)]
struct Tables {
    sequences: BTreeMap<Sequence, u64>,
    employees: BTreeMap<EmployeeId, Employee>,
    salary_structures: BTreeMap<EmployeeId, SalaryStructure>,
    salary_history: BTreeMap<SalaryHistoryId, SalaryHistory>,
    leave_templates: BTreeMap<LeaveTemplateId, LeaveTemplate>,
    leave_types: BTreeMap<LeaveTypeId, LeaveType>,
    holidays: BTreeMap<NaiveDate, Holiday>,
    balances: BTreeMap<BalanceKey, EmployeeLeaveBalance>,
    transactions: BTreeMap<TransactionId, LeaveTransaction>,
    leave_applications: BTreeMap<LeaveApplicationId, LeaveApplication>,
    comp_offs: BTreeMap<CompOffId, CompOffRecord>,
    payroll_records: BTreeMap<PayrollRecordId, PayrollRecord>,
}

/// A [`Store`] holding every table in memory behind one mutex.
///
/// Each unit runs against a private copy of the tables, which replaces the
/// committed state only when the unit succeeds. Holding the mutex for the
/// whole unit serialises writers, so two approvals against the same balance
/// row cannot interleave.
///
/// # Example
///
/// ```
/// use payroll_ledger::store::{MemoryStore, Repository, Sequence, Store};
///
/// let store = MemoryStore::new();
/// let first = store.transaction(|repo| Ok(repo.reserve_sequence(Sequence::EmployeeCode))).unwrap();
/// let second = store.transaction(|repo| Ok(repo.reserve_sequence(Sequence::EmployeeCode))).unwrap();
/// assert_eq!((first, second), (1, 2));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // The committed tables are only ever replaced wholesale, so a panic
        // inside a unit cannot leave them half-written.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn transaction<T>(
        &self,
        unit: impl FnOnce(&mut dyn Repository) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let mut committed = self.lock();
        let mut working = committed.clone();
        let output = unit(&mut working)?;
        *committed = working;
        Ok(output)
    }

    fn read<T>(&self, query: impl FnOnce(&dyn Repository) -> T) -> T {
        let committed = self.lock();
        query(&*committed)
    }
}

fn insert_unique<K: Ord + std::fmt::Display + Copy, V>(
    table: &mut BTreeMap<K, V>,
    entity: &'static str,
    key: K,
    value: V,
) -> EngineResult<()> {
    if table.contains_key(&key) {
        return Err(EngineError::conflict(format!("{} {} already exists", entity, key)));
    }
    table.insert(key, value);
    Ok(())
}

fn replace_existing<K: Ord + std::fmt::Display + Copy, V>(
    table: &mut BTreeMap<K, V>,
    entity: &'static str,
    key: K,
    value: V,
) -> EngineResult<()> {
    match table.get_mut(&key) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(EngineError::not_found(entity, key)),
    }
}

fn fetch<K: Ord + std::fmt::Display + Copy, V: Clone>(
    table: &BTreeMap<K, V>,
    entity: &'static str,
    key: K,
) -> EngineResult<V> {
    table
        .get(&key)
        .cloned()
        .ok_or_else(|| EngineError::not_found(entity, key))
}

impl Repository for Tables {
    fn reserve_sequence(&mut self, sequence: Sequence) -> u64 {
        let counter = self.sequences.entry(sequence).or_insert(0);
        *counter += 1;
        *counter
    }

    fn employee(&self, id: EmployeeId) -> EngineResult<Employee> {
        fetch(&self.employees, "Employee", id)
    }

    fn employees_with_status(&self, status: EmployeeStatus) -> Vec<Employee> {
        self.employees
            .values()
            .filter(|e| e.status == status)
            .cloned()
            .collect()
    }

    fn insert_employee(&mut self, employee: Employee) -> EngineResult<()> {
        if self.employees.values().any(|e| e.code == employee.code) {
            return Err(EngineError::conflict(format!(
                "employee code {} is already taken",
                employee.code
            )));
        }
        insert_unique(&mut self.employees, "Employee", employee.id, employee)
    }

    fn update_employee(&mut self, employee: Employee) -> EngineResult<()> {
        replace_existing(&mut self.employees, "Employee", employee.id, employee)
    }

    fn salary_structure(&self, employee_id: EmployeeId) -> Option<SalaryStructure> {
        self.salary_structures.get(&employee_id).cloned()
    }

    fn save_salary_structure(&mut self, structure: SalaryStructure) {
        self.salary_structures.insert(structure.employee_id, structure);
    }

    fn insert_salary_history(&mut self, history: SalaryHistory) -> EngineResult<()> {
        insert_unique(&mut self.salary_history, "Salary history", history.id, history)
    }

    fn salary_history(&self, employee_id: EmployeeId) -> Vec<SalaryHistory> {
        self.salary_history
            .values()
            .filter(|h| h.employee_id == employee_id)
            .cloned()
            .collect()
    }

    fn leave_template(&self, id: LeaveTemplateId) -> EngineResult<LeaveTemplate> {
        fetch(&self.leave_templates, "Leave template", id)
    }

    fn leave_template_by_name(&self, name: &str) -> Option<LeaveTemplate> {
        self.leave_templates.values().find(|t| t.name == name).cloned()
    }

    fn insert_leave_template(&mut self, template: LeaveTemplate) -> EngineResult<()> {
        insert_unique(&mut self.leave_templates, "Leave template", template.id, template)
    }

    fn leave_type(&self, id: LeaveTypeId) -> EngineResult<LeaveType> {
        fetch(&self.leave_types, "Leave type", id)
    }

    fn leave_types_for_template(&self, template_id: LeaveTemplateId) -> Vec<LeaveType> {
        self.leave_types
            .values()
            .filter(|lt| lt.template_id == template_id)
            .cloned()
            .collect()
    }

    fn insert_leave_type(&mut self, leave_type: LeaveType) -> EngineResult<()> {
        let duplicate = self
            .leave_types
            .values()
            .any(|lt| lt.template_id == leave_type.template_id && lt.code == leave_type.code);
        if duplicate {
            return Err(EngineError::conflict(format!(
                "leave type {} already exists in template {}",
                leave_type.code, leave_type.template_id
            )));
        }
        insert_unique(&mut self.leave_types, "Leave type", leave_type.id, leave_type)
    }

    fn insert_holiday(&mut self, holiday: Holiday) {
        self.holidays.insert(holiday.date, holiday);
    }

    fn holidays_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<Holiday> {
        if from > to {
            return Vec::new();
        }
        self.holidays.range(from..=to).map(|(_, h)| h.clone()).collect()
    }

    fn balance(&self, key: &BalanceKey) -> Option<EmployeeLeaveBalance> {
        self.balances.get(key).cloned()
    }

    fn save_balance(&mut self, balance: EmployeeLeaveBalance) {
        self.balances.insert(balance.key(), balance);
    }

    fn balances_for(&self, employee_id: EmployeeId, year: i32) -> Vec<EmployeeLeaveBalance> {
        self.balances
            .values()
            .filter(|b| b.employee_id == employee_id && b.year == year)
            .cloned()
            .collect()
    }

    fn append_transaction(&mut self, transaction: LeaveTransaction) -> EngineResult<()> {
        insert_unique(
            &mut self.transactions,
            "Leave transaction",
            transaction.id,
            transaction,
        )
    }

    fn transactions_for(&self, employee_id: EmployeeId) -> Vec<LeaveTransaction> {
        self.transactions
            .values()
            .filter(|t| t.employee_id == employee_id)
            .cloned()
            .collect()
    }

    fn leave_application(&self, id: LeaveApplicationId) -> EngineResult<LeaveApplication> {
        fetch(&self.leave_applications, "Leave application", id)
    }

    fn insert_leave_application(&mut self, application: LeaveApplication) -> EngineResult<()> {
        insert_unique(
            &mut self.leave_applications,
            "Leave application",
            application.id,
            application,
        )
    }

    fn update_leave_application(&mut self, application: LeaveApplication) -> EngineResult<()> {
        replace_existing(
            &mut self.leave_applications,
            "Leave application",
            application.id,
            application,
        )
    }

    fn leave_applications_for(&self, employee_id: EmployeeId) -> Vec<LeaveApplication> {
        self.leave_applications
            .values()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect()
    }

    fn comp_off(&self, id: CompOffId) -> EngineResult<CompOffRecord> {
        fetch(&self.comp_offs, "Comp-off", id)
    }

    fn insert_comp_off(&mut self, record: CompOffRecord) -> EngineResult<()> {
        insert_unique(&mut self.comp_offs, "Comp-off", record.id, record)
    }

    fn update_comp_off(&mut self, record: CompOffRecord) -> EngineResult<()> {
        replace_existing(&mut self.comp_offs, "Comp-off", record.id, record)
    }

    fn comp_offs_for(&self, employee_id: EmployeeId) -> Vec<CompOffRecord> {
        self.comp_offs
            .values()
            .filter(|c| c.employee_id == employee_id)
            .cloned()
            .collect()
    }

    fn payroll_record(&self, id: PayrollRecordId) -> EngineResult<PayrollRecord> {
        fetch(&self.payroll_records, "Payroll record", id)
    }

    fn payroll_record_for(
        &self,
        employee_id: EmployeeId,
        year: i32,
        month: u32,
    ) -> Option<PayrollRecord> {
        self.payroll_records
            .values()
            .find(|r| r.employee_id == employee_id && r.year == year && r.month == month)
            .cloned()
    }

    fn insert_payroll_record(&mut self, record: PayrollRecord) -> EngineResult<()> {
        if let Some(existing) = self.payroll_record_for(record.employee_id, record.year, record.month)
        {
            return Err(EngineError::conflict(format!(
                "payroll for employee {} in {}/{} already exists as record {}",
                record.employee_id, record.month, record.year, existing.id
            )));
        }
        insert_unique(&mut self.payroll_records, "Payroll record", record.id, record)
    }

    fn update_payroll_record(&mut self, record: PayrollRecord) -> EngineResult<()> {
        replace_existing(&mut self.payroll_records, "Payroll record", record.id, record)
    }

    fn payroll_records_for_period(&self, year: i32, month: u32) -> Vec<PayrollRecord> {
        self.payroll_records
            .values()
            .filter(|r| r.year == year && r.month == month)
            .cloned()
            .collect()
    }
}
