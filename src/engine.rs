//! The engine facade.
//!
//! [`PayrollEngine`] owns a store, the loaded configuration and a clock. Each
//! operation runs as one unit of work on the store, so every write it makes
//! applies together or not at all.

use std::path::Path;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigLoader, PayrollConfig};
use crate::employees;
use crate::error::{EngineError, EngineResult};
use crate::leave;
use crate::ledger::{self, BalanceReconciliation};
use crate::models::{
    BalanceKey, CompOffId, CompOffRecord, CompOffRequest, Employee, EmployeeId,
    EmployeeLeaveBalance, EmployeeStatus, LeaveApplication, LeaveApplicationId, LeaveRequest,
    LeaveStatus, LeaveTemplate, LeaveTemplateId, LeaveTransaction, LeaveType, NewEmployee,
    PayrollRecord, PayrollRecordId, PayrollRunSummary, PayrollUpdate, SalaryComponents,
    SalaryHistory, SalaryRevision, SalaryStructure,
};
use crate::payroll;
use crate::salary::{self, IncrementOutcome, SalaryBreakdown};
use crate::store::{MemoryStore, Repository, SeedReport, Store, seed_reference_data};

/// Runs payroll and leave operations against a store.
///
/// The engine is `Sync` when its store and clock are, so one instance can be
/// shared between threads behind an `Arc`; the store serialises the units.
///
/// # Example
///
/// ```no_run
/// use payroll_ledger::PayrollEngine;
///
/// let engine = PayrollEngine::from_config_dir("./config/standard").unwrap();
/// let summary = engine.generate_payroll(3, 2026).unwrap();
/// println!("{} records created", summary.created_count());
/// ```
#[derive(Debug)]
pub struct PayrollEngine<S: Store = MemoryStore, C: Clock = SystemClock> {
    store: S,
    config: PayrollConfig,
    clock: C,
}

impl PayrollEngine<MemoryStore, SystemClock> {
    /// Loads configuration from `path` and seeds an empty in-memory store.
    ///
    /// # Errors
    ///
    /// Any configuration error from [`ConfigLoader::load`].
    pub fn from_config_dir<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let config = ConfigLoader::load(path)?.into_config();
        let engine = Self::new(MemoryStore::new(), config, SystemClock);
        engine.seed_reference_data()?;
        Ok(engine)
    }
}

impl<S: Store, C: Clock> PayrollEngine<S, C> {
    /// Creates an engine over an existing store. Nothing is seeded.
    pub fn new(store: S, config: PayrollConfig, clock: C) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the engine's clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn unit<T>(
        &self,
        operation: &'static str,
        unit: impl FnOnce(&mut dyn Repository) -> EngineResult<T>,
    ) -> EngineResult<T> {
        self.store
            .transaction(unit)
            .inspect_err(|e| log_failure(operation, e))
    }

    // ------------------------------------------------------------------
    // Reference data and employees
    // ------------------------------------------------------------------

    /// Writes the configured templates, leave types and holidays.
    pub fn seed_reference_data(&self) -> EngineResult<SeedReport> {
        self.unit("seed_reference_data", |repo| {
            seed_reference_data(repo, &self.config)
        })
    }

    /// Creates a DRAFT employee with the next employee code.
    pub fn create_employee(&self, new: NewEmployee) -> EngineResult<Employee> {
        self.unit("create_employee", |repo| {
            employees::create_employee(repo, new, &self.config.engine().employee_code)
        })
    }

    /// Moves an employee from DRAFT to PUBLISHED.
    pub fn publish_employee(&self, id: EmployeeId) -> EngineResult<Employee> {
        self.unit("publish_employee", |repo| employees::publish_employee(repo, id))
    }

    /// Separates an employee.
    pub fn separate_employee(
        &self,
        id: EmployeeId,
        status: EmployeeStatus,
        date_of_leaving: NaiveDate,
    ) -> EngineResult<Employee> {
        self.unit("separate_employee", |repo| {
            employees::separate_employee(repo, id, status, date_of_leaving)
        })
    }

    // ------------------------------------------------------------------
    // Salary
    // ------------------------------------------------------------------

    /// Assigns the first salary structure of an employee.
    pub fn assign_salary(
        &self,
        employee_id: EmployeeId,
        components: SalaryComponents,
        effective_from: NaiveDate,
    ) -> EngineResult<SalaryStructure> {
        self.unit("assign_salary", |repo| {
            salary::assign_salary(repo, employee_id, components, effective_from)
        })
    }

    /// Archives the live structure and replaces it with `revision`.
    pub fn increment_salary(
        &self,
        employee_id: EmployeeId,
        revision: SalaryRevision,
    ) -> EngineResult<IncrementOutcome> {
        self.unit("increment_salary", |repo| {
            salary::apply_increment(repo, employee_id, revision)
        })
    }

    // ------------------------------------------------------------------
    // Leave
    // ------------------------------------------------------------------

    /// Submits a leave application in PENDING.
    pub fn submit_leave(&self, request: LeaveRequest) -> EngineResult<LeaveApplication> {
        let now = self.clock.now();
        self.unit("submit_leave", |repo| {
            leave::submit_leave(repo, request, &self.config.engine().leave, now)
        })
    }

    /// Approves an application and debits its balance.
    pub fn approve_leave(&self, id: LeaveApplicationId) -> EngineResult<LeaveApplication> {
        let now = self.clock.now();
        self.unit("approve_leave", |repo| {
            leave::approve_leave(repo, id, &self.config.engine().leave, now)
        })
    }

    /// Rejects an application.
    pub fn reject_leave(&self, id: LeaveApplicationId) -> EngineResult<LeaveApplication> {
        let now = self.clock.now();
        self.unit("reject_leave", |repo| {
            leave::reject_leave(repo, id, &self.config.engine().leave, now)
        })
    }

    /// Records an L1 or L2 approval.
    pub fn record_stage_approval(
        &self,
        id: LeaveApplicationId,
        stage: LeaveStatus,
    ) -> EngineResult<LeaveApplication> {
        let now = self.clock.now();
        self.unit("record_stage_approval", |repo| {
            leave::record_stage_approval(repo, id, stage, &self.config.engine().leave, now)
        })
    }

    /// Files a comp-off claim in PENDING.
    pub fn request_comp_off(&self, request: CompOffRequest) -> EngineResult<CompOffRecord> {
        let now = self.clock.now();
        let engine = self.config.engine();
        self.unit("request_comp_off", |repo| {
            leave::request_comp_off(repo, request, &engine.comp_off, &engine.codes, now)
        })
    }

    /// Approves a comp-off claim and credits the comp-off balance.
    pub fn approve_comp_off(&self, id: CompOffId) -> EngineResult<CompOffRecord> {
        let now = self.clock.now();
        self.unit("approve_comp_off", |repo| {
            leave::approve_comp_off(repo, id, &self.config.engine().codes, now)
        })
    }

    /// Opens `year` balance rows for every published employee with a template.
    ///
    /// Each employee is initialised in its own unit. Returns the number of
    /// rows created; a second call for the same year returns zero.
    ///
    /// # Errors
    ///
    /// The first employee whose unit fails stops the run; employees already
    /// initialised keep their rows.
    pub fn initialize_balances(&self, year: i32) -> EngineResult<usize> {
        let now = self.clock.now();
        let engine = self.config.engine();
        let employees: Vec<EmployeeId> = self.store.read(|repo| {
            repo.employees_with_status(EmployeeStatus::Published)
                .into_iter()
                .filter(|e| e.leave_template_id.is_some())
                .map(|e| e.id)
                .collect()
        });

        let mut created = 0;
        for employee_id in &employees {
            created += self.unit("initialize_balances", |repo| {
                let employee = repo.employee(*employee_id)?;
                ledger::initialize_employee_balances(
                    repo,
                    &employee,
                    year,
                    &engine.leave,
                    &engine.codes,
                    now,
                )
            })?;
        }

        info!(
            year,
            employees = employees.len(),
            rows = created,
            "leave balances initialised"
        );
        Ok(created)
    }

    // ------------------------------------------------------------------
    // Payroll
    // ------------------------------------------------------------------

    /// Generates DRAFT payroll for every eligible employee.
    pub fn generate_payroll(&self, month: u32, year: i32) -> EngineResult<PayrollRunSummary> {
        payroll::generate_payroll_run(
            &self.store,
            month,
            year,
            self.config.engine(),
            self.clock.now(),
        )
        .inspect_err(|e| log_failure("generate_payroll", e))
    }

    /// Recalculates and/or moves the status of a payroll record.
    pub fn update_payroll_record(
        &self,
        id: PayrollRecordId,
        update: PayrollUpdate,
    ) -> EngineResult<PayrollRecord> {
        let now = self.clock.now();
        self.unit("update_payroll_record", |repo| {
            payroll::update_payroll_record(repo, id, update, self.config.engine(), now)
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Looks up an employee.
    pub fn employee(&self, id: EmployeeId) -> EngineResult<Employee> {
        self.store.read(|repo| repo.employee(id))
    }

    /// Looks up a seeded leave template by name.
    ///
    /// # Errors
    ///
    /// `MissingReferenceData` if no template has that name.
    pub fn leave_template(&self, name: &str) -> EngineResult<LeaveTemplate> {
        self.store
            .read(|repo| repo.leave_template_by_name(name))
            .ok_or_else(|| {
                EngineError::missing_reference(format!("leave template '{}' is not seeded", name))
            })
    }

    /// Returns the leave types of a template.
    pub fn leave_types(&self, template_id: LeaveTemplateId) -> Vec<LeaveType> {
        self.store.read(|repo| repo.leave_types_for_template(template_id))
    }

    /// Returns an employee's balance rows for `year`.
    pub fn balances(&self, employee_id: EmployeeId, year: i32) -> Vec<EmployeeLeaveBalance> {
        self.store.read(|repo| repo.balances_for(employee_id, year))
    }

    /// Returns an employee's ledger transactions, oldest first.
    pub fn transactions(&self, employee_id: EmployeeId) -> Vec<LeaveTransaction> {
        self.store.read(|repo| repo.transactions_for(employee_id))
    }

    /// Compares a balance row with its transaction log.
    pub fn reconcile(&self, key: BalanceKey) -> BalanceReconciliation {
        self.store.read(|repo| ledger::reconcile_balance(repo, key))
    }

    /// Looks up a leave application.
    pub fn leave_application(&self, id: LeaveApplicationId) -> EngineResult<LeaveApplication> {
        self.store.read(|repo| repo.leave_application(id))
    }

    /// Looks up a payroll record.
    pub fn payroll_record(&self, id: PayrollRecordId) -> EngineResult<PayrollRecord> {
        self.store.read(|repo| repo.payroll_record(id))
    }

    /// Returns every payroll record of a month.
    pub fn payroll_records(&self, month: u32, year: i32) -> Vec<PayrollRecord> {
        self.store.read(|repo| repo.payroll_records_for_period(year, month))
    }

    /// Returns an employee's archived salary structures.
    pub fn salary_history(&self, employee_id: EmployeeId) -> Vec<SalaryHistory> {
        self.store.read(|repo| repo.salary_history(employee_id))
    }

    /// Resolves an employee's live salary structure.
    ///
    /// # Errors
    ///
    /// `NotFound` if the employee has no structure.
    pub fn salary_breakdown(&self, employee_id: EmployeeId) -> EngineResult<SalaryBreakdown> {
        self.store
            .read(|repo| repo.salary_structure(employee_id))
            .map(|structure| salary::resolve_salary(&structure.components))
            .ok_or_else(|| EngineError::not_found("salary structure", employee_id))
    }
}

fn log_failure(operation: &'static str, e: &EngineError) {
    if e.is_configuration() {
        error!(operation, error = %e, "configuration error");
    } else {
        warn!(operation, kind = ?e.kind(), error = %e, "operation rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::ErrorKind;

    fn create_test_engine() -> PayrollEngine<MemoryStore, FixedClock> {
        let config = ConfigLoader::load("./config/standard")
            .expect("Failed to load config")
            .into_config();
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 3, 20).unwrap());
        let engine = PayrollEngine::new(MemoryStore::new(), config, clock);
        engine.seed_reference_data().unwrap();
        engine
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PayrollEngine<MemoryStore, FixedClock>>();
    }

    #[test]
    fn test_seeding_twice_adds_nothing() {
        let engine = create_test_engine();
        let report = engine.seed_reference_data().unwrap();
        assert_eq!(report.templates, 0);
        assert_eq!(report.leave_types, 0);
    }

    #[test]
    fn test_unknown_template_is_configuration_error() {
        let engine = create_test_engine();
        let result = engine.leave_template("Contractor");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_salary_breakdown_without_structure_is_not_found() {
        let engine = create_test_engine();
        let result = engine.salary_breakdown(EmployeeId(1));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_initialize_balances_for_published_employee() {
        let engine = create_test_engine();
        let template = engine.leave_template("Standard").unwrap();
        let employee = engine
            .create_employee(NewEmployee {
                first_name: "Kiran".to_string(),
                last_name: "Das".to_string(),
                date_of_joining: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
                leave_template_id: Some(template.id),
            })
            .unwrap();

        assert_eq!(engine.initialize_balances(2026).unwrap(), 0);

        engine.publish_employee(employee.id).unwrap();
        let rows = engine.initialize_balances(2026).unwrap();
        assert_eq!(rows, engine.leave_types(template.id).len());
        assert_eq!(engine.initialize_balances(2026).unwrap(), 0);
    }
}
