//! Configuration loading and management for the payroll and leave engine.
//!
//! This module provides functionality to load engine policy, leave templates
//! and holiday calendars from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/standard").unwrap();
//! println!("Working days per cycle: {}", config.engine().payroll.total_working_days);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CompOffPolicy, EmployeeCodeFormat, EngineConfig, HolidayFile, LeaveCodes, LeavePolicy,
    LeaveTypeConfig, MAX_COMP_OFF_EXPIRY_DAYS, MissingBalancePolicy, PayrollConfig,
    PayrollPolicy, TemplateConfig, TemplatesConfig,
};
