//! Payroll and Leave Ledger Engine
//!
//! This crate derives monthly pay from stored salary structures, generates and
//! mutates payroll records, and keeps a per-employee, per-leave-type, per-year
//! leave balance ledger with pro-rata accrual, debit-on-approval and
//! credit-on-accrual semantics.
//!
//! Operations run through [`PayrollEngine`], which executes each one as an
//! atomic unit against a [`store::Store`].

#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod employees;
pub mod engine;
pub mod error;
pub mod leave;
pub mod ledger;
pub mod models;
pub mod payroll;
pub mod rounding;
pub mod salary;
pub mod store;
pub mod workflow;

pub use engine::PayrollEngine;
pub use error::{EngineError, EngineResult, ErrorKind};
