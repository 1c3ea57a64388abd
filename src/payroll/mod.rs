//! Monthly payroll records.
//!
//! The generator creates one DRAFT record per eligible employee per month;
//! the mutator recalculates DRAFT records and moves them through
//! DRAFT -> PROCESSED -> PAID.

mod generator;
mod mutator;

pub use generator::{
    GenerationOutcome, generate_for_employee, generate_payroll_run, last_day_of_month,
};
pub use mutator::{recalculate, update_payroll_record};
