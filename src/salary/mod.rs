//! Salary structure resolution and revision.
//!
//! The resolver turns a stored structure into gross, deductions and net
//! figures. Revisions archive the live structure before replacing it.

mod increment;
mod resolver;

pub use increment::{IncrementOutcome, apply_increment, assign_salary};
pub use resolver::{
    SalaryBreakdown, SalarySnapshot, archived_snapshot, resolve_salary, salary_snapshot,
};
