//! Leave applications and comp-off claims.
//!
//! Both workflows validate their input, move through the transition tables
//! in [`crate::workflow`], and post their balance effects to the ledger.

mod application;
mod comp_off;
mod day_count;

pub use application::{approve_leave, record_stage_approval, reject_leave, submit_leave};
pub use comp_off::{approve_comp_off, request_comp_off};
pub use day_count::{DayKind, LeaveDayCount, classify_day, count_leave_days};
