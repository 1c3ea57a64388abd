//! Strongly-typed entity identifiers.
//!
//! Every persisted entity is keyed by a numeric id allocated from a store
//! sequence. Wrapping them keeps an `EmployeeId` from being passed where a
//! `LeaveTypeId` is expected.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifies an employee.
    EmployeeId
);
entity_id!(
    /// Identifies a leave template.
    LeaveTemplateId
);
entity_id!(
    /// Identifies a leave type.
    LeaveTypeId
);
entity_id!(
    /// Identifies a leave application.
    LeaveApplicationId
);
entity_id!(
    /// Identifies a comp-off record.
    CompOffId
);
entity_id!(
    /// Identifies a payroll record.
    PayrollRecordId
);
entity_id!(
    /// Identifies a leave ledger transaction.
    TransactionId
);
entity_id!(
    /// Identifies an archived salary structure.
    SalaryHistoryId
);
