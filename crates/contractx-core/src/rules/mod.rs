//! Contract lifecycle rules
//!
//! - `state_machine`: which status transitions are legal
//! - `validation`: request-vs-contract consistency and new-version conflicts
//!
//! Every check here runs before any write; a failure aborts the workflow
//! with nothing persisted.

pub mod state_machine;
pub mod validation;

pub use state_machine::{validate_status_change, ApprovalPath, TransitionRule};
pub use validation::{
    validate, validate_for_new_contract, validate_withdrawal, ContractPredicate,
    CONTENT_ATTACHED,
};
