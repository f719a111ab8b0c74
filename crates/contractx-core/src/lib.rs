//! ContractX Core - contract lifecycle domain kernel
//!
//! This crate holds everything the contract workflows decide without touching
//! storage:
//! - Contract, request and event models
//! - Request validation and the status state machine
//! - Sorting and pagination for listings, plus reminder paging metadata
//! - A per-key mutual exclusion guard
//! - The collaborator traits persistence and messaging implement
//! - Structured error and logging facilities shared by every crate

pub mod concurrency;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ports;
pub mod queries;
pub mod rules;

// Re-export commonly used types
pub use concurrency::{KeyLock, KeyedMutex};
pub use errors::{ContractError, ExError, ExErrorKind, Result};
pub use model::{
    AmendmentType, AuditRecord, Contract, ContractAction, ContractStatus,
    ContractStatusChangeEvent, StatusTransition,
};
pub use ports::{AuditSink, BlobSource, ContractIncludes, ContractRepository, MessagePublisher};
