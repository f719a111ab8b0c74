//! ContractX Engine - Orchestration layer
//!
//! Composes the per-key guard, validation rules, repository, document
//! collaborators and notification fan-out into the contract workflows.
//! Persistence is reached only through the traits in `contractx_core::ports`.

pub mod cascade;
pub mod commands;
pub mod config;
pub mod documents;
pub mod notifications;
pub mod stamping;

pub use commands::{Collaborators, ContractService, ReminderQuery};
pub use config::{ServiceConfig, SignerIdentity};

use contractx_core::errors::ExError;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, ExError>;
