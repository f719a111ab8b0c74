//! Contract workflows with boundary logging
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for every workflow:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()`/`warn!()` for
//! internal details.
//!
//! ## Serialization
//!
//! Only creation runs under the per-contract-number guard. Approval,
//! confirmation and withdrawal rely on the repository's optimistic
//! concurrency token, so a racing writer surfaces as `ERR_CONCURRENCY`.

use std::sync::Arc;

use contractx_core::concurrency::KeyedMutex;
use contractx_core::ports::{AuditSink, ContractRepository};
use contractx_core::queries::UriBuilder;

use crate::config::ServiceConfig;
use crate::documents::DocumentService;
use crate::notifications::NotificationDispatcher;
use crate::stamping::DocumentStamper;

mod approval;
mod create;
mod queries;
mod reminders;
mod withdrawal;

pub use reminders::{ReminderQuery, DEFAULT_REMINDER_PATH};

/// External collaborators the workflows depend on
pub struct Collaborators {
    pub repository: Arc<dyn ContractRepository>,
    pub documents: Arc<dyn DocumentService>,
    pub stamper: Arc<dyn DocumentStamper>,
    pub notifications: Arc<NotificationDispatcher>,
    /// Receives the confirm-approval audit record, which skips the fan-out
    pub audit: Arc<dyn AuditSink>,
    pub uri_builder: Arc<dyn UriBuilder>,
}

/// Contract lifecycle orchestration
///
/// The guard is shared with anything else that must serialize on contract
/// numbers; construct it once per process and pass the same instance.
pub struct ContractService {
    repository: Arc<dyn ContractRepository>,
    documents: Arc<dyn DocumentService>,
    stamper: Arc<dyn DocumentStamper>,
    notifications: Arc<NotificationDispatcher>,
    audit: Arc<dyn AuditSink>,
    uri_builder: Arc<dyn UriBuilder>,
    guard: Arc<KeyedMutex<String>>,
    config: ServiceConfig,
}

impl ContractService {
    pub fn new(
        collaborators: Collaborators,
        guard: Arc<KeyedMutex<String>>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repository: collaborators.repository,
            documents: collaborators.documents,
            stamper: collaborators.stamper,
            notifications: collaborators.notifications,
            audit: collaborators.audit,
            uri_builder: collaborators.uri_builder,
            guard,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

fn elapsed_ms(start: std::time::Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
