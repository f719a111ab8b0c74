//! Collaborator seams used by the contract workflows
//!
//! Persistence, blob storage, audit and message publishing are reached only
//! through these traits. Implementations live in `contractx-store`; tests
//! substitute recording doubles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::ExError;
use crate::model::{AuditRecord, Contract, ContractStatus, ContractStatusChangeEvent, StatusTransition};

/// Result type for collaborator calls
pub type PortResult<T> = std::result::Result<T, ExError>;

/// Related records to load alongside a contract
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractIncludes {
    pub data: bool,
    pub content: bool,
    pub funding_stream_periods: bool,
}

impl ContractIncludes {
    pub const NONE: Self = Self {
        data: false,
        content: false,
        funding_stream_periods: false,
    };

    pub const DATA: Self = Self {
        data: true,
        content: false,
        funding_stream_periods: false,
    };

    pub const DATA_AND_CONTENT: Self = Self {
        data: true,
        content: true,
        funding_stream_periods: false,
    };

    pub const ALL: Self = Self {
        data: true,
        content: true,
        funding_stream_periods: true,
    };
}

/// Contract persistence
#[async_trait]
pub trait ContractRepository: Send + Sync {
    /// Fetch by surrogate id, with all related records
    async fn get_by_id(&self, id: i64) -> PortResult<Option<Contract>>;

    /// Fetch by number and version, without related records
    async fn get_by_number_and_version(
        &self,
        contract_number: &str,
        contract_version: i32,
    ) -> PortResult<Option<Contract>>;

    /// Fetch by number and version, loading the requested related records
    async fn get_by_number_and_version_with_includes(
        &self,
        contract_number: &str,
        contract_version: i32,
        includes: ContractIncludes,
    ) -> PortResult<Option<Contract>>;

    /// Every stored version of a contract number, ascending by version
    async fn get_by_number(&self, contract_number: &str) -> PortResult<Vec<Contract>>;

    /// Insert a new contract and its related records; returns it with its id
    ///
    /// # Errors
    /// `DuplicateVersion` if the number/version pair already exists.
    async fn create(&self, contract: Contract) -> PortResult<Contract>;

    /// Persist every field of an existing contract
    ///
    /// `last_updated_at` is the concurrency token: the write only applies if
    /// the stored value still equals the one on `contract`. The returned
    /// contract carries the new token.
    ///
    /// # Errors
    /// `Concurrency` if the stored token has moved on.
    async fn update(&self, contract: Contract) -> PortResult<Contract>;

    /// Compare-and-set the status of one contract
    ///
    /// # Errors
    /// `Concurrency` if the stored status is no longer `expected`,
    /// `NotFound` if the id does not exist.
    async fn update_status(
        &self,
        id: i64,
        expected: ContractStatus,
        new_status: ContractStatus,
    ) -> PortResult<StatusTransition>;

    /// Stamp the reminder timestamp on one contract
    async fn update_last_email_reminder_sent(
        &self,
        id: i64,
        sent_at: DateTime<Utc>,
    ) -> PortResult<Contract>;

    /// Published-to-provider contracts not reminded (or created) since `cutoff`
    async fn query_reminder_candidates(&self, cutoff: DateTime<Utc>) -> PortResult<Vec<Contract>>;
}

/// Read access to stored contract documents
#[async_trait]
pub trait BlobSource: Send + Sync {
    /// Bytes stored under `name`, or `None` if nothing is there
    async fn read(&self, name: &str) -> PortResult<Option<Vec<u8>>>;
}

/// Audit trail sink
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn write(&self, record: AuditRecord) -> PortResult<()>;
}

/// Outbound message bus
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, event: &ContractStatusChangeEvent) -> PortResult<()>;
}
