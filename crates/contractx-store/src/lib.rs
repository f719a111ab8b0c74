//! ContractX Store - SQLite persistence and blob access
//!
//! Provides:
//! - SQLite schema with an embedded, checksummed migrations framework
//! - Contract repository with optimistic concurrency on updates
//! - Audit log sink and transactional outbox publisher
//! - Filesystem blob source for contract documents

pub mod blob;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use blob::FsBlobSource;
pub use errors::Result;
pub use repo::{SharedConnection, SqliteAuditSink, SqliteContractRepository, SqliteOutboxPublisher};
