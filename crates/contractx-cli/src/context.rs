//! Wiring of the service and its collaborators for one CLI invocation

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use contractx_core::concurrency::KeyedMutex;
use contractx_core::logging_facility;
use contractx_core::queries::BaseUrlUriBuilder;
use contractx_engine::documents::BlobDocumentService;
use contractx_engine::notifications::{
    AuditNotificationHandler, BusNotificationHandler, NotificationDispatcher,
};
use contractx_engine::stamping::TrailerStamper;
use contractx_engine::{Collaborators, ContractService, ServiceConfig};
use contractx_store::{
    db, FsBlobSource, SqliteAuditSink, SqliteContractRepository, SqliteOutboxPublisher,
};

pub struct AppContext {
    pub service: ContractService,
    pub blobs: Arc<FsBlobSource>,
}

impl AppContext {
    pub fn build(config_path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let config = ServiceConfig::load(config_path)?;
        logging_facility::init(config.log_profile);

        let conn = db::open_shared(&config.database_path)?;
        let repository = Arc::new(SqliteContractRepository::new(conn.clone()));
        let audit = Arc::new(SqliteAuditSink::new(conn.clone()));
        let outbox = Arc::new(SqliteOutboxPublisher::new(conn));
        let blobs = Arc::new(FsBlobSource::new(config.blob_root.clone()));

        let notifications = NotificationDispatcher::new()
            .with_handler(Arc::new(AuditNotificationHandler::new(audit.clone())))
            .with_handler(Arc::new(BusNotificationHandler::new(outbox)));

        let collaborators = Collaborators {
            repository,
            documents: Arc::new(BlobDocumentService::new(blobs.clone())),
            stamper: Arc::new(TrailerStamper),
            notifications: Arc::new(notifications),
            audit,
            uri_builder: Arc::new(BaseUrlUriBuilder::new(config.base_url.clone())),
        };
        let service = ContractService::new(collaborators, Arc::new(KeyedMutex::new()), config);

        Ok(Self { service, blobs })
    }
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
