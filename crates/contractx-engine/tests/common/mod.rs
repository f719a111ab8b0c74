#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use contractx_core::concurrency::KeyedMutex;
use contractx_core::errors::{ExError, ExErrorKind};
use contractx_core::model::{
    AmendmentType, ContractContent, ContractStatusChangeEvent, ContractType,
    CreateContractRequest, FundingType,
};
use contractx_core::ports::{BlobSource, ContractRepository, PortResult};
use contractx_core::queries::BaseUrlUriBuilder;
use contractx_engine::documents::BlobDocumentService;
use contractx_engine::notifications::{
    AuditNotificationHandler, BusNotificationHandler, NotificationDispatcher, NotificationHandler,
};
use contractx_engine::stamping::TrailerStamper;
use contractx_engine::{Collaborators, ContractService, ServiceConfig};
use contractx_store::db::open_shared_in_memory;
use contractx_store::{SqliteAuditSink, SqliteContractRepository, SqliteOutboxPublisher};

pub const PDF: &[u8] = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n%%EOF\n";

/// Blob source backed by a map
#[derive(Default)]
pub struct MemoryBlobs {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobs {
    pub fn put(&self, name: &str, content: &[u8]) {
        self.blobs
            .lock()
            .unwrap()
            .insert(name.to_string(), content.to_vec());
    }
}

#[async_trait]
impl BlobSource for MemoryBlobs {
    async fn read(&self, name: &str) -> PortResult<Option<Vec<u8>>> {
        Ok(self.blobs.lock().unwrap().get(name).cloned())
    }
}

/// Handler that remembers every event it was given
#[derive(Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<ContractStatusChangeEvent>>,
    fail: bool,
}

impl RecordingHandler {
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<ContractStatusChangeEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationHandler for RecordingHandler {
    fn name(&self) -> &'static str {
        if self.fail {
            "failing_recorder"
        } else {
            "recorder"
        }
    }

    async fn handle(&self, event: &ContractStatusChangeEvent) -> contractx_engine::Result<()> {
        self.events.lock().unwrap().push(event.clone());
        if self.fail {
            return Err(ExError::new(ExErrorKind::Io).with_message("bus unavailable"));
        }
        Ok(())
    }
}

pub struct Harness {
    pub service: Arc<ContractService>,
    pub repo: SqliteContractRepository,
    pub audit: SqliteAuditSink,
    pub outbox: SqliteOutboxPublisher,
    pub blobs: Arc<MemoryBlobs>,
    pub recorder: Arc<RecordingHandler>,
}

pub fn harness() -> Harness {
    build(ServiceConfig::from_defaults().unwrap(), RecordingHandler::default(), plain)
}

/// Harness whose service sees the store through `wrap`
pub fn harness_with_repository<F>(wrap: F) -> Harness
where
    F: FnOnce(SqliteContractRepository) -> Arc<dyn ContractRepository>,
{
    build(ServiceConfig::from_defaults().unwrap(), RecordingHandler::default(), wrap)
}

fn plain(repo: SqliteContractRepository) -> Arc<dyn ContractRepository> {
    Arc::new(repo)
}

pub fn harness_with_interval(days: u32) -> Harness {
    let mut config = ServiceConfig::from_defaults().unwrap();
    config.reminder_interval_days = days;
    config.base_url = "https://contracts.example".to_string();
    build(config, RecordingHandler::default(), plain)
}

pub fn harness_with_failing_handler() -> Harness {
    build(ServiceConfig::from_defaults().unwrap(), RecordingHandler::failing(), plain)
}

fn build<F>(config: ServiceConfig, recorder: RecordingHandler, wrap: F) -> Harness
where
    F: FnOnce(SqliteContractRepository) -> Arc<dyn ContractRepository>,
{
    let conn = open_shared_in_memory().unwrap();
    let repo = SqliteContractRepository::new(conn.clone());
    let audit = SqliteAuditSink::new(conn.clone());
    let outbox = SqliteOutboxPublisher::new(conn);
    let blobs = Arc::new(MemoryBlobs::default());
    let recorder = Arc::new(recorder);

    let notifications = NotificationDispatcher::new()
        .with_handler(recorder.clone())
        .with_handler(Arc::new(AuditNotificationHandler::new(Arc::new(audit.clone()))))
        .with_handler(Arc::new(BusNotificationHandler::new(Arc::new(outbox.clone()))));

    let collaborators = Collaborators {
        repository: wrap(repo.clone()),
        documents: Arc::new(BlobDocumentService::new(blobs.clone())),
        stamper: Arc::new(TrailerStamper),
        notifications: Arc::new(notifications),
        audit: Arc::new(audit.clone()),
        uri_builder: Arc::new(BaseUrlUriBuilder::new(config.base_url.clone())),
    };
    let service = ContractService::new(collaborators, Arc::new(KeyedMutex::new()), config);

    Harness {
        service: Arc::new(service),
        repo,
        audit,
        outbox,
        blobs,
        recorder,
    }
}

impl Harness {
    /// Build a create request and store its original XML
    pub fn request(&self, number: &str, version: i32, amendment: AmendmentType) -> CreateContractRequest {
        let file_name = format!("{}-v{}.xml", number, version);
        self.blobs.put(
            &file_name,
            format!("<contract number=\"{}\" version=\"{}\"/>", number, version).as_bytes(),
        );

        CreateContractRequest {
            contract_number: number.to_string(),
            contract_version: version,
            ukprn: 10_004_321,
            title: format!("Apprenticeship levy {} v{}", number, version),
            year: "2026".to_string(),
            value_in_pence: 5_000_000,
            funding_type: FundingType::Levy,
            contract_type: ContractType::ContractForServices,
            amendment_type: amendment,
            parent_contract_number: None,
            start_date: None,
            end_date: None,
            signed_on: None,
            file_name,
            contract_content: Some(ContractContent::new(format!("{}-v{}.pdf", number, version), PDF.to_vec())),
            funding_stream_period_codes: vec!["LEVY1799".to_string()],
        }
    }
}
