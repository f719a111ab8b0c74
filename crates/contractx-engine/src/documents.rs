//! Original-contract document lookup
//!
//! The XML a contract was published from lives in blob storage under the
//! request's file name. Workflows attach it to the contract before writing.

use std::sync::Arc;

use async_trait::async_trait;
use contractx_core::errors::{ExError, ExErrorKind};
use contractx_core::model::{Contract, ContractData};
use contractx_core::ports::BlobSource;

use crate::Result;

#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Fetch `file_name` and attach it as the contract's original XML
    ///
    /// # Errors
    /// `DocumentFetchFailure` (cause chained) if the blob is missing or
    /// unreadable, `DocumentEmpty` if it has no content.
    async fn upsert_original_contract_xml(&self, contract: &mut Contract, file_name: &str)
        -> Result<()>;
}

/// [`DocumentService`] reading from a [`BlobSource`]
pub struct BlobDocumentService {
    blobs: Arc<dyn BlobSource>,
}

impl BlobDocumentService {
    pub fn new(blobs: Arc<dyn BlobSource>) -> Self {
        Self { blobs }
    }
}

fn fetch_failure(contract: &Contract, file_name: &str, cause: ExError) -> ExError {
    ExError::new(ExErrorKind::DocumentFetchFailure)
        .with_op("upsert_original_contract_xml")
        .with_contract_number(contract.contract_number.clone())
        .with_contract_version(contract.contract_version)
        .with_message(format!("Failed to fetch document '{}'", file_name))
        .with_source(cause)
}

#[async_trait]
impl DocumentService for BlobDocumentService {
    async fn upsert_original_contract_xml(
        &self,
        contract: &mut Contract,
        file_name: &str,
    ) -> Result<()> {
        let bytes = match self.blobs.read(file_name).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                let missing = ExError::new(ExErrorKind::NotFound)
                    .with_op("blob_read")
                    .with_message(format!("No blob named '{}'", file_name));
                return Err(fetch_failure(contract, file_name, missing));
            }
            Err(e) => return Err(fetch_failure(contract, file_name, e)),
        };

        if bytes.is_empty() {
            return Err(ExError::new(ExErrorKind::DocumentEmpty)
                .with_op("upsert_original_contract_xml")
                .with_contract_number(contract.contract_number.clone())
                .with_contract_version(contract.contract_version)
                .with_message(format!("Document '{}' is empty", file_name)));
        }

        let xml = String::from_utf8(bytes).map_err(|e| {
            let cause = ExError::new(ExErrorKind::Serialization)
                .with_op("decode_document")
                .with_message(e.to_string());
            fetch_failure(contract, file_name, cause)
        })?;

        tracing::debug!(
            contract_number = %contract.contract_number,
            file_name,
            bytes = xml.len(),
            "attached original contract xml"
        );
        contract.contract_data = Some(ContractData {
            original_contract_xml: xml,
        });
        Ok(())
    }
}
