//! Signing stamp applied to a contract PDF on manual approval

use chrono::{DateTime, SecondsFormat, Utc};
use contractx_core::errors::{ExError, ExErrorKind};
use contractx_core::model::FundingType;

use crate::Result;

/// Who signed, when, and under which funding stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningDetails {
    pub signed_by: String,
    pub display_name: String,
    pub signed_on: DateTime<Utc>,
    pub funding_type: FundingType,
    pub principal_id: Option<String>,
}

pub trait DocumentStamper: Send + Sync {
    /// Return new PDF bytes carrying a signed-confirmation record
    ///
    /// # Errors
    /// `DocumentEmpty` if `pdf` has no content.
    fn stamp(&self, pdf: &[u8], details: &SigningDetails) -> Result<Vec<u8>>;
}

/// Appends the signing record as PDF comment lines after the document body
///
/// This does not render a signed confirmation page. The original bytes are
/// kept as a prefix and no page objects are added, so viewers show the
/// document exactly as before; the record is only visible in the raw file.
/// A stamper that draws a confirmation page belongs behind
/// [`DocumentStamper`] as a separate implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailerStamper;

impl DocumentStamper for TrailerStamper {
    fn stamp(&self, pdf: &[u8], details: &SigningDetails) -> Result<Vec<u8>> {
        if pdf.is_empty() {
            return Err(ExError::new(ExErrorKind::DocumentEmpty)
                .with_op("stamp_document")
                .with_message("Cannot stamp an empty document"));
        }

        let mut trailer = String::from("\n% ContractX signing record\n");
        trailer.push_str(&format!(
            "% Signed by: {} ({})\n",
            details.display_name, details.signed_by
        ));
        trailer.push_str(&format!(
            "% Signed on: {}\n",
            details.signed_on.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        trailer.push_str(&format!("% Funding type: {}\n", details.funding_type));
        if let Some(principal) = &details.principal_id {
            trailer.push_str(&format!("% Principal: {}\n", principal));
        }
        trailer.push_str("%%EOF\n");

        let mut stamped = Vec::with_capacity(pdf.len() + trailer.len());
        stamped.extend_from_slice(pdf);
        stamped.extend_from_slice(trailer.as_bytes());
        Ok(stamped)
    }
}
