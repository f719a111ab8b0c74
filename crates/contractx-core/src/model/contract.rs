use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::named_enum;

named_enum! {
    /// Lifecycle status of a contract version
    pub enum ContractStatus as "status" {
        PublishedToProvider,
        WithdrawnByAgency,
        WithdrawnByProvider,
        Approved,
        ApprovedWaitingConfirmation,
        /// Legacy status; no current transition produces it.
        AutoWithdrawn,
        Replaced,
    }
}

named_enum! {
    /// How a contract version came to exist
    pub enum AmendmentType as "amendment_type" {
        None,
        Notification,
        Variation,
    }
}

named_enum! {
    /// Funding stream the contract pays out of
    pub enum FundingType as "funding_type" {
        Unknown,
        MainStream,
        Eop,
        Esf,
        Levy,
        NonLevy,
        Aebp,
        Procured,
        AdvancedLearnerLoans,
    }
}

named_enum! {
    /// Legal form of the agreement
    pub enum ContractType as "contract_type" {
        Unknown,
        ConditionsOfFundingGrant,
        ContractForServices,
        FinancialMemorandum,
        Agreement,
    }
}

/// Signed PDF document attached to a contract (1:1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractContent {
    pub file_name: String,

    /// Raw PDF bytes (base64 on the wire)
    #[serde(with = "base64_bytes")]
    pub content: Vec<u8>,

    pub size: i64,
}

impl ContractContent {
    /// Build content from bytes, deriving `size` from the byte length
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        let size = content.len() as i64;
        Self {
            file_name: file_name.into(),
            content,
            size,
        }
    }

    /// Replace the document bytes, keeping `size` in step
    pub fn replace_content(&mut self, content: Vec<u8>) {
        self.size = content.len() as i64;
        self.content = content;
    }
}

/// Original XML the contract was published from (1:1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractData {
    pub original_contract_xml: String,
}

/// Contract - one version of a funding agreement
///
/// `(contract_number, contract_version)` is unique. `last_updated_at` is the
/// optimistic concurrency token checked by the store on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Store-assigned identifier (0 until persisted)
    pub id: i64,

    pub contract_number: String,
    pub contract_version: i32,

    /// UK provider reference number
    pub ukprn: i32,

    pub title: String,
    pub year: String,

    /// Contract value in pence
    pub value_in_pence: i64,

    pub funding_type: FundingType,
    pub contract_type: ContractType,
    pub status: ContractStatus,
    pub amendment_type: AmendmentType,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,

    pub signed_by: Option<String>,
    pub signed_by_display_name: Option<String>,
    pub signed_on: Option<DateTime<Utc>>,
    pub was_manually_approved: bool,

    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    pub last_email_reminder_sent: Option<DateTime<Utc>>,

    /// Contract number this one amends, if any
    pub parent_contract_number: Option<String>,

    pub contract_content: Option<ContractContent>,
    pub contract_data: Option<ContractData>,
    pub funding_stream_period_codes: Vec<String>,
}

impl Contract {
    /// Create a new contract in `PublishedToProvider` with current timestamps
    pub fn new(contract_number: impl Into<String>, contract_version: i32, ukprn: i32) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            contract_number: contract_number.into(),
            contract_version,
            ukprn,
            title: String::new(),
            year: String::new(),
            value_in_pence: 0,
            funding_type: FundingType::Unknown,
            contract_type: ContractType::Unknown,
            status: ContractStatus::PublishedToProvider,
            amendment_type: AmendmentType::None,
            start_date: None,
            end_date: None,
            signed_by: None,
            signed_by_display_name: None,
            signed_on: None,
            was_manually_approved: false,
            created_at: now,
            last_updated_at: now,
            last_email_reminder_sent: None,
            parent_contract_number: None,
            contract_content: None,
            contract_data: None,
            funding_stream_period_codes: Vec::new(),
        }
    }

    /// Record who signed the contract and when
    pub fn sign(
        &mut self,
        signed_by: impl Into<String>,
        display_name: impl Into<String>,
        signed_on: DateTime<Utc>,
    ) {
        self.signed_by = Some(signed_by.into());
        self.signed_by_display_name = Some(display_name.into());
        self.signed_on = Some(signed_on);
    }

    /// Check whether a signed PDF is attached
    pub fn has_content(&self) -> bool {
        self.contract_content.is_some()
    }
}

/// Serde adapter for byte payloads carried as base64 strings
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ContractError;

    #[test]
    fn test_status_parses_from_its_name() {
        for status in ContractStatus::ALL {
            let parsed: ContractStatus = status.as_str().parse().unwrap();
            assert_eq!(&parsed, status);
        }
    }

    #[test]
    fn test_unknown_status_names_field() {
        let err = "Signed".parse::<ContractStatus>().unwrap_err();
        assert_eq!(
            err,
            ContractError::InvalidValue {
                field: "status",
                value: "Signed".to_string()
            }
        );
    }

    #[test]
    fn test_content_size_tracks_bytes() {
        let mut content = ContractContent::new("c.pdf", vec![1, 2, 3]);
        assert_eq!(content.size, 3);
        content.replace_content(vec![9; 10]);
        assert_eq!(content.size, 10);
    }

    #[test]
    fn test_content_serializes_as_base64() {
        let content = ContractContent::new("c.pdf", b"%PDF".to_vec());
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["content"], "JVBERg==");
        let back: ContractContent = serde_json::from_value(json).unwrap();
        assert_eq!(back.content, b"%PDF".to_vec());
    }

    #[test]
    fn test_new_contract_defaults() {
        let contract = Contract::new("C-001", 1, 10001234);
        assert_eq!(contract.id, 0);
        assert_eq!(contract.status, ContractStatus::PublishedToProvider);
        assert!(!contract.has_content());
        assert_eq!(contract.created_at, contract.last_updated_at);
    }
}
