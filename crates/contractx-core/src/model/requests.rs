//! Inbound workflow requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::contract::{
    AmendmentType, Contract, ContractContent, ContractStatus, ContractType, FundingType,
};

/// Request to create a new contract version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateContractRequest {
    pub contract_number: String,
    pub contract_version: i32,
    pub ukprn: i32,
    pub title: String,
    pub year: String,
    pub value_in_pence: i64,
    pub funding_type: FundingType,
    pub contract_type: ContractType,
    pub amendment_type: AmendmentType,
    #[serde(default)]
    pub parent_contract_number: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Date the provider signed (used when auto-approving notifications)
    #[serde(default)]
    pub signed_on: Option<DateTime<Utc>>,
    /// Name of the original contract XML in blob storage
    pub file_name: String,
    #[serde(default)]
    pub contract_content: Option<ContractContent>,
    #[serde(default)]
    pub funding_stream_period_codes: Vec<String>,
}

impl CreateContractRequest {
    /// Map the request onto a fresh, unpersisted contract stamped at `now`
    ///
    /// Status is left at its default; the create workflow assigns it from
    /// the amendment type.
    pub fn to_contract(&self, now: DateTime<Utc>) -> Contract {
        let mut contract = Contract::new(
            self.contract_number.clone(),
            self.contract_version,
            self.ukprn,
        );
        contract.title = self.title.clone();
        contract.year = self.year.clone();
        contract.value_in_pence = self.value_in_pence;
        contract.funding_type = self.funding_type;
        contract.contract_type = self.contract_type;
        contract.amendment_type = self.amendment_type;
        contract.parent_contract_number = self.parent_contract_number.clone();
        contract.start_date = self.start_date;
        contract.end_date = self.end_date;
        contract.contract_content = self.contract_content.clone();
        contract.funding_stream_period_codes = self.funding_stream_period_codes.clone();
        contract.created_at = now;
        contract.last_updated_at = now;
        contract
    }
}

/// Identifies one stored contract version
///
/// `id` may be 0 when the caller only knows number and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRequest {
    #[serde(default)]
    pub id: i64,
    pub contract_number: String,
    pub contract_version: i32,
    /// Name of the original contract XML in blob storage
    pub file_name: String,
}

impl ContractRequest {
    pub fn new(
        contract_number: impl Into<String>,
        contract_version: i32,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            contract_number: contract_number.into(),
            contract_version,
            file_name: file_name.into(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}

/// Manual approval of a published contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    #[serde(flatten)]
    pub contract: ContractRequest,
    /// Identity of the approving user, stamped into the signed page
    #[serde(default)]
    pub principal_id: Option<String>,
}

/// Withdrawal of a published contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    #[serde(flatten)]
    pub contract: ContractRequest,
    /// Must be `WithdrawnByAgency` or `WithdrawnByProvider`
    pub withdrawal_type: ContractStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CreateContractRequest {
        CreateContractRequest {
            contract_number: "C-001".to_string(),
            contract_version: 3,
            ukprn: 10005077,
            title: "Adult education budget".to_string(),
            year: "2026".to_string(),
            value_in_pence: 1_250_000,
            funding_type: FundingType::Aebp,
            contract_type: ContractType::ContractForServices,
            amendment_type: AmendmentType::Variation,
            parent_contract_number: Some("C-000".to_string()),
            start_date: None,
            end_date: None,
            signed_on: None,
            file_name: "c-001-v3.xml".to_string(),
            contract_content: Some(ContractContent::new("c-001-v3.pdf", vec![1, 2])),
            funding_stream_period_codes: vec!["AEBC-1920".to_string()],
        }
    }

    #[test]
    fn test_to_contract_copies_fields_and_stamps_time() {
        let now = Utc::now();
        let contract = sample().to_contract(now);
        assert_eq!(contract.id, 0);
        assert_eq!(contract.contract_number, "C-001");
        assert_eq!(contract.contract_version, 3);
        assert_eq!(contract.amendment_type, AmendmentType::Variation);
        assert_eq!(contract.parent_contract_number.as_deref(), Some("C-000"));
        assert_eq!(contract.created_at, now);
        assert_eq!(contract.last_updated_at, now);
        assert_eq!(contract.contract_content.unwrap().size, 2);
    }

    #[test]
    fn test_withdrawal_request_flattens_contract_fields() {
        let json = serde_json::json!({
            "contract_number": "C-1",
            "contract_version": 1,
            "file_name": "c.xml",
            "withdrawal_type": "WithdrawnByProvider"
        });
        let req: WithdrawalRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.contract.id, 0);
        assert_eq!(req.withdrawal_type, ContractStatus::WithdrawnByProvider);
    }
}
