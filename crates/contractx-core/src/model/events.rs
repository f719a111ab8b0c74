//! Status-change events, transitions and audit records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::contract::{AmendmentType, Contract, ContractStatus, FundingType};
use super::named_enum;

named_enum! {
    /// What happened to the contract
    pub enum ContractAction as "action" {
        Created,
        Approved,
        ManuallyApproved,
        Withdrawn,
        Replaced,
    }
}

/// Published whenever a contract enters a new status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractStatusChangeEvent {
    pub contract_id: i64,
    pub contract_number: String,
    pub contract_version: i32,
    pub ukprn: i32,
    pub title: String,
    pub funding_type: FundingType,
    pub amendment_type: AmendmentType,
    pub parent_contract_number: Option<String>,
    /// Absent for newly created contracts
    pub previous_status: Option<ContractStatus>,
    pub status: ContractStatus,
    pub action: ContractAction,
    pub occurred_at: DateTime<Utc>,
}

impl ContractStatusChangeEvent {
    /// Describe `contract` as it stands now, having left `previous_status`
    pub fn for_contract(
        contract: &Contract,
        previous_status: Option<ContractStatus>,
        action: ContractAction,
    ) -> Self {
        Self {
            contract_id: contract.id,
            contract_number: contract.contract_number.clone(),
            contract_version: contract.contract_version,
            ukprn: contract.ukprn,
            title: contract.title.clone(),
            funding_type: contract.funding_type,
            amendment_type: contract.amendment_type,
            parent_contract_number: contract.parent_contract_number.clone(),
            previous_status,
            status: contract.status,
            action,
            occurred_at: Utc::now(),
        }
    }
}

/// Before/after record of a compare-and-set status update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub contract_id: i64,
    pub contract_number: String,
    pub contract_version: i32,
    pub ukprn: i32,
    pub previous_status: ContractStatus,
    pub new_status: ContractStatus,
}

named_enum! {
    pub enum AuditSeverity as "severity" {
        Information,
        Warning,
        Error,
    }
}

/// Entry written to the audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub action: ContractAction,
    pub severity: AuditSeverity,
    pub ukprn: Option<i32>,
    pub contract_number: String,
    pub contract_version: i32,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn information(
        action: ContractAction,
        ukprn: Option<i32>,
        contract_number: impl Into<String>,
        contract_version: i32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            action,
            severity: AuditSeverity::Information,
            ukprn,
            contract_number: contract_number.into(),
            contract_version,
            message: message.into(),
            recorded_at: Utc::now(),
        }
    }

    /// Audit record for a status change event
    pub fn from_event(event: &ContractStatusChangeEvent) -> Self {
        let message = match event.previous_status {
            Some(previous) => format!(
                "Contract [{}] version [{}] moved from [{}] to [{}] ({}).",
                event.contract_number, event.contract_version, previous, event.status, event.action
            ),
            None => format!(
                "Contract [{}] version [{}] {} with status [{}].",
                event.contract_number,
                event.contract_version,
                event.action.as_str().to_lowercase(),
                event.status
            ),
        };
        Self::information(
            event.action,
            Some(event.ukprn),
            event.contract_number.clone(),
            event.contract_version,
            message,
        )
    }

    /// Audit record for a superseded-version transition
    pub fn from_transition(transition: &StatusTransition) -> Self {
        Self::information(
            ContractAction::Replaced,
            Some(transition.ukprn),
            transition.contract_number.clone(),
            transition.contract_version,
            format!(
                "Contract [{}] version [{}] status changed from [{}] to [{}].",
                transition.contract_number,
                transition.contract_version,
                transition.previous_status,
                transition.new_status
            ),
        )
    }
}
