use std::cmp::Ordering;

use super::paging::SortBy;
use crate::model::{named_enum, Contract};

named_enum! {
    /// Contract fields a listing can be ordered by
    pub enum ContractSortField as "sort_field" {
        Id,
        ContractNumber,
        ContractVersion,
        Ukprn,
        Title,
        Value,
        FundingType,
        ContractType,
        Status,
        CreatedAt,
        LastUpdatedAt,
        LastEmailReminderSent,
        SignedOn,
    }
}

impl SortBy<ContractSortField> for Contract {
    fn compare_by(&self, other: &Self, field: ContractSortField) -> Ordering {
        match field {
            ContractSortField::Id => self.id.cmp(&other.id),
            ContractSortField::ContractNumber => self.contract_number.cmp(&other.contract_number),
            ContractSortField::ContractVersion => {
                self.contract_version.cmp(&other.contract_version)
            }
            ContractSortField::Ukprn => self.ukprn.cmp(&other.ukprn),
            ContractSortField::Title => self.title.cmp(&other.title),
            ContractSortField::Value => self.value_in_pence.cmp(&other.value_in_pence),
            ContractSortField::FundingType => self.funding_type.cmp(&other.funding_type),
            ContractSortField::ContractType => self.contract_type.cmp(&other.contract_type),
            ContractSortField::Status => self.status.cmp(&other.status),
            ContractSortField::CreatedAt => self.created_at.cmp(&other.created_at),
            ContractSortField::LastUpdatedAt => self.last_updated_at.cmp(&other.last_updated_at),
            ContractSortField::LastEmailReminderSent => self
                .last_email_reminder_sent
                .cmp(&other.last_email_reminder_sent),
            ContractSortField::SignedOn => self.signed_on.cmp(&other.signed_on),
        }
    }
}
