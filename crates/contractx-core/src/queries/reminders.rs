//! Reminder listing: cutoff computation, result shape and page links

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::paging::PagedList;
use crate::model::{Contract, ContractStatus, FundingType};

/// Placeholder substituted with the page number in link templates
pub const PAGE_NUMBER_PLACEHOLDER: &str = "{page}";

/// Contracts last touched at or before this instant are due a reminder
///
/// `today` at 23:59 UTC, minus `interval_days`.
pub fn reminder_cutoff(today: NaiveDate, interval_days: u32) -> DateTime<Utc> {
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN);
    today.and_time(end_of_day).and_utc() - Duration::days(i64::from(interval_days))
}

/// Turns a page-number path template into an absolute URL
pub trait UriBuilder: Send + Sync {
    fn page_url(&self, path_template: &str, page_number: usize) -> String;
}

/// Joins templates onto a fixed base URL
#[derive(Debug, Clone)]
pub struct BaseUrlUriBuilder {
    base_url: String,
}

impl BaseUrlUriBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl UriBuilder for BaseUrlUriBuilder {
    fn page_url(&self, path_template: &str, page_number: usize) -> String {
        let path = path_template.replace(PAGE_NUMBER_PLACEHOLDER, &page_number.to_string());
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Contract summary returned by the reminder listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractReminderItem {
    pub id: i64,
    pub contract_number: String,
    pub contract_version: i32,
    pub ukprn: i32,
    pub title: String,
    pub status: ContractStatus,
    pub funding_type: FundingType,
    pub created_at: DateTime<Utc>,
    pub last_email_reminder_sent: Option<DateTime<Utc>>,
}

impl From<Contract> for ContractReminderItem {
    fn from(contract: Contract) -> Self {
        Self {
            id: contract.id,
            contract_number: contract.contract_number,
            contract_version: contract.contract_version,
            ukprn: contract.ukprn,
            title: contract.title,
            status: contract.status,
            funding_type: contract.funding_type,
            created_at: contract.created_at,
            last_email_reminder_sent: contract.last_email_reminder_sent,
        }
    }
}

/// Paging metadata with navigable links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagingMetadata {
    pub total_count: usize,
    pub page_size: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub next_page_url: Option<String>,
    pub previous_page_url: Option<String>,
}

impl PagingMetadata {
    pub fn from_page<T>(page: &PagedList<T>, path_template: &str, uri: &dyn UriBuilder) -> Self {
        Self {
            total_count: page.total_count,
            page_size: page.page_size,
            current_page: page.current_page,
            total_pages: page.total_pages,
            has_next_page: page.has_next(),
            has_previous_page: page.has_previous(),
            next_page_url: page
                .next_page_number()
                .map(|n| uri.page_url(path_template, n)),
            previous_page_url: page
                .previous_page_number()
                .map(|n| uri.page_url(path_template, n)),
        }
    }
}

/// One page of contracts due a reminder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractReminders {
    pub contracts: Vec<ContractReminderItem>,
    pub paging: PagingMetadata,
}
