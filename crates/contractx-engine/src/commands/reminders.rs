use chrono::Utc;
use contractx_core::errors::{ExError, ExErrorKind};
use contractx_core::model::Contract;
use contractx_core::queries::{
    reminder_cutoff, sort_and_page, ContractReminderItem, ContractReminders, ContractSortField,
    PageRequest, PagingMetadata, SortDirection,
};
use contractx_core::{log_op_end, log_op_error, log_op_start};

use super::{elapsed_ms, ContractService};
use crate::Result;

/// Link template used when the caller does not supply one
pub const DEFAULT_REMINDER_PATH: &str = "/api/contractReminders?page={page}";

/// Page, order and link template for a reminder listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderQuery {
    pub page_number: usize,
    pub page_size: usize,
    pub sort_field: ContractSortField,
    pub sort_direction: SortDirection,
    /// Path containing `{page}`, joined onto the configured base URL
    pub path_template: String,
}

impl ReminderQuery {
    pub fn new(page_number: usize, page_size: usize) -> Self {
        Self {
            page_number,
            page_size,
            sort_field: ContractSortField::Id,
            sort_direction: SortDirection::Asc,
            path_template: DEFAULT_REMINDER_PATH.to_string(),
        }
    }

    pub fn sorted_by(mut self, field: ContractSortField, direction: SortDirection) -> Self {
        self.sort_field = field;
        self.sort_direction = direction;
        self
    }

    pub fn with_path_template(mut self, template: impl Into<String>) -> Self {
        self.path_template = template.into();
        self
    }
}

impl ContractService {
    /// One page of published contracts due a reminder email
    ///
    /// `Ok(None)` when no contract is due at all; `ERR_NOT_FOUND` when
    /// contracts are due but the page lies beyond them.
    pub async fn get_contract_reminders(
        &self,
        query: ReminderQuery,
    ) -> Result<Option<ContractReminders>> {
        log_op_start!(
            "get_contract_reminders",
            page_number = query.page_number as u64,
            page_size = query.page_size as u64,
            sort_field = %query.sort_field
        );
        let start = std::time::Instant::now();

        let reminders = self.get_contract_reminders_impl(&query).await.map_err(|e| {
            log_op_error!(
                "get_contract_reminders",
                e.clone(),
                duration_ms = elapsed_ms(start)
            );
            e
        })?;

        log_op_end!(
            "get_contract_reminders",
            duration_ms = elapsed_ms(start),
            total_count = reminders
                .as_ref()
                .map(|r| r.paging.total_count as u64)
                .unwrap_or(0)
        );

        Ok(reminders)
    }

    async fn get_contract_reminders_impl(
        &self,
        query: &ReminderQuery,
    ) -> Result<Option<ContractReminders>> {
        let page = PageRequest::new(query.page_number, query.page_size)?;
        let cutoff = reminder_cutoff(Utc::now().date_naive(), self.config.reminder_interval_days);

        let candidates = self.repository.query_reminder_candidates(cutoff).await?;
        let paged = sort_and_page(candidates, query.sort_field, query.sort_direction, page);

        if paged.is_empty_result() {
            return Ok(None);
        }
        if paged.is_past_end() {
            return Err(ExError::new(ExErrorKind::NotFound)
                .with_op("get_contract_reminders")
                .with_message(format!(
                    "Page {} is beyond the last page ({})",
                    paged.current_page, paged.total_pages
                )));
        }

        let paging =
            PagingMetadata::from_page(&paged, &query.path_template, self.uri_builder.as_ref());
        let contracts = paged
            .items
            .into_iter()
            .map(ContractReminderItem::from)
            .collect();

        Ok(Some(ContractReminders { contracts, paging }))
    }

    /// Record that a reminder email went out for contract `id`
    ///
    /// An unknown id is logged as an error and answered with `Ok(None)`.
    pub async fn mark_reminder_sent(&self, id: i64) -> Result<Option<Contract>> {
        log_op_start!("mark_reminder_sent", contract_id = id);
        let start = std::time::Instant::now();

        let updated = self.mark_reminder_sent_impl(id).await.map_err(|e| {
            log_op_error!("mark_reminder_sent", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

        match &updated {
            Some(contract) => tracing::info!(
                contract_id = id,
                contract_number = %contract.contract_number,
                contract_version = contract.contract_version,
                "reminder sent recorded"
            ),
            None => tracing::error!(contract_id = id, "no contract to record reminder against"),
        }
        log_op_end!(
            "mark_reminder_sent",
            duration_ms = elapsed_ms(start),
            found = updated.is_some()
        );

        Ok(updated)
    }

    async fn mark_reminder_sent_impl(&self, id: i64) -> Result<Option<Contract>> {
        if self.repository.get_by_id(id).await?.is_none() {
            return Ok(None);
        }

        let updated = self
            .repository
            .update_last_email_reminder_sent(id, Utc::now())
            .await?;
        Ok(Some(updated))
    }
}
