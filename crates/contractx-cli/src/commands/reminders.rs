//! Reminder listing and reminder-sent commands

use std::error::Error;

use clap::Args;
use contractx_core::queries::{ContractSortField, SortDirection};
use contractx_engine::ReminderQuery;

use crate::context::{print_json, AppContext};

#[derive(Debug, Args)]
pub struct RemindersArgs {
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Defaults to the configured reminder page size
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Sort field, e.g. Id, ContractNumber, LastEmailReminderSent
    #[arg(long, default_value = "Id")]
    pub sort: String,

    /// Asc or Desc
    #[arg(long, default_value = "Asc")]
    pub order: String,
}

#[derive(Debug, Args)]
pub struct ReminderSentArgs {
    #[arg(long)]
    pub id: i64,
}

pub async fn execute_list(ctx: &AppContext, args: RemindersArgs) -> Result<(), Box<dyn Error>> {
    let sort: ContractSortField = args.sort.parse()?;
    let order: SortDirection = args.order.parse()?;
    let page_size = args
        .page_size
        .unwrap_or(ctx.service.config().reminder_page_size);

    let query = ReminderQuery::new(args.page, page_size).sorted_by(sort, order);
    match ctx.service.get_contract_reminders(query).await? {
        Some(reminders) => print_json(&reminders),
        None => {
            eprintln!("No contracts are due a reminder");
            Ok(())
        }
    }
}

pub async fn execute_sent(ctx: &AppContext, args: ReminderSentArgs) -> Result<(), Box<dyn Error>> {
    match ctx.service.mark_reminder_sent(args.id).await? {
        Some(contract) => print_json(&contract),
        None => Err(format!("No contract with id {}", args.id).into()),
    }
}
