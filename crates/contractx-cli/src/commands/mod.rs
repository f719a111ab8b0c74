//! CLI subcommands

pub mod approval;
pub mod create;
pub mod reminders;
pub mod show;
pub mod withdraw;

use clap::Args;
use contractx_core::model::ContractRequest;

/// Flags naming one stored contract version
#[derive(Debug, Args)]
pub struct TargetArgs {
    #[arg(long)]
    pub number: String,

    #[arg(long)]
    pub version: i32,

    /// Name of the original contract XML in blob storage
    #[arg(long)]
    pub file_name: String,

    /// Surrogate id; checked against the stored contract when given
    #[arg(long)]
    pub id: Option<i64>,
}

impl TargetArgs {
    pub fn to_request(&self) -> ContractRequest {
        let request = ContractRequest::new(self.number.clone(), self.version, self.file_name.clone());
        match self.id {
            Some(id) => request.with_id(id),
            None => request,
        }
    }
}
