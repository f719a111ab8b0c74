//! Withdrawal command

use std::error::Error;

use clap::{Args, ValueEnum};
use contractx_core::model::{ContractStatus, WithdrawalRequest};

use super::TargetArgs;
use crate::context::{print_json, AppContext};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WithdrawnBy {
    Agency,
    Provider,
}

impl From<WithdrawnBy> for ContractStatus {
    fn from(by: WithdrawnBy) -> Self {
        match by {
            WithdrawnBy::Agency => ContractStatus::WithdrawnByAgency,
            WithdrawnBy::Provider => ContractStatus::WithdrawnByProvider,
        }
    }
}

#[derive(Debug, Args)]
pub struct WithdrawArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(long = "by", value_enum)]
    pub withdrawn_by: WithdrawnBy,
}

pub async fn execute(ctx: &AppContext, args: WithdrawArgs) -> Result<(), Box<dyn Error>> {
    let request = WithdrawalRequest {
        contract: args.target.to_request(),
        withdrawal_type: args.withdrawn_by.into(),
    };
    let withdrawn = ctx.service.withdraw(request).await?;
    print_json(&withdrawn)
}
