//! Manual approval and confirmation commands

use std::error::Error;

use clap::Args;
use contractx_core::model::ApprovalRequest;

use super::TargetArgs;
use crate::context::{print_json, AppContext};

#[derive(Debug, Args)]
pub struct ApproveArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Approving user, recorded in the signing stamp
    #[arg(long)]
    pub principal: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfirmArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub async fn execute_approve(ctx: &AppContext, args: ApproveArgs) -> Result<(), Box<dyn Error>> {
    let request = ApprovalRequest {
        contract: args.target.to_request(),
        principal_id: args.principal,
    };
    let approved = ctx.service.manual_approve(request).await?;
    print_json(&approved)
}

pub async fn execute_confirm(ctx: &AppContext, args: ConfirmArgs) -> Result<(), Box<dyn Error>> {
    let event = ctx.service.confirm_approval(args.target.to_request()).await?;
    print_json(&event)
}
