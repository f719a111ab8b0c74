//! Contract lookup command

use std::error::Error;

use clap::Args;

use crate::context::{print_json, AppContext};

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(long, conflicts_with_all = ["number", "version"])]
    pub id: Option<i64>,

    #[arg(long, requires = "version")]
    pub number: Option<String>,

    #[arg(long, requires = "number")]
    pub version: Option<i32>,
}

pub async fn execute(ctx: &AppContext, args: ShowArgs) -> Result<(), Box<dyn Error>> {
    let contract = match (args.id, args.number, args.version) {
        (Some(id), _, _) => ctx.service.get_contract(id).await?,
        (None, Some(number), Some(version)) => {
            ctx.service.get_by_number_and_version(&number, version).await?
        }
        _ => return Err("Must specify either --id or --number with --version".into()),
    };
    print_json(&contract)
}
