//! Contract creation command

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use contractx_core::model::{ContractContent, CreateContractRequest};

use crate::context::{print_json, AppContext};

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// JSON create request
    #[arg(long)]
    pub request: PathBuf,

    /// Original contract XML to upload under the request's file name
    #[arg(long)]
    pub xml: Option<PathBuf>,

    /// Contract PDF to attach as the contract content
    #[arg(long)]
    pub pdf: Option<PathBuf>,
}

pub async fn execute(ctx: &AppContext, args: CreateArgs) -> Result<(), Box<dyn Error>> {
    let raw = tokio::fs::read_to_string(&args.request).await?;
    let mut request: CreateContractRequest = serde_json::from_str(&raw)?;

    if let Some(xml) = &args.xml {
        let bytes = tokio::fs::read(xml).await?;
        ctx.blobs.put(&request.file_name, &bytes).await?;
    }

    if let Some(pdf) = &args.pdf {
        let bytes = tokio::fs::read(pdf).await?;
        let file_name = pdf
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or("PDF path has no file name")?;
        request.contract_content = Some(ContractContent::new(file_name, bytes));
    }

    let created = ctx.service.create_contract(request).await?;
    print_json(&created)
}
