//! ContractX CLI
//!
//! Command-line interface for the contract lifecycle service

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod context;

#[derive(Debug, Parser)]
#[command(name = "contractx")]
#[command(about = "ContractX - Contract lifecycle management", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./contractx.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a new contract version
    Create(commands::create::CreateArgs),
    /// Approve a published contract on the agency's authority
    Approve(commands::approval::ApproveArgs),
    /// Confirm an approval awaiting provider confirmation
    Confirm(commands::approval::ConfirmArgs),
    /// Withdraw a published contract
    Withdraw(commands::withdraw::WithdrawArgs),
    /// List contracts due a reminder email
    Reminders(commands::reminders::RemindersArgs),
    /// Record that a reminder email was sent
    ReminderSent(commands::reminders::ReminderSentArgs),
    /// Show a stored contract
    Show(commands::show::ShowArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match context::AppContext::build(cli.config.as_deref()) {
        Ok(ctx) => match cli.command {
            Commands::Create(args) => commands::create::execute(&ctx, args).await,
            Commands::Approve(args) => commands::approval::execute_approve(&ctx, args).await,
            Commands::Confirm(args) => commands::approval::execute_confirm(&ctx, args).await,
            Commands::Withdraw(args) => commands::withdraw::execute(&ctx, args).await,
            Commands::Reminders(args) => commands::reminders::execute_list(&ctx, args).await,
            Commands::ReminderSent(args) => commands::reminders::execute_sent(&ctx, args).await,
            Commands::Show(args) => commands::show::execute(&ctx, args).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
