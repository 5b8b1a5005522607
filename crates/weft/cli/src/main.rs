//! `weft` command line interface.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "weft", version, about = "Intent-driven orchestration for CLOS fabrics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate fabric topology and external connectivity for an inventory.
    Validate {
        /// Inventory JSON file.
        #[arg(long, env = "WEFT_INVENTORY")]
        inventory: PathBuf,
    },

    /// Plan pending intents and print plans with risk, without applying.
    Plan {
        /// Inventory JSON file.
        #[arg(long, env = "WEFT_INVENTORY")]
        inventory: PathBuf,

        /// Intent JSON file.
        #[arg(long, env = "WEFT_INTENTS")]
        intents: PathBuf,
    },

    /// Run the periodic ingest-and-execute loop.
    Run(commands::run::RunArgs),

    /// Serve the authenticated plan-evaluation endpoint.
    McpServe(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Validate { inventory } => commands::validate::run(&inventory).await,
        Command::Plan { inventory, intents } => commands::plan::run(&inventory, &intents).await,
        Command::Run(args) => commands::run::run(args).await,
        Command::McpServe(args) => commands::serve::run(args).await,
    }
}
