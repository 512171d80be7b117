//! DI catalog CLI - palette, routing and backend tools.
//!
//! # Usage
//!
//! ```bash
//! # List the fixed color palette
//! dicat palette
//!
//! # List routes and their links under hash history
//! dicat routes --history hash
//!
//! # Show which view a browser location opens
//! dicat resolve "https://tienda.example/#/di-admin"
//!
//! # Verify configuration and backend connectivity
//! dicat check
//!
//! # Insert products from a YAML file
//! dicat seed products.yaml
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use di_catalog_core::HistoryMode;

mod commands;

#[derive(Parser)]
#[command(name = "dicat")]
#[command(author, version, about = "DI catalog CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product color palette
    Palette,
    /// List the route table
    Routes {
        /// URL addressing strategy (`path` or `hash`)
        #[arg(long, env = "ROUTER_HISTORY", default_value_t = HistoryMode::Hash)]
        history: HistoryMode,
    },
    /// Show the view a browser location resolves to
    Resolve {
        /// Absolute URL or origin-relative location (e.g. `/#/di-admin`)
        location: String,

        /// URL addressing strategy (`path` or `hash`)
        #[arg(long, env = "ROUTER_HISTORY", default_value_t = HistoryMode::Hash)]
        history: HistoryMode,
    },
    /// Load configuration and query the backend once
    Check,
    /// Insert products from a YAML file
    Seed {
        /// Path to the YAML product list
        file: PathBuf,

        /// Validate the file without inserting anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    // Let `.env` supply defaults such as ROUTER_HISTORY
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Palette => commands::palette::list(),
        Commands::Routes { history } => commands::routes::list(history),
        Commands::Resolve { location, history } => {
            commands::routes::resolve(history, &location);
        }
        Commands::Check => commands::check::run().await?,
        Commands::Seed { file, dry_run } => commands::seed::products(&file, dry_run).await?,
    }
    Ok(())
}
