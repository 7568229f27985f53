//! Main entry point for the NFT bot.
//!
//! This file initializes logging and the environment, parses the CLI, and
//! dispatches to the command handlers and multi-chain driver services.

mod cli;
mod commands;
mod config;
mod metadata;
mod services;
mod store;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = cli::Cli::parse();
    let settings = config::Settings::from_env();
    cli::run(cli, settings).await
}
