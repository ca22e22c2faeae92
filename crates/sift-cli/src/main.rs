//! Sift CLI
//!
//! Command-line front end for compiling, running, and indexing filtered
//! search queries.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;

use cli::Cli;
use config::SiftConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable JSON
    let default_filter = if cli.verbose { "info,sift=debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SiftConfig::load(cli.config.as_deref())?.with_overrides(cli.url, cli.index);
    tracing::debug!(index = %config.index, url = %config.engine.url, "configuration loaded");

    commands::run(cli.command, &config).await
}
