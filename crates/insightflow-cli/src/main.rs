//! InsightFlow CLI - Retail sales analytics
//!
//! Usage:
//!   insightflow aggregate --input sales.csv   Build the aggregate tables
//!   insightflow insights                      Print the insights report
//!   insightflow ask "monthly trend?"          Answer one question
//!   insightflow serve --port 8000             Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::Parser;
use insightflow_core::{Config, DataPaths};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let paths = DataPaths::new(&config.data_dir);

    match cli.command {
        Commands::Aggregate { input } => commands::cmd_aggregate(&input, &paths).map(|_| ()),
        Commands::Insights => commands::cmd_insights(&paths).map(|_| ()),
        Commands::Ask { question } => {
            let summarizer = commands::build_summarizer(&config)?;
            commands::cmd_ask(&paths, &summarizer, &question)
                .await
                .map(|_| ())
        }
        Commands::Serve {
            port,
            host,
            allowed_origins,
        } => {
            let summarizer = commands::build_summarizer(&config)?;
            commands::cmd_serve(&paths, summarizer, &host, port, allowed_origins).await
        }
    }
}
