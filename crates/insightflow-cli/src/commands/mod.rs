//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `aggregate` - Build and persist the aggregate tables
//! - `insights` - Print the insights report
//! - `ask` - One-shot question through the query router
//! - `serve` - Web server command

pub mod aggregate;
pub mod ask;
pub mod insights;
pub mod serve;

// Re-export command functions for main.rs
pub use aggregate::*;
pub use ask::*;
pub use insights::*;
pub use serve::*;

use anyhow::{Context, Result};
use insightflow_core::{Config, SummarizerClient};

/// Build the remote summarizer, failing when no credential is configured
pub fn build_summarizer(config: &Config) -> Result<SummarizerClient> {
    SummarizerClient::from_config(&config.summarizer)
        .context("Cannot start without a Hugging Face credential")
}
