//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// InsightFlow - Retail sales analytics with AI-written insights
#[derive(Parser)]
#[command(name = "insightflow")]
#[command(about = "Aggregate retail transactions and serve insights over HTTP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.config/insightflow/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the aggregate tables (overrides config and INSIGHTFLOW_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the category, monthly, and customer-segment tables from a transactions CSV
    Aggregate {
        /// Transactions CSV (Date, Gender, Product Category, Total Amount)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Additional allowed CORS origin (repeatable)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },

    /// Print trend, rankings, alerts, and recommendations
    Insights,

    /// Ask a question about the aggregates
    Ask {
        /// Free-text question, e.g. "Which category sells best?"
        question: String,
    },
}
