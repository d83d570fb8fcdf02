//! InsightFlow Core Library
//!
//! Shared functionality for the InsightFlow retail analytics service:
//! - CSV import of raw transactions
//! - Aggregation into category, monthly, and customer-segment tables
//! - Insight generation (trend, rankings, alerts, recommendations)
//! - Keyword query router with remote summarization and fallback
//! - Hugging Face Inference backend behind a pluggable summarizer trait
//! - Layered configuration (defaults, TOML file, environment)

pub mod aggregate;
pub mod ai;
pub mod config;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;
pub mod query;

/// Test utilities including mock Hugging Face server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{DataPaths, Datasets};
pub use ai::{
    HuggingFaceBackend, MockBackend, Summarizer, SummarizerClient, SummaryFailure, SummaryResult,
};
pub use config::{Config, SummarizerConfig};
pub use error::{Error, Result};
pub use insights::{generate_insights, Insights, TrendSummary};
pub use query::{answer_question, detect_intent, QueryContext};
