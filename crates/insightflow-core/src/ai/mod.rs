//! Remote summarizer abstraction
//!
//! # Architecture
//!
//! - `Summarizer` trait: turns a prompt into one piece of generated text
//! - `SummarizerClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `HuggingFaceBackend`, `MockBackend`
//!
//! A summarizer never raises: every failure mode (network error, timeout,
//! non-200 status, unexpected body) comes back as a `SummaryFailure` so the
//! caller decides what to substitute.

mod huggingface;
mod mock;

pub use huggingface::{parse_generated_text, HuggingFaceBackend};
pub use mock::MockBackend;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SummarizerConfig;
use crate::error::Result;

/// Why a summarization attempt produced no usable text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryFailure {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

/// Generated text, or the reason there is none
pub type SummaryResult = std::result::Result<String, SummaryFailure>;

/// Interface for text-generation backends
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Generate text for a fully-built prompt. Attempted exactly once.
    async fn summarize(&self, prompt: &str) -> SummaryResult;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete summarizer client enum
#[derive(Clone)]
pub enum SummarizerClient {
    /// Hugging Face Inference API
    HuggingFace(HuggingFaceBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl SummarizerClient {
    /// Create the Hugging Face client from configuration
    ///
    /// Fails when no credential is configured.
    pub fn from_config(config: &SummarizerConfig) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Ok(SummarizerClient::HuggingFace(HuggingFaceBackend::new(
            &config.base_url,
            &config.model,
            api_key,
            config.timeout,
        )))
    }

    /// Create a mock backend for testing
    pub fn mock(backend: MockBackend) -> Self {
        SummarizerClient::Mock(backend)
    }
}

#[async_trait]
impl Summarizer for SummarizerClient {
    async fn summarize(&self, prompt: &str) -> SummaryResult {
        match self {
            SummarizerClient::HuggingFace(b) => b.summarize(prompt).await,
            SummarizerClient::Mock(b) => b.summarize(prompt).await,
        }
    }

    fn model(&self) -> &str {
        match self {
            SummarizerClient::HuggingFace(b) => b.model(),
            SummarizerClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            SummarizerClient::HuggingFace(b) => b.host(),
            SummarizerClient::Mock(b) => b.host(),
        }
    }
}
