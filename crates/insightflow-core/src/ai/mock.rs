//! Mock backend for testing
//!
//! Returns a fixed reply (or a fixed failure) and records every prompt it
//! receives, so tests can assert both the answer and whether a call happened.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{Summarizer, SummaryFailure, SummaryResult};

/// Mock summarizer
///
/// Clones share call counters, so a test can keep one handle and pass another
/// into the code under test.
#[derive(Clone)]
pub struct MockBackend {
    reply: SummaryResult,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::replying("Mock insight")
    }
}

impl MockBackend {
    /// Mock that always succeeds with `text`
    pub fn replying(text: &str) -> Self {
        Self::with_reply(Ok(text.to_string()))
    }

    /// Mock that always fails with `failure`
    pub fn failing(failure: SummaryFailure) -> Self {
        Self::with_reply(Err(failure))
    }

    fn with_reply(reply: SummaryResult) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of summarize calls so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most recent prompt received, if any
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok().and_then(|p| p.last().cloned())
    }
}

#[async_trait]
impl Summarizer for MockBackend {
    async fn summarize(&self, prompt: &str) -> SummaryResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.reply.clone()
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
