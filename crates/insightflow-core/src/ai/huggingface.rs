//! Hugging Face Inference backend
//!
//! Calls `POST {base_url}/models/{model}` with a bearer token and the prompt
//! as `inputs`. The provider has answered in two shapes over time:
//!
//! ```json
//! [{"generated_text": "..."}]
//! {"generated_text": "..."}
//! ```
//!
//! Both are accepted; anything else is reported as `UnexpectedShape`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{Summarizer, SummaryFailure, SummaryResult};

const GENERATED_TEXT_FIELD: &str = "generated_text";

/// Hugging Face Inference API client
#[derive(Clone)]
pub struct HuggingFaceBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl HuggingFaceBackend {
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    use_cache: bool,
}

#[async_trait]
impl Summarizer for HuggingFaceBackend {
    async fn summarize(&self, prompt: &str) -> SummaryResult {
        let request = InferenceRequest {
            inputs: prompt,
            options: InferenceOptions { use_cache: false },
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_failure)?;
        debug!(status = %status, body = %body, "Hugging Face response");

        if status != StatusCode::OK {
            return Err(SummaryFailure::Status(status.as_u16()));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| SummaryFailure::UnexpectedShape(format!("invalid JSON: {}", e)))?;
        parse_generated_text(&value)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

fn transport_failure(err: reqwest::Error) -> SummaryFailure {
    if err.is_timeout() {
        SummaryFailure::Timeout
    } else {
        SummaryFailure::Transport(err.to_string())
    }
}

/// Extract trimmed generated text from either known response shape
///
/// Empty text after trimming counts as a failure so callers never show a
/// blank insight.
pub fn parse_generated_text(value: &Value) -> SummaryResult {
    let holder = match value {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| SummaryFailure::UnexpectedShape("empty array".into()))?,
        Value::Object(_) => value,
        other => {
            return Err(SummaryFailure::UnexpectedShape(format!(
                "expected array or object, got {}",
                json_kind(other)
            )))
        }
    };

    let text = holder
        .get(GENERATED_TEXT_FIELD)
        .ok_or_else(|| SummaryFailure::UnexpectedShape("missing generated_text".into()))?
        .as_str()
        .ok_or_else(|| SummaryFailure::UnexpectedShape("generated_text is not a string".into()))?
        .trim();

    if text.is_empty() {
        return Err(SummaryFailure::UnexpectedShape(
            "generated_text is empty".into(),
        ));
    }

    Ok(text.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
