//! One-shot query command

use anyhow::{Context, Result};
use insightflow_core::models::QueryResponse;
use insightflow_core::query::answer_question;
use insightflow_core::{DataPaths, Datasets, SummarizerClient};

pub async fn cmd_ask(
    paths: &DataPaths,
    summarizer: &SummarizerClient,
    question: &str,
) -> Result<QueryResponse> {
    let datasets = Datasets::load(paths).with_context(|| {
        format!(
            "No aggregate tables in {} (run `insightflow aggregate` first)",
            paths.dir().display()
        )
    })?;
    let response = answer_question(question, &datasets, summarizer).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(response)
}
