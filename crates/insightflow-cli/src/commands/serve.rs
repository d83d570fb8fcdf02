//! Server command implementation

use anyhow::{Context, Result};
use insightflow_core::ai::Summarizer;
use insightflow_core::{DataPaths, Datasets, SummarizerClient};

pub async fn cmd_serve(
    paths: &DataPaths,
    summarizer: SummarizerClient,
    host: &str,
    port: u16,
    allowed_origins: Vec<String>,
) -> Result<()> {
    // Refuse to start on missing or malformed tables rather than failing every request
    Datasets::load(paths).with_context(|| {
        format!(
            "No aggregate tables in {} (run `insightflow aggregate` first)",
            paths.dir().display()
        )
    })?;

    println!("🚀 Starting InsightFlow web server...");
    println!("   Data: {}", paths.dir().display());
    println!("   Summarizer: {} ({})", summarizer.host(), summarizer.model());
    println!("   Listening: http://{}:{}", host, port);
    if !allowed_origins.is_empty() {
        println!("   CORS origins: {}", allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = insightflow_server::ServerConfig { allowed_origins };
    insightflow_server::serve(paths.clone(), summarizer, host, port, config).await?;

    Ok(())
}
