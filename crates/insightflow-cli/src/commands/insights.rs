//! Insights report command

use anyhow::{Context, Result};
use insightflow_core::insights::{generate_insights, Insights};
use insightflow_core::{DataPaths, Datasets};

pub fn cmd_insights(paths: &DataPaths) -> Result<Insights> {
    let datasets = Datasets::load(paths).with_context(|| {
        format!(
            "No aggregate tables in {} (run `insightflow aggregate` first)",
            paths.dir().display()
        )
    })?;
    let insights = generate_insights(&datasets)?;

    println!("{}", serde_json::to_string_pretty(&insights)?);
    Ok(insights)
}
