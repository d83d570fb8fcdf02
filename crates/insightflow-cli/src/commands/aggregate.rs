//! Aggregation command

use std::path::Path;

use anyhow::{Context, Result};
use insightflow_core::import::load_transactions;
use insightflow_core::{DataPaths, Datasets};

pub fn cmd_aggregate(input: &Path, paths: &DataPaths) -> Result<Datasets> {
    let transactions = load_transactions(input)
        .with_context(|| format!("Failed to load transactions from {}", input.display()))?;

    let datasets = Datasets::from_transactions(&transactions);
    datasets
        .write(paths)
        .with_context(|| format!("Failed to write tables to {}", paths.dir().display()))?;

    println!("📊 Aggregated {} transactions", transactions.len());
    println!(
        "   {} categories → {}",
        datasets.revenue_by_category.len(),
        paths.category().display()
    );
    println!(
        "   {} months     → {}",
        datasets.monthly_revenue.len(),
        paths.monthly().display()
    );
    println!(
        "   {} segments   → {}",
        datasets.customer_segments.len(),
        paths.segments().display()
    );

    Ok(datasets)
}
