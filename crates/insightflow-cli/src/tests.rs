//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;
use std::path::PathBuf;

use insightflow_core::ai::{MockBackend, SummaryFailure};
use insightflow_core::config::{Config, ENV_API_KEY};
use insightflow_core::models::{InsightSource, Intent, QueryResponse, RevenueTrend};
use insightflow_core::{DataPaths, SummarizerClient};
use tempfile::TempDir;

use crate::commands;

const SALES_CSV: &str = "Transaction ID,Date,Customer ID,Gender,Age,Product Category,Quantity,Price per Unit,Total Amount
1,2023-01-13,CUST001,Male,34,Electronics,1,500,500
2,2023-01-20,CUST002,Female,26,Clothing,2,250,500
3,2023-06-02,CUST003,Female,50,Clothing,3,300,900
4,2023-06-18,CUST004,Male,37,Electronics,1,170,170
";

/// Write the sample CSV and return (tempdir, csv path, data paths)
fn setup() -> (TempDir, PathBuf, DataPaths) {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("retail_sales_dataset.csv");
    fs::write(&csv, SALES_CSV).unwrap();
    let paths = DataPaths::new(dir.path().join("data"));
    (dir, csv, paths)
}

// ========== Aggregate Command Tests ==========

#[test]
fn test_cmd_aggregate_writes_tables() {
    let (_dir, csv, paths) = setup();

    let datasets = commands::cmd_aggregate(&csv, &paths).unwrap();
    assert_eq!(datasets.revenue_by_category.len(), 2);
    assert_eq!(datasets.monthly_revenue.len(), 2);
    assert_eq!(datasets.customer_segments.len(), 2);

    assert!(paths.category().exists());
    assert!(paths.monthly().exists());
    assert!(paths.segments().exists());
}

#[test]
fn test_cmd_aggregate_missing_input_fails() {
    let (dir, _csv, paths) = setup();
    let result = commands::cmd_aggregate(&dir.path().join("nope.csv"), &paths);
    assert!(result.is_err());
    assert!(!paths.category().exists());
}

#[test]
fn test_cmd_aggregate_malformed_date_fails() {
    let (dir, _csv, paths) = setup();
    let bad = dir.path().join("bad.csv");
    fs::write(
        &bad,
        "Date,Gender,Product Category,Total Amount\n13/45/2023,Male,Beauty,10\n",
    )
    .unwrap();

    let err = commands::cmd_aggregate(&bad, &paths).unwrap_err();
    assert!(format!("{:#}", err).contains("Unable to parse date"));
}

// ========== Insights Command Tests ==========

#[test]
fn test_cmd_insights() {
    let (_dir, csv, paths) = setup();
    commands::cmd_aggregate(&csv, &paths).unwrap();

    // January 1000 → June 1070
    let insights = commands::cmd_insights(&paths).unwrap();
    assert_eq!(insights.revenue_change_percent, Some(7.0));
    assert_eq!(insights.revenue_trend, RevenueTrend::Growing);
    assert_eq!(insights.top_category, "Clothing");
    assert_eq!(insights.worst_category, "Electronics");
}

#[test]
fn test_cmd_insights_without_tables_fails() {
    let (_dir, _csv, paths) = setup();
    assert!(commands::cmd_insights(&paths).is_err());
}

// ========== Ask Command Tests ==========

#[tokio::test]
async fn test_cmd_ask_with_summary() {
    let (_dir, csv, paths) = setup();
    commands::cmd_aggregate(&csv, &paths).unwrap();

    let summarizer = SummarizerClient::mock(MockBackend::replying("June outpaced January."));
    let response = commands::cmd_ask(&paths, &summarizer, "How is the monthly trend?")
        .await
        .unwrap();

    let QueryResponse::Answered(result) = response else {
        panic!("expected an answer");
    };
    assert_eq!(result.intent, Intent::MonthlyRevenue);
    assert_eq!(result.insight, "June outpaced January.");
    assert_eq!(result.source, InsightSource::Huggingface);
}

#[tokio::test]
async fn test_cmd_ask_falls_back() {
    let (_dir, csv, paths) = setup();
    commands::cmd_aggregate(&csv, &paths).unwrap();

    let summarizer = SummarizerClient::mock(MockBackend::failing(SummaryFailure::Timeout));
    let response = commands::cmd_ask(&paths, &summarizer, "top category")
        .await
        .unwrap();

    let QueryResponse::Answered(result) = response else {
        panic!("expected an answer");
    };
    assert_eq!(result.source, InsightSource::Fallback);
    assert!(result.insight.starts_with("Clothing is the highest"));
}

#[tokio::test]
async fn test_cmd_ask_unrecognized() {
    let (_dir, csv, paths) = setup();
    commands::cmd_aggregate(&csv, &paths).unwrap();

    let mock = MockBackend::default();
    let summarizer = SummarizerClient::mock(mock.clone());
    let response = commands::cmd_ask(&paths, &summarizer, "what is the weather")
        .await
        .unwrap();

    assert!(matches!(response, QueryResponse::NotUnderstood(_)));
    assert_eq!(mock.call_count(), 0);
}

// ========== Startup Tests ==========

#[test]
fn test_build_summarizer_requires_credential() {
    let config = Config::from_parts(None, |_| None).unwrap();
    let Err(err) = commands::build_summarizer(&config) else {
        panic!("summarizer built without a credential");
    };
    assert!(format!("{:#}", err).contains(ENV_API_KEY));

    let config = Config::from_parts(None, |key| {
        (key == ENV_API_KEY).then(|| "hf_test".to_string())
    })
    .unwrap();
    assert!(commands::build_summarizer(&config).is_ok());
}

#[tokio::test]
async fn test_cmd_serve_refuses_without_tables() {
    let (_dir, _csv, paths) = setup();
    let summarizer = SummarizerClient::mock(MockBackend::default());

    let result = commands::cmd_serve(&paths, summarizer, "127.0.0.1", 0, vec![]).await;
    assert!(result.is_err());
}
