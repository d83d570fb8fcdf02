//! Data models for InsightFlow

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Largest magnitude below which every whole `f64` is an exact integer (2^53)
const MAX_EXACT_WHOLE: f64 = 9_007_199_254_740_992.0;

/// Serialize whole-number amounts as integers (`1200`, not `1200.0`)
fn serialize_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if amount.fract() == 0.0 && amount.abs() < MAX_EXACT_WHOLE {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

/// A single retail transaction as loaded from the source file
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub gender: String,
    pub category: String,
    pub amount: f64,
}

/// Revenue summed per product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRevenue {
    #[serde(rename = "Product Category")]
    pub category: String,
    #[serde(rename = "Total Amount", serialize_with = "serialize_amount")]
    pub total_amount: f64,
}

/// Revenue summed per calendar month (`YYYY-MM`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Total Amount", serialize_with = "serialize_amount")]
    pub total_amount: f64,
}

/// Revenue summed per (gender, product category) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSegment {
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Product Category")]
    pub category: String,
    #[serde(rename = "Total Amount", serialize_with = "serialize_amount")]
    pub total_amount: f64,
}

impl CustomerSegment {
    /// Display label, e.g. "Female - Clothing"
    pub fn label(&self) -> String {
        format!("{} - {}", self.gender, self.category)
    }
}

/// Direction of revenue between the first and last month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueTrend {
    Declining,
    Stable,
    Growing,
    /// First month had zero revenue (or there was nothing to compare)
    Undefined,
}

impl RevenueTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevenueTrend::Declining => "declining",
            RevenueTrend::Stable => "stable",
            RevenueTrend::Growing => "growing",
            RevenueTrend::Undefined => "undefined",
        }
    }
}

impl fmt::Display for RevenueTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Topic a free-text question is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    RevenueByCategory,
    MonthlyRevenue,
    CustomerSegments,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::RevenueByCategory => "revenue_by_category",
            Intent::MonthlyRevenue => "monthly_revenue",
            Intent::CustomerSegments => "customer_segments",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chart type suggested alongside a query answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visualization {
    BarChart,
    LineChart,
    StackedBar,
}

impl Visualization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visualization::BarChart => "bar_chart",
            Visualization::LineChart => "line_chart",
            Visualization::StackedBar => "stacked_bar",
        }
    }
}

impl fmt::Display for Visualization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the insight text in a query answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSource {
    /// Generated by the Hugging Face Inference API
    Huggingface,
    /// Precomputed fallback sentence
    Fallback,
}

impl InsightSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightSource::Huggingface => "huggingface",
            InsightSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for InsightSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Answer to a recognized question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub question: String,
    pub intent: Intent,
    pub insight: String,
    pub recommended_visualization: Visualization,
    pub source: InsightSource,
}

/// Payload returned when a question matches no supported topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryNotUnderstood {
    pub error: String,
    pub hint: String,
}

impl Default for QueryNotUnderstood {
    fn default() -> Self {
        Self {
            error: "Query not understood".to_string(),
            hint: "Try asking about revenue, monthly trends, or customer segments".to_string(),
        }
    }
}

/// Outcome of routing a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Answered(QueryResult),
    NotUnderstood(QueryNotUnderstood),
}
