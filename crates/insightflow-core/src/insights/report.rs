//! Full insights report: headline metrics plus alerts and recommendations

use serde::{Deserialize, Serialize};

use crate::aggregate::Datasets;
use crate::error::{Error, Result};
use crate::models::RevenueTrend;

use super::trend::{top_segment, worst_category, TrendSummary};

/// Structured insights recomputed from the current aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub revenue_change_percent: Option<f64>,
    pub revenue_trend: RevenueTrend,
    pub top_category: String,
    pub worst_category: String,
    /// `None` when the segment table is empty
    pub top_customer_segment: Option<String>,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Build the insights report from the three aggregate tables
pub fn generate_insights(datasets: &Datasets) -> Result<Insights> {
    let summary = TrendSummary::compute(datasets)?;
    let worst = worst_category(&datasets.revenue_by_category)
        .ok_or_else(|| Error::InvalidData("Category revenue table is empty".into()))?
        .category
        .clone();
    let top_customer_segment = top_segment(&datasets.customer_segments).map(|s| s.label());

    let declining = summary.revenue_trend == RevenueTrend::Declining;

    let mut alerts = Vec::new();
    if let (true, Some(pct)) = (declining, summary.revenue_change_percent) {
        alerts.push(format!(
            "Revenue declined {:.2}% between the first and last month on record",
            pct.abs()
        ));
    }

    let mut recommendations = Vec::new();
    if declining {
        recommendations
            .push("Investigate pricing and demand drivers behind the revenue decline".to_string());
    }
    recommendations.push(format!(
        "Double down on {}, the highest revenue category",
        summary.top_category
    ));
    recommendations.push(format!(
        "Analyze issues in {}, the lowest revenue category",
        worst
    ));

    Ok(Insights {
        revenue_change_percent: summary.revenue_change_percent,
        revenue_trend: summary.revenue_trend,
        top_category: summary.top_category,
        worst_category: worst,
        top_customer_segment,
        alerts,
        recommendations,
    })
}
