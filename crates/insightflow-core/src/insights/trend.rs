//! Trend and ranking computations shared by every insight consumer

use serde::{Deserialize, Serialize};

use crate::aggregate::Datasets;
use crate::error::{Error, Result};
use crate::models::{CategoryRevenue, CustomerSegment, MonthlyRevenue, RevenueTrend};

/// Change (in percent) beyond which revenue counts as growing or declining.
/// Exactly ±5% is still stable.
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

/// Percent change from `first` to `last`, rounded to two decimals
///
/// Returns `None` when `first` is zero, since the change is undefined.
pub fn percent_change(first: f64, last: f64) -> Option<f64> {
    if first == 0.0 {
        return None;
    }
    let pct = (last - first) / first * 100.0;
    Some((pct * 100.0).round() / 100.0)
}

/// Classify a percent change against the ±5% band
pub fn classify_trend(change_percent: Option<f64>) -> RevenueTrend {
    match change_percent {
        None => RevenueTrend::Undefined,
        Some(pct) if pct > TREND_THRESHOLD_PERCENT => RevenueTrend::Growing,
        Some(pct) if pct < -TREND_THRESHOLD_PERCENT => RevenueTrend::Declining,
        Some(_) => RevenueTrend::Stable,
    }
}

/// Category with the highest revenue; earlier rows win ties
pub fn top_category(rows: &[CategoryRevenue]) -> Option<&CategoryRevenue> {
    let mut sorted: Vec<&CategoryRevenue> = rows.iter().collect();
    // sort_by is stable, so equal totals keep input order
    sorted.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    sorted.into_iter().next()
}

/// Category with the lowest revenue; earlier rows win ties
pub fn worst_category(rows: &[CategoryRevenue]) -> Option<&CategoryRevenue> {
    let mut sorted: Vec<&CategoryRevenue> = rows.iter().collect();
    sorted.sort_by(|a, b| a.total_amount.total_cmp(&b.total_amount));
    sorted.into_iter().next()
}

/// Customer segment with the highest revenue; earlier rows win ties
pub fn top_segment(rows: &[CustomerSegment]) -> Option<&CustomerSegment> {
    let mut sorted: Vec<&CustomerSegment> = rows.iter().collect();
    sorted.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    sorted.into_iter().next()
}

/// Headline numbers served by `GET /insights` and reused by the full report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub revenue_trend: RevenueTrend,
    /// `None` (serialized as null) when the first month had no revenue
    pub revenue_change_percent: Option<f64>,
    pub top_category: String,
}

impl TrendSummary {
    pub fn compute(datasets: &Datasets) -> Result<Self> {
        let change = month_change(&datasets.monthly_revenue)?;
        let top = top_category(&datasets.revenue_by_category)
            .ok_or_else(|| Error::InvalidData("Category revenue table is empty".into()))?;

        Ok(Self {
            revenue_trend: classify_trend(change),
            revenue_change_percent: change,
            top_category: top.category.clone(),
        })
    }
}

/// Percent change between the first and last rows of the month table
fn month_change(rows: &[MonthlyRevenue]) -> Result<Option<f64>> {
    match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => Ok(percent_change(first.total_amount, last.total_amount)),
        _ => Err(Error::InvalidData("Monthly revenue table is empty".into())),
    }
}
