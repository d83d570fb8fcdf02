//! Insight Generator - derived metrics over the aggregate tables
//!
//! Everything here is a pure function of the three aggregates:
//!
//! - **Trend** - percent change between the first and last month
//! - **Rankings** - top/worst category and top customer segment
//! - **Report** - the full insights object with alerts and recommendations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use insightflow_core::insights::{generate_insights, TrendSummary};
//!
//! let datasets = Datasets::load(&paths)?;
//! let summary = TrendSummary::compute(&datasets)?;
//! let report = generate_insights(&datasets)?;
//! ```

pub mod report;
pub mod trend;

pub use report::{generate_insights, Insights};
pub use trend::{
    classify_trend, percent_change, top_category, top_segment, worst_category, TrendSummary,
    TREND_THRESHOLD_PERCENT,
};
