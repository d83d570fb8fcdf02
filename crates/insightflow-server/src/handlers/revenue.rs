//! Raw aggregate table handlers
//!
//! Each endpoint returns its table as a JSON array of records keyed by the
//! persisted column names.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{AppError, AppState};
use insightflow_core::models::{CategoryRevenue, CustomerSegment, MonthlyRevenue};
use insightflow_core::Datasets;

/// GET /revenue/category - Revenue per product category
pub async fn revenue_by_category(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryRevenue>>, AppError> {
    let datasets = Datasets::load(&state.paths)?;
    Ok(Json(datasets.revenue_by_category))
}

/// GET /revenue/monthly - Revenue per month, oldest first
pub async fn monthly_revenue(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonthlyRevenue>>, AppError> {
    let datasets = Datasets::load(&state.paths)?;
    Ok(Json(datasets.monthly_revenue))
}

/// GET /customers/segments - Revenue per gender and category
pub async fn customer_segments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CustomerSegment>>, AppError> {
    let datasets = Datasets::load(&state.paths)?;
    Ok(Json(datasets.customer_segments))
}
