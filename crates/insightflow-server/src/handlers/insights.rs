//! Insight handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{AppError, AppState};
use insightflow_core::insights::{generate_insights, Insights, TrendSummary};
use insightflow_core::Datasets;

/// GET /insights - Headline trend and top category
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TrendSummary>, AppError> {
    let datasets = Datasets::load(&state.paths)?;
    let summary = TrendSummary::compute(&datasets).map_err(AppError::from_core)?;
    Ok(Json(summary))
}

/// GET /insights/report - Full insights with alerts and recommendations
pub async fn get_insights_report(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Insights>, AppError> {
    let datasets = Datasets::load(&state.paths)?;
    let insights = generate_insights(&datasets).map_err(AppError::from_core)?;
    Ok(Json(insights))
}
