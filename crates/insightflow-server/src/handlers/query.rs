//! Free-text query handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{AppError, AppState};
use insightflow_core::models::QueryResponse;
use insightflow_core::query::answer_question;
use insightflow_core::Datasets;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

/// POST /query - Answer a question about the aggregates
///
/// Unrecognized questions still return 200 with an `{error, hint}` body.
pub async fn query_insights(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    let datasets = Datasets::load(&state.paths)?;
    let response = answer_question(&req.question, &datasets, &state.summarizer)
        .await
        .map_err(AppError::from_core)?;
    Ok(Json(response))
}
