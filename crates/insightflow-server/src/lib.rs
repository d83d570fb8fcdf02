//! InsightFlow Web Server
//!
//! Axum-based REST API over the persisted aggregate tables.
//!
//! Handlers are stateless: every request reloads the tables from the data
//! directory, so a fresh `insightflow aggregate` run is picked up without a
//! restart. The only shared state is the data directory and the summarizer
//! client.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use insightflow_core::ai::{Summarizer, SummarizerClient};
use insightflow_core::{DataPaths, Error as CoreError};

mod handlers;

/// Service name reported by the health check
pub const SERVICE_NAME: &str = "InsightFlow";

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    /// Where the aggregate tables live
    pub paths: DataPaths,
    /// Remote summarizer used by the query endpoint
    pub summarizer: SummarizerClient,
}

/// Create the application router
pub fn create_router(
    paths: DataPaths,
    summarizer: SummarizerClient,
    config: ServerConfig,
) -> Router {
    info!(
        "Summarizer configured: {} (model: {})",
        summarizer.host(),
        summarizer.model()
    );

    let cors = build_cors(&config);

    let state = Arc::new(AppState { paths, summarizer });

    Router::new()
        // Health
        .route("/", get(handlers::health))
        // Aggregate tables
        .route("/revenue/category", get(handlers::revenue_by_category))
        .route("/revenue/monthly", get(handlers::monthly_revenue))
        .route("/customers/segments", get(handlers::customer_segments))
        // Insights
        .route("/insights", get(handlers::get_insights))
        .route("/insights/report", get(handlers::get_insights_report))
        // Free-text query
        .route("/query", post(handlers::query_insights))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn build_cors(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        cors
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Start the server
pub async fn serve(
    paths: DataPaths,
    summarizer: SummarizerClient,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(paths, summarizer, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn unprocessable(msg: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error, exposing only data problems to the client
    pub fn from_core(err: CoreError) -> Self {
        match err {
            CoreError::InvalidData(msg) => Self::unprocessable(&msg),
            other => Self::from(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
