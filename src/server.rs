//! HTTP boundary
//!
//! `POST /api/generate` runs the pipeline for one request and returns the plan document.
//! `GET /health` reports liveness.

use crate::config::ServerConfig;
use crate::error::{ApiError, GenerationError, RequestError};
use crate::pipeline::RoadmapService;
use crate::plan::{GenerateRequestBody, LearningPlanRequest};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON input";
pub const MISSING_FIELDS_MESSAGE: &str = "Please provide goal, purpose, and level.";

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub service: Arc<RoadmapService>,
}

/// Handler failure, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum AppError {
    InvalidJson,
    InvalidRequest(RequestError),
    Generation(GenerationError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidJson => (StatusCode::BAD_REQUEST, INVALID_JSON_MESSAGE.to_string()),
            AppError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE.to_string())
            }
            AppError::Generation(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn build_router(service: Arc<RoadmapService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate", post(generate))
        .with_state(AppContext { service })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /api/generate
///
/// The body is read raw so a malformed document maps to the fixed 400 message
/// instead of the extractor's default rejection.
pub async fn generate(State(ctx): State<AppContext>, body: Bytes) -> Result<Response, AppError> {
    let body = parse_body(&body)?;

    let request = LearningPlanRequest::try_from(body).map_err(|e| {
        warn!(error = %e, "Rejected incomplete request");
        AppError::InvalidRequest(e)
    })?;

    let roadmap = ctx.service.generate(&request).await.map_err(|e| {
        error!(error = %e, "Roadmap generation failed");
        AppError::Generation(e)
    })?;

    Ok((StatusCode::OK, Json(roadmap.plan)).into_response())
}

/// Malformed JSON and non-object documents are `InvalidJson`; a JSON object always
/// reaches the required-field check.
fn parse_body(bytes: &[u8]) -> Result<GenerateRequestBody, AppError> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| {
        warn!(error = %e, "Rejected request with invalid JSON");
        AppError::InvalidJson
    })?;
    if !value.is_object() {
        warn!("Rejected request body that is not a JSON object");
        return Err(AppError::InvalidJson);
    }
    GenerateRequestBody::deserialize(value).map_err(|e| {
        warn!(error = %e, "Rejected request with unreadable fields");
        AppError::InvalidJson
    })
}

/// Bind and serve until Ctrl-C.
pub async fn run_serve(config: &ServerConfig, service: Arc<RoadmapService>) -> Result<(), ApiError> {
    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .map_err(|e| ApiError::ConfigError(format!("Invalid server address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        enrichment = service.enrichment_enabled(),
        "Starting HTTP server"
    );

    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
