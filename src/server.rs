//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api;
use crate::models::AppConfig;

/// Largest accepted request body. Images travel as base64 PNG inside JSON.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

/// Create application state from a loaded configuration.
pub fn create_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(AppState {
        config: Arc::new(config),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sparsefield API",
        description = "Sparse-sample field reconstruction, comparison and palette quantization",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_quantize,
        api::handle_reconstruct,
        api::handle_nearest,
        api::handle_difference,
        api::handle_pipeline,
    ),
    components(schemas(
        api::PositionDto,
        api::ControlPointDto,
        api::QuantizeRequest,
        api::QuantizeResponse,
        api::ReconstructRequest,
        api::ReconstructResponse,
        api::NearestRequest,
        api::NearestResponse,
        api::DifferenceRequest,
        api::DifferenceResponse,
        api::PipelineRequest,
        api::PipelineResponse,
    )),
    tags(
        (name = "Quantization", description = "Palette reduction"),
        (name = "Reconstruction", description = "Field reconstruction and nearest-point probes"),
        (name = "Comparison", description = "Thresholded image comparison"),
        (name = "Pipeline", description = "Preprocess, reconstruct and compare in one call")
    )
)]
pub struct ApiDoc;

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/quantize", post(api::handle_quantize))
        .route("/api/reconstruct", post(api::handle_reconstruct))
        .route("/api/nearest", post(api::handle_nearest))
        .route("/api/difference", post(api::handle_difference))
        .route("/api/pipeline", post(api::handle_pipeline))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        // Add state and tracing
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}
