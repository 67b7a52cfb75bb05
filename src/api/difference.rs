use axum::{extract::State, Json};
use field_engine::compute_difference;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::types::{blocking, decode_canvas, encode_canvas};
use crate::error::ApiError;
use crate::models::AppConfig;

/// Request body for comparing two images
#[derive(Debug, Deserialize, ToSchema)]
pub struct DifferenceRequest {
    /// Base64-encoded PNG
    pub first: String,
    /// Base64-encoded PNG with the same dimensions as `first`
    pub second: String,
    /// Tolerance in percent of channel range (default from config)
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Comparison result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DifferenceResponse {
    /// Base64-encoded PNG: white where pixels match, red where they differ
    pub image: String,
    /// Pixels within tolerance
    pub matching: usize,
    /// Pixels compared
    pub total: usize,
    /// Share of matching pixels in percent
    pub percentage: f64,
    /// Percentage rounded to the nearest whole number
    pub rounded_percentage: u8,
}

/// Compare two images under a tolerance
#[utoipa::path(
    post,
    path = "/api/difference",
    request_body = DifferenceRequest,
    responses(
        (status = 200, description = "Comparison result", body = DifferenceResponse),
        (status = 400, description = "Invalid images, mismatched dimensions or threshold"),
        (status = 413, description = "Canvas too large"),
    ),
    tag = "Comparison"
)]
pub async fn handle_difference(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<DifferenceRequest>,
) -> Result<Json<DifferenceResponse>, ApiError> {
    let threshold = request.threshold.unwrap_or(config.threshold);

    let response = blocking(move || {
        let first = decode_canvas(&request.first, &config)?;
        let second = decode_canvas(&request.second, &config)?;
        let result = compute_difference(&first, &second, threshold)?;

        tracing::info!(
            threshold,
            matching = result.matching(),
            total = result.total(),
            "Compared images"
        );

        Ok(DifferenceResponse {
            image: encode_canvas(result.visualization())?,
            matching: result.matching(),
            total: result.total(),
            percentage: result.percentage(),
            rounded_percentage: result.rounded_percentage(),
        })
    })
    .await?;

    Ok(Json(response))
}
