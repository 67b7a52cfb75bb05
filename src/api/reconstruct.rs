use axum::{extract::State, Json};
use field_engine::{reconstruct_field, ControlPoints};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::types::{
    blocking, decode_canvas, encode_canvas, point_dtos, positions, resolve_mask, ControlPointDto,
    PositionDto,
};
use crate::error::ApiError;
use crate::models::AppConfig;

/// Request body for field reconstruction
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReconstructRequest {
    /// Base64-encoded PNG of the processed image
    pub image: String,
    /// Control point positions, in index order
    pub positions: Vec<PositionDto>,
    /// Five 0/1 flags: channel 1-3, row, column (default from config)
    #[serde(default)]
    pub mask: Option<String>,
}

/// Reconstructed field
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReconstructResponse {
    /// Base64-encoded PNG
    pub image: String,
    pub width: usize,
    pub height: usize,
    /// Control points with colors sampled from the processed image
    pub points: Vec<ControlPointDto>,
}

/// Reconstruct a full field from sparse control points
///
/// Every pixel takes the color of its nearest control point under the
/// weighted metric selected by the mask.
#[utoipa::path(
    post,
    path = "/api/reconstruct",
    request_body = ReconstructRequest,
    responses(
        (status = 200, description = "Reconstructed field", body = ReconstructResponse),
        (status = 400, description = "Invalid image, mask or position"),
        (status = 409, description = "No control points"),
        (status = 413, description = "Canvas too large"),
    ),
    tag = "Reconstruction"
)]
pub async fn handle_reconstruct(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<ReconstructRequest>,
) -> Result<Json<ReconstructResponse>, ApiError> {
    let mask = resolve_mask(request.mask.as_deref(), &config)?;

    let response = blocking(move || {
        let source = decode_canvas(&request.image, &config)?;
        let points = ControlPoints::sample(&positions(&request.positions), &source)?;
        let (width, height) = source.dimensions();
        let field = reconstruct_field(&points, mask, &source, width, height)?;

        tracing::info!(points = points.len(), %mask, width, height, "Reconstructed field");

        Ok(ReconstructResponse {
            image: encode_canvas(&field)?,
            width,
            height,
            points: point_dtos(&points),
        })
    })
    .await?;

    Ok(Json(response))
}
