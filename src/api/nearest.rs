use axum::{extract::State, Json};
use field_engine::{nearest_control_point, ControlPoints, Position};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::types::{blocking, decode_canvas, positions, resolve_mask, PositionDto};
use crate::error::ApiError;
use crate::models::AppConfig;

/// Request body for a nearest-point probe
#[derive(Debug, Deserialize, ToSchema)]
pub struct NearestRequest {
    /// Base64-encoded PNG of the processed image
    pub image: String,
    /// Control point positions, in index order
    pub positions: Vec<PositionDto>,
    /// Position to probe
    pub query: PositionDto,
    /// Five 0/1 flags (default from config)
    #[serde(default)]
    pub mask: Option<String>,
}

/// Nearest control point
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NearestResponse {
    /// Zero-based index into `positions`
    pub index: usize,
    pub position: PositionDto,
    /// Color sampled at the control point, `#rrggbb`
    pub color: String,
}

/// Find the control point nearest to a position
#[utoipa::path(
    post,
    path = "/api/nearest",
    request_body = NearestRequest,
    responses(
        (status = 200, description = "Nearest control point", body = NearestResponse),
        (status = 400, description = "Invalid image, mask or position"),
        (status = 409, description = "No control points"),
        (status = 413, description = "Canvas too large"),
    ),
    tag = "Reconstruction"
)]
pub async fn handle_nearest(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<NearestRequest>,
) -> Result<Json<NearestResponse>, ApiError> {
    let mask = resolve_mask(request.mask.as_deref(), &config)?;

    let response = blocking(move || {
        let source = decode_canvas(&request.image, &config)?;
        let points = ControlPoints::sample(&positions(&request.positions), &source)?;
        let query = Position::from(request.query);
        let index = nearest_control_point(&points, mask, &source, query)?;

        let point = points
            .get(index)
            .ok_or_else(|| ApiError::Internal(format!("nearest index {index} out of range")))?;

        tracing::debug!(%query, index, %mask, "Nearest control point");

        Ok(NearestResponse {
            index,
            position: point.position.into(),
            color: point.color.to_hex(),
        })
    })
    .await?;

    Ok(Json(response))
}
