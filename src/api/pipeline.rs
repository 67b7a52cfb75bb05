use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::types::{
    blocking, decode_canvas, encode_canvas, point_dtos, positions, ControlPointDto, PositionDto,
};
use crate::error::ApiError;
use crate::models::AppConfig;

/// Request body for a full pipeline run. Unset options fall back to the
/// server configuration.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PipelineRequest {
    /// Base64-encoded PNG of the raw image
    pub image: String,
    /// Control point positions, in index order
    #[serde(default)]
    pub positions: Vec<PositionDto>,
    #[serde(default)]
    pub mask: Option<String>,
    #[serde(default)]
    pub smooth_kernel: Option<usize>,
    /// "RGB", "HSV" or "HLS"
    #[serde(default)]
    pub color_model: Option<String>,
    #[serde(default)]
    pub quantize: Option<bool>,
    #[serde(default)]
    pub kmeans_clusters: Option<usize>,
    #[serde(default)]
    pub kmeans_iterations: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub compare: Option<bool>,
}

impl PipelineRequest {
    /// Server configuration with this request's overrides applied.
    fn overlay(&self, base: &AppConfig) -> AppConfig {
        let mut config = base.clone();
        if let Some(mask) = &self.mask {
            config.mask = mask.clone();
        }
        if let Some(kernel) = self.smooth_kernel {
            config.smooth_kernel = kernel;
        }
        if let Some(model) = &self.color_model {
            config.color_model = model.clone();
        }
        if let Some(quantize) = self.quantize {
            config.quantize = quantize;
        }
        if let Some(k) = self.kmeans_clusters {
            config.kmeans_clusters = k;
        }
        if let Some(iterations) = self.kmeans_iterations {
            config.kmeans_iterations = iterations;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(compare) = self.compare {
            config.compare = compare;
        }
        config
    }
}

/// Everything a pipeline run produces
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PipelineResponse {
    /// Base64-encoded PNG of the processed image
    pub processed: String,
    /// Base64-encoded PNG of the reconstructed field, absent without positions
    pub field: Option<String>,
    /// Base64-encoded PNG of the difference visualization (white when disabled)
    pub difference: String,
    /// Whether the difference was actually computed
    pub compared: bool,
    /// Rounded similarity percentage (100 when disabled)
    pub percentage: u8,
    pub points: Vec<ControlPointDto>,
}

/// Preprocess, reconstruct and compare in one call
#[utoipa::path(
    post,
    path = "/api/pipeline",
    request_body = PipelineRequest,
    responses(
        (status = 200, description = "Pipeline output", body = PipelineResponse),
        (status = 400, description = "Invalid image, option or position"),
        (status = 413, description = "Canvas too large"),
    ),
    tag = "Pipeline"
)]
pub async fn handle_pipeline(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<PipelineRequest>,
) -> Result<Json<PipelineResponse>, ApiError> {
    let effective = request.overlay(&config);
    effective.validate()?;
    let pipeline = effective.pipeline()?;

    let response = blocking(move || {
        let raw = decode_canvas(&request.image, &effective)?;
        let output = pipeline.run(&raw, &positions(&request.positions))?;
        let difference = output.difference_or_disabled();

        tracing::info!(
            points = output.points.len(),
            mask = %pipeline.mask(),
            compared = output.difference.is_some(),
            percentage = difference.rounded_percentage(),
            "Pipeline run"
        );

        Ok(PipelineResponse {
            processed: encode_canvas(&output.processed)?,
            field: output.field.as_ref().map(encode_canvas).transpose()?,
            difference: encode_canvas(difference.visualization())?,
            compared: output.difference.is_some(),
            percentage: difference.rounded_percentage(),
            points: point_dtos(&output.points),
        })
    })
    .await?;

    Ok(Json(response))
}
