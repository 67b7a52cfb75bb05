use axum::{extract::State, Json};
use field_engine::Quantizer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::types::{blocking, decode_canvas, encode_canvas};
use crate::error::ApiError;
use crate::models::AppConfig;

/// Request body for palette quantization
#[derive(Debug, Deserialize, ToSchema)]
pub struct QuantizeRequest {
    /// Base64-encoded PNG
    pub image: String,
    /// Cluster count (default from config)
    #[serde(default)]
    pub k: Option<usize>,
    /// Iteration budget (default from config)
    #[serde(default)]
    pub iterations: Option<usize>,
    /// Initialization seed (default from config)
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Quantized image and its palette
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuantizeResponse {
    /// Base64-encoded PNG with every pixel replaced by its cluster color
    pub image: String,
    pub width: usize,
    pub height: usize,
    /// One `#rrggbb` color per cluster, at most one per distinct input color
    pub centers: Vec<String>,
    /// Relocation passes performed
    pub iterations_run: usize,
    /// Whether assignments stopped changing before the budget ran out
    pub converged: bool,
}

/// Reduce an image to a small palette
///
/// Runs seeded k-means over the pixel colors.
#[utoipa::path(
    post,
    path = "/api/quantize",
    request_body = QuantizeRequest,
    responses(
        (status = 200, description = "Quantized image", body = QuantizeResponse),
        (status = 400, description = "Invalid image, or parameters outside the configured limits"),
        (status = 413, description = "Canvas too large"),
    ),
    tag = "Quantization"
)]
pub async fn handle_quantize(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<QuantizeRequest>,
) -> Result<Json<QuantizeResponse>, ApiError> {
    let k = request.k.unwrap_or(config.kmeans_clusters);
    let iterations = request.iterations.unwrap_or(config.kmeans_iterations);
    let seed = request.seed.unwrap_or(config.seed);
    config.check_quantize(k, iterations)?;

    let response = blocking(move || {
        let image = decode_canvas(&request.image, &config)?;
        let palette = Quantizer::new(k)
            .iterations(iterations)
            .seed(seed)
            .run(&image)?;

        tracing::info!(
            k,
            iterations_run = palette.iterations_run(),
            converged = palette.converged(),
            width = image.width(),
            height = image.height(),
            "Quantized image"
        );

        Ok(QuantizeResponse {
            image: encode_canvas(&palette.apply())?,
            width: image.width(),
            height: image.height(),
            centers: palette.centers().iter().map(|c| c.to_hex()).collect(),
            iterations_run: palette.iterations_run(),
            converged: palette.converged(),
        })
    })
    .await?;

    Ok(Json(response))
}
