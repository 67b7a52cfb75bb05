//! Request and response pieces shared by several endpoints.

use field_engine::{ControlPoints, ParameterMask, PixelField, Position};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::{decode_base64_png, encode_base64_png};

/// Canvas position in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PositionDto {
    /// Row, counted from the top
    pub row: usize,
    /// Column, counted from the left
    pub col: usize,
}

impl From<PositionDto> for Position {
    fn from(p: PositionDto) -> Self {
        Position::new(p.row, p.col)
    }
}

impl From<Position> for PositionDto {
    fn from(p: Position) -> Self {
        Self {
            row: p.row,
            col: p.col,
        }
    }
}

/// Control point with its sampled color
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ControlPointDto {
    pub row: usize,
    pub col: usize,
    /// Sampled color as `#rrggbb`
    pub color: String,
}

pub(crate) fn point_dtos(points: &ControlPoints) -> Vec<ControlPointDto> {
    points
        .iter()
        .map(|p| ControlPointDto {
            row: p.position.row,
            col: p.position.col,
            color: p.color.to_hex(),
        })
        .collect()
}

pub(crate) fn positions(dtos: &[PositionDto]) -> Vec<Position> {
    dtos.iter().copied().map(Position::from).collect()
}

/// Reject canvases larger than the configured maximum side.
pub(crate) fn check_canvas(field: &PixelField, max: usize) -> Result<(), ApiError> {
    let (width, height) = field.dimensions();
    if width > max || height > max {
        return Err(ApiError::CanvasTooLarge { width, height, max });
    }
    Ok(())
}

/// Decode a base64 PNG request field and enforce the canvas limit.
pub(crate) fn decode_canvas(data: &str, config: &AppConfig) -> Result<PixelField, ApiError> {
    let field = decode_base64_png(data)?;
    check_canvas(&field, config.max_canvas)?;
    Ok(field)
}

pub(crate) fn encode_canvas(field: &PixelField) -> Result<String, ApiError> {
    Ok(encode_base64_png(field)?)
}

/// Request mask if given, otherwise the configured one.
pub(crate) fn resolve_mask(
    requested: Option<&str>,
    config: &AppConfig,
) -> Result<ParameterMask, ApiError> {
    Ok(match requested {
        Some(mask) => mask.parse::<ParameterMask>()?,
        None => config.parameter_mask()?,
    })
}

/// Run synchronous engine work off the async runtime.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}
