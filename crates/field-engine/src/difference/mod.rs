//! Threshold comparison of two equally sized fields.
//!
//! A pixel *matches* when the largest absolute per-channel difference
//! between the two fields is at most `threshold_percent * 255 / 100`.
//! Threshold 0 therefore requires exact equality and threshold 100 matches
//! every pixel.
//!
//! # Visualization
//!
//! | Pixel | Rendered as |
//! |-------|-------------|
//! | matching | [`MATCH_COLOR`] (white) |
//! | non-matching | [`MISMATCH_COLOR`] (red marker) |
//!
//! The percentage reports similarity: 100 means every pixel matched.

mod result;

pub use result::DifferenceResult;

use rayon::prelude::*;

use crate::color::{Color, CHANNEL_RANGE};
use crate::error::{EngineError, Result};
use crate::field::PixelField;

/// Color of matching pixels in the visualization.
pub const MATCH_COLOR: Color = Color::WHITE;

/// Color of non-matching pixels in the visualization.
pub const MISMATCH_COLOR: Color = Color::new(255, 0, 0);

/// Validate a threshold percentage.
pub fn check_threshold(threshold_percent: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&threshold_percent) {
        return Err(EngineError::invalid(
            "threshold",
            format!("must be within [0, 100], got {}", threshold_percent),
        ));
    }
    Ok(())
}

/// Compare `a` and `b` pixel by pixel.
///
/// # Errors
///
/// - [`EngineError::DimensionMismatch`] if the fields differ in size
/// - [`EngineError::InvalidParameter`] if the threshold is outside `[0, 100]`
///   (NaN included)
///
/// # Example
///
/// ```
/// use field_engine::{compute_difference, Color, PixelField};
///
/// let a = PixelField::filled(2, 2, Color::BLACK);
/// let result = compute_difference(&a, &a, 0.0).unwrap();
///
/// assert_eq!(result.rounded_percentage(), 100);
/// assert_eq!(result.mismatching(), 0);
/// ```
pub fn compute_difference(
    a: &PixelField,
    b: &PixelField,
    threshold_percent: f64,
) -> Result<DifferenceResult> {
    check_threshold(threshold_percent)?;
    if !a.same_dimensions(b) {
        return Err(EngineError::DimensionMismatch {
            expected: a.dimensions(),
            actual: b.dimensions(),
        });
    }

    let tolerance = threshold_percent * CHANNEL_RANGE / 100.0;

    let visualization: Vec<Color> = a
        .pixels()
        .par_iter()
        .zip(b.pixels().par_iter())
        .map(|(&pa, &pb)| {
            if pa.max_channel_delta(pb) as f64 <= tolerance {
                MATCH_COLOR
            } else {
                MISMATCH_COLOR
            }
        })
        .collect();

    let matching = visualization.iter().filter(|&&c| c == MATCH_COLOR).count();
    let (width, height) = a.dimensions();
    let visualization = PixelField::new(visualization, width, height)?;

    Ok(DifferenceResult::new(visualization, matching))
}
