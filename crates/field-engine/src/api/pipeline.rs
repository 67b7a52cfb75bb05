//! FieldPipeline builder: processed image, reconstruction and comparison in
//! one call.

use crate::control::{ControlPoints, Position};
use crate::difference::{check_threshold, compute_difference, DifferenceResult};
use crate::error::Result;
use crate::field::PixelField;
use crate::metric::ParameterMask;
use crate::preprocess::{PreprocessOptions, Preprocessor};
use crate::reconstruct::{nearest_control_point, reconstruct_field_with, SearchStrategy};

/// Everything one pipeline run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Raw image after smoothing, color model and quantization.
    pub processed: PixelField,
    /// Control points with colors sampled from `processed`.
    pub points: ControlPoints,
    /// Reconstructed field, or `None` when there were no positions.
    pub field: Option<PixelField>,
    /// Comparison of `processed` against `field`, when requested and possible.
    pub difference: Option<DifferenceResult>,
}

impl PipelineOutput {
    /// The comparison, or the canonical disabled result (100 %, white).
    pub fn difference_or_disabled(&self) -> DifferenceResult {
        match &self.difference {
            Some(diff) => diff.clone(),
            None => DifferenceResult::disabled(self.processed.width(), self.processed.height()),
        }
    }
}

/// Runs preprocessing, reconstruction and comparison with one configuration.
///
/// Like the other builders in this crate, configuration methods consume and
/// return `self`, and [`run`](Self::run) takes `&self` so one pipeline can
/// serve many images.
///
/// # Example
///
/// ```
/// use field_engine::{Color, FieldPipeline, ParameterMask, PixelField, Position};
///
/// let raw = PixelField::filled(8, 8, Color::new(40, 80, 120));
/// let pipeline = FieldPipeline::new(ParameterMask::ALL).compare(true);
///
/// let output = pipeline.run(&raw, &[Position::new(4, 4)]).unwrap();
/// assert_eq!(output.field.as_ref(), Some(&raw));
/// assert_eq!(output.difference.unwrap().rounded_percentage(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct FieldPipeline {
    mask: ParameterMask,
    preprocess: PreprocessOptions,
    threshold: f64,
    compare: bool,
    strategy: SearchStrategy,
}

impl FieldPipeline {
    /// Pipeline with no preprocessing, threshold 0 and comparison off.
    pub fn new(mask: ParameterMask) -> Self {
        Self {
            mask,
            preprocess: PreprocessOptions::default(),
            threshold: 0.0,
            compare: false,
            strategy: SearchStrategy::Auto,
        }
    }

    /// Set preprocessing options.
    #[inline]
    pub fn preprocess(mut self, options: PreprocessOptions) -> Self {
        self.preprocess = options;
        self
    }

    /// Set the comparison threshold, in percent of channel range.
    #[inline]
    pub fn threshold(mut self, percent: f64) -> Self {
        self.threshold = percent;
        self
    }

    /// Enable or disable the comparison step.
    #[inline]
    pub fn compare(mut self, enabled: bool) -> Self {
        self.compare = enabled;
        self
    }

    /// Override the nearest-point search strategy.
    #[inline]
    pub fn strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Parameter mask in effect.
    #[inline]
    pub fn mask(&self) -> ParameterMask {
        self.mask
    }

    /// Preprocess `raw`, sample `positions`, reconstruct and compare.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidParameter`](crate::EngineError::InvalidParameter)
    ///   for a bad threshold or preprocessing option
    /// - [`EngineError::OutOfBounds`](crate::EngineError::OutOfBounds) if a
    ///   position lies outside `raw`
    pub fn run(&self, raw: &PixelField, positions: &[Position]) -> Result<PipelineOutput> {
        if self.compare {
            check_threshold(self.threshold)?;
        }

        let processed = Preprocessor::new(self.preprocess.clone()).process(raw)?;
        let points = ControlPoints::sample(positions, &processed)?;

        let field = if points.is_empty() {
            None
        } else {
            let (width, height) = processed.dimensions();
            Some(reconstruct_field_with(
                &points,
                self.mask,
                &processed,
                width,
                height,
                self.strategy,
            )?)
        };

        let difference = match (&field, self.compare) {
            (Some(field), true) => Some(compute_difference(&processed, field, self.threshold)?),
            _ => None,
        };

        Ok(PipelineOutput {
            processed,
            points,
            field,
            difference,
        })
    }

    /// Nearest control point to `query` under this pipeline's mask.
    pub fn probe(
        &self,
        processed: &PixelField,
        points: &ControlPoints,
        query: Position,
    ) -> Result<usize> {
        nearest_control_point(points, self.mask, processed, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::error::EngineError;

    fn halves() -> PixelField {
        let mut image = PixelField::filled(10, 4, Color::new(200, 30, 30));
        for row in 0..4 {
            for col in 5..10 {
                image.set(row, col, Color::new(30, 30, 200));
            }
        }
        image
    }

    #[test]
    fn test_no_positions_skips_reconstruction() {
        let output = FieldPipeline::new(ParameterMask::ALL)
            .compare(true)
            .run(&halves(), &[])
            .unwrap();
        assert!(output.points.is_empty());
        assert!(output.field.is_none());
        assert!(output.difference.is_none());

        let disabled = output.difference_or_disabled();
        assert_eq!(disabled.rounded_percentage(), 100);
        assert!(disabled
            .visualization()
            .pixels()
            .iter()
            .all(|&c| c == Color::WHITE));
    }

    #[test]
    fn test_compare_off_leaves_difference_empty() {
        let output = FieldPipeline::new(ParameterMask::ALL)
            .run(&halves(), &[Position::new(0, 0)])
            .unwrap();
        assert!(output.field.is_some());
        assert!(output.difference.is_none());
    }

    #[test]
    fn test_one_point_per_half_matches_exactly() {
        let output = FieldPipeline::new(ParameterMask::SPATIAL)
            .compare(true)
            .run(&halves(), &[Position::new(2, 2), Position::new(2, 7)])
            .unwrap();
        assert_eq!(output.field.as_ref(), Some(&halves()));
        assert_eq!(output.difference.unwrap().percentage(), 100.0);
    }

    #[test]
    fn test_single_point_half_mismatch() {
        let output = FieldPipeline::new(ParameterMask::SPATIAL)
            .compare(true)
            .run(&halves(), &[Position::new(0, 0)])
            .unwrap();
        let diff = output.difference.unwrap();
        assert_eq!(diff.matching(), 20);
        assert_eq!(diff.rounded_percentage(), 50);
    }

    #[test]
    fn test_probe_uses_mask() {
        let pipeline = FieldPipeline::new(ParameterMask::SPATIAL);
        let output = pipeline
            .run(&halves(), &[Position::new(0, 0), Position::new(3, 9)])
            .unwrap();
        let near_first = pipeline
            .probe(&output.processed, &output.points, Position::new(1, 1))
            .unwrap();
        let near_second = pipeline
            .probe(&output.processed, &output.points, Position::new(2, 8))
            .unwrap();
        assert_eq!(near_first, 0);
        assert_eq!(near_second, 1);
    }

    #[test]
    fn test_position_outside_image() {
        let result = FieldPipeline::new(ParameterMask::ALL).run(&halves(), &[Position::new(4, 0)]);
        assert!(matches!(result, Err(EngineError::OutOfBounds { .. })));
    }

    #[test]
    fn test_bad_threshold_rejected_when_comparing() {
        let result = FieldPipeline::new(ParameterMask::ALL)
            .compare(true)
            .threshold(150.0)
            .run(&halves(), &[Position::new(0, 0)]);
        assert!(matches!(
            result,
            Err(EngineError::InvalidParameter { name: "threshold", .. })
        ));
    }
}
