//! Outcome of a field comparison.

use crate::color::Color;
use crate::field::PixelField;

/// Visualization plus similarity summary of one comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceResult {
    visualization: PixelField,
    matching: usize,
    total: usize,
}

impl DifferenceResult {
    pub(crate) fn new(visualization: PixelField, matching: usize) -> Self {
        let total = visualization.len();
        Self {
            visualization,
            matching,
            total,
        }
    }

    /// Canonical result when the caller has comparison switched off:
    /// 100 % and a blank white visualization.
    pub fn disabled(width: usize, height: usize) -> Self {
        let visualization = PixelField::filled(width, height, Color::WHITE);
        let total = visualization.len();
        Self {
            visualization,
            matching: total,
            total,
        }
    }

    /// Per-pixel match map, see [`MATCH_COLOR`](super::MATCH_COLOR) and
    /// [`MISMATCH_COLOR`](super::MISMATCH_COLOR).
    #[inline]
    pub fn visualization(&self) -> &PixelField {
        &self.visualization
    }

    pub fn into_visualization(self) -> PixelField {
        self.visualization
    }

    #[inline]
    pub fn matching(&self) -> usize {
        self.matching
    }

    #[inline]
    pub fn mismatching(&self) -> usize {
        self.total - self.matching
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Share of matching pixels in `[0, 100]`. An empty comparison is 100.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        100.0 * self.matching as f64 / self.total as f64
    }

    /// Percentage rounded to the nearest whole number for display.
    ///
    /// A near-full match can round to 100; use [`mismatching`](Self::mismatching)
    /// to tell it apart from an exact one.
    pub fn rounded_percentage(&self) -> u8 {
        self.percentage().round() as u8
    }
}
