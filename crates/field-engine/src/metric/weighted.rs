//! Normalised, masked Euclidean distance.

use crate::color::{Color, CHANNEL_RANGE};
use crate::control::Position;

use super::ParameterMask;

/// A point in the five-dimensional feature space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub position: Position,
    pub color: Color,
}

impl Feature {
    #[inline]
    pub const fn new(position: Position, color: Color) -> Self {
        Self { position, color }
    }
}

/// Masked distance over features on a `width x height` canvas.
///
/// [`squared`](Self::squared) is the search key: it is monotone in
/// [`distance`](Self::distance), cheaper, and is evaluated identically by
/// every search strategy so ties compare bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedMetric {
    mask: ParameterMask,
    row_scale: f64,
    col_scale: f64,
    channel_scale: f64,
}

impl WeightedMetric {
    pub fn new(mask: ParameterMask, width: usize, height: usize) -> Self {
        Self {
            mask,
            row_scale: 1.0 / height.max(1) as f64,
            col_scale: 1.0 / width.max(1) as f64,
            channel_scale: 1.0 / CHANNEL_RANGE,
        }
    }

    #[inline]
    pub fn mask(&self) -> ParameterMask {
        self.mask
    }

    /// Normalised row offset for a pixel delta.
    #[inline]
    pub(crate) fn row_term(&self, delta: usize) -> f64 {
        delta as f64 * self.row_scale
    }

    /// Normalised column offset for a pixel delta.
    #[inline]
    pub(crate) fn col_term(&self, delta: usize) -> f64 {
        delta as f64 * self.col_scale
    }

    /// Squared distance between two features.
    #[inline]
    pub fn squared(&self, a: &Feature, b: &Feature) -> f64 {
        let mut sum = 0.0;
        let [a1, a2, a3] = a.color.0;
        let [b1, b2, b3] = b.color.0;
        if self.mask.channel1 {
            let d = a1.abs_diff(b1) as f64 * self.channel_scale;
            sum += d * d;
        }
        if self.mask.channel2 {
            let d = a2.abs_diff(b2) as f64 * self.channel_scale;
            sum += d * d;
        }
        if self.mask.channel3 {
            let d = a3.abs_diff(b3) as f64 * self.channel_scale;
            sum += d * d;
        }
        if self.mask.row {
            let d = self.row_term(a.position.row.abs_diff(b.position.row));
            sum += d * d;
        }
        if self.mask.column {
            let d = self.col_term(a.position.col.abs_diff(b.position.col));
            sum += d * d;
        }
        sum
    }

    /// Distance between two features.
    #[inline]
    pub fn distance(&self, a: &Feature, b: &Feature) -> f64 {
        self.squared(a, b).sqrt()
    }
}
