//! Weighted distance metric shared by reconstruction and point queries.
//!
//! A feature vector is a pixel position plus its color. The
//! [`ParameterMask`] selects which of the five dimensions take part; each
//! selected dimension is normalised to `[0, 1]` (rows by canvas height,
//! columns by canvas width, channels by 255) before the Euclidean norm is
//! taken, so toggling a dimension changes the metric by a comparable amount
//! regardless of canvas size.
//!
//! ```text
//! d(a, b) = sqrt( sum over enabled k of ((a_k - b_k) / extent_k)^2 )
//! ```
//!
//! With no dimension enabled every distance is 0 and the lowest control
//! point index wins every search.

mod mask;
mod weighted;

pub use mask::{Dimension, ParameterMask};
pub use weighted::{Feature, WeightedMetric};
