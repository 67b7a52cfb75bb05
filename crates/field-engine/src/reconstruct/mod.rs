//! Field reconstruction and nearest-control-point queries.
//!
//! Both operations answer the same question, "which control point is
//! nearest to this feature vector?", under a [`WeightedMetric`]. The
//! reconstruction asks it for every pixel of the canvas and paints the
//! pixel with the winning point's color; the query asks it once, for an
//! arbitrary cursor position, and returns the winning index.
//!
//! A pixel's feature vector is its own position plus the color the source
//! image holds there. The output color always comes from the matched
//! control point, never from the source image.
//!
//! # Tie-breaking
//!
//! Equidistant control points resolve to the lowest index in insertion
//! order. Every [`SearchStrategy`] honours this, so accelerated and
//! brute-force searches produce identical fields.
//!
//! # Parallelism
//!
//! The pixel loop runs on rayon, one output row per task. Workers share
//! the control points and the source image read-only and write disjoint
//! rows.

mod brute_force;
mod grid;

use rayon::prelude::*;

use crate::control::{ControlPoints, Position};
use crate::error::{EngineError, Result};
use crate::field::PixelField;
use crate::metric::{Feature, ParameterMask, WeightedMetric};

pub use brute_force::BruteForce;
pub use grid::SpatialGrid;

/// Nearest-neighbour search over a fixed set of control points.
pub trait NearestSearch: Sync {
    /// Index of the nearest control point to `query` (lowest index on ties).
    fn nearest(&self, query: &Feature) -> usize;
}

/// How nearest control points are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Pick [`SpatialGrid`] when the mask is purely spatial on both axes,
    /// otherwise [`BruteForce`].
    #[default]
    Auto,
    /// Evaluate every control point for every pixel.
    BruteForce,
    /// Bucket control points into a uniform grid and search outward in rings.
    /// Falls back to brute force when the mask is not purely spatial on
    /// both axes.
    SpatialGrid,
}

impl SearchStrategy {
    fn grid_applicable(mask: ParameterMask) -> bool {
        mask.row && mask.column && !mask.has_color()
    }

    fn uses_grid(self, mask: ParameterMask) -> bool {
        match self {
            SearchStrategy::BruteForce => false,
            SearchStrategy::Auto | SearchStrategy::SpatialGrid => Self::grid_applicable(mask),
        }
    }
}

fn features(points: &ControlPoints) -> Vec<Feature> {
    points
        .iter()
        .map(|p| Feature::new(p.position, p.color))
        .collect()
}

fn validate(points: &ControlPoints, source: &PixelField, width: usize, height: usize) -> Result<()> {
    if points.is_empty() {
        return Err(EngineError::EmptyStore);
    }
    source.expect_dimensions(width, height)
}

fn assign_all<S: NearestSearch>(search: &S, source: &PixelField) -> Vec<usize> {
    let (width, height) = source.dimensions();
    let mut assignments = vec![0usize; width * height];
    if width == 0 || height == 0 {
        return assignments;
    }
    let pixels = source.pixels();

    assignments
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out)| {
            let row_pixels = &pixels[row * width..(row + 1) * width];
            for (col, (slot, &color)) in out.iter_mut().zip(row_pixels).enumerate() {
                let query = Feature::new(Position::new(row, col), color);
                *slot = search.nearest(&query);
            }
        });

    assignments
}

/// Per-pixel index of the nearest control point, row-major.
///
/// This is the partition underlying [`reconstruct_field`]: every pixel maps
/// to exactly one control point index.
pub fn reconstruct_assignments(
    points: &ControlPoints,
    mask: ParameterMask,
    source: &PixelField,
    width: usize,
    height: usize,
    strategy: SearchStrategy,
) -> Result<Vec<usize>> {
    validate(points, source, width, height)?;

    let metric = WeightedMetric::new(mask, width, height);
    let features = features(points);

    let assignments = if strategy.uses_grid(mask) {
        let grid = SpatialGrid::new(metric, &features, width, height);
        assign_all(&grid, source)
    } else {
        let brute = BruteForce::new(metric, &features);
        assign_all(&brute, source)
    };
    Ok(assignments)
}

/// Reconstruct a field with an explicit search strategy.
pub fn reconstruct_field_with(
    points: &ControlPoints,
    mask: ParameterMask,
    source: &PixelField,
    width: usize,
    height: usize,
    strategy: SearchStrategy,
) -> Result<PixelField> {
    let assignments = reconstruct_assignments(points, mask, source, width, height, strategy)?;
    let colors = points.colors();
    let pixels = assignments.into_iter().map(|i| colors[i]).collect();
    PixelField::new(pixels, width, height)
}

/// Paint every pixel with the color of its nearest control point.
///
/// `source` supplies each pixel's own color for the distance computation
/// and must be exactly `width x height`.
///
/// # Errors
///
/// - [`EngineError::EmptyStore`] if `points` is empty
/// - [`EngineError::DimensionMismatch`] if `source` is not `width x height`
///
/// # Example
///
/// ```
/// use field_engine::{
///     reconstruct_field, Color, ControlPoint, ControlPoints, ParameterMask, PixelField, Position,
/// };
///
/// let source = PixelField::filled(4, 1, Color::BLACK);
/// let points = ControlPoints::new(vec![
///     ControlPoint::new(Position::new(0, 0), Color::new(255, 0, 0)),
///     ControlPoint::new(Position::new(0, 3), Color::new(0, 0, 255)),
/// ]);
///
/// let field = reconstruct_field(&points, ParameterMask::SPATIAL, &source, 4, 1).unwrap();
/// assert_eq!(field.get(0, 1), Some(Color::new(255, 0, 0)));
/// assert_eq!(field.get(0, 2), Some(Color::new(0, 0, 255)));
/// ```
pub fn reconstruct_field(
    points: &ControlPoints,
    mask: ParameterMask,
    source: &PixelField,
    width: usize,
    height: usize,
) -> Result<PixelField> {
    reconstruct_field_with(points, mask, source, width, height, SearchStrategy::Auto)
}

/// Index of the control point nearest to `query`.
///
/// The query's feature vector is `query` plus the color `source` holds
/// there; canvas extents come from `source`.
///
/// # Errors
///
/// - [`EngineError::EmptyStore`] if `points` is empty
/// - [`EngineError::OutOfBounds`] if `query` lies outside `source`
pub fn nearest_control_point(
    points: &ControlPoints,
    mask: ParameterMask,
    source: &PixelField,
    query: Position,
) -> Result<usize> {
    if points.is_empty() {
        return Err(EngineError::EmptyStore);
    }
    let color = source.sample(query)?;
    let metric = WeightedMetric::new(mask, source.width(), source.height());
    let features = features(points);
    Ok(BruteForce::new(metric, &features).nearest(&Feature::new(query, color)))
}
