//! Positions, control points and the immutable snapshot passed to the engine.

use std::fmt;

use crate::color::Color;
use crate::error::Result;
use crate::field::PixelField;

/// A canvas position as (row, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Euclidean distance in pixels.
    pub fn distance(self, other: Position) -> f64 {
        let dr = self.row.abs_diff(other.row) as f64;
        let dc = self.col.abs_diff(other.col) as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A position plus the color sampled there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPoint {
    pub position: Position,
    pub color: Color,
}

impl ControlPoint {
    #[inline]
    pub const fn new(position: Position, color: Color) -> Self {
        Self { position, color }
    }

    /// Re-read this point's color from `image` at its stored position.
    pub fn resample(&self, image: &PixelField) -> Result<ControlPoint> {
        Ok(ControlPoint {
            position: self.position,
            color: image.sample(self.position)?,
        })
    }
}

/// Ordered, immutable snapshot of control points.
///
/// Index order is insertion order and decides distance ties: the lowest
/// index wins. Duplicate positions are allowed.
///
/// ```
/// use field_engine::{Color, ControlPoints, PixelField, Position};
///
/// let image = PixelField::filled(4, 4, Color::new(9, 9, 9));
/// let points = ControlPoints::sample(&[Position::new(1, 2)], &image).unwrap();
///
/// assert_eq!(points.len(), 1);
/// assert_eq!(points.get(0).unwrap().color, Color::new(9, 9, 9));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlPoints {
    points: Vec<ControlPoint>,
}

impl ControlPoints {
    pub fn new(points: Vec<ControlPoint>) -> Self {
        Self { points }
    }

    /// Build a snapshot by sampling `image` at every position.
    pub fn sample(positions: &[Position], image: &PixelField) -> Result<Self> {
        let points = positions
            .iter()
            .map(|&p| Ok(ControlPoint::new(p, image.sample(p)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { points })
    }

    /// Re-sample every color from `image`, keeping positions and order.
    pub fn resample(&self, image: &PixelField) -> Result<Self> {
        let points = self
            .points
            .iter()
            .map(|p| p.resample(image))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { points })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&ControlPoint> {
        self.points.get(index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlPoint> {
        self.points.iter()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.points.iter().map(|p| p.position).collect()
    }

    pub fn colors(&self) -> Vec<Color> {
        self.points.iter().map(|p| p.color).collect()
    }
}

impl From<Vec<ControlPoint>> for ControlPoints {
    fn from(points: Vec<ControlPoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<ControlPoint> for ControlPoints {
    fn from_iter<I: IntoIterator<Item = ControlPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
