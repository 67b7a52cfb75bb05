//! Mutable control point store owned by the interactive session.

use crate::error::Result;
use crate::field::PixelField;

use super::{ControlPoints, Position};

/// Removal radius in pixels used by the editor when the user clicks near a point.
pub const DEFAULT_REMOVE_RADIUS: f64 = 10.0;

/// Ordered list of user-placed positions.
///
/// Colors are never stored here; they are derived per call by
/// [`snapshot`](Self::snapshot), which samples the current processed image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlPointStore {
    positions: Vec<Position>,
}

impl ControlPointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positions(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    /// Append a position; its index is the current length.
    pub fn push(&mut self, position: Position) -> usize {
        self.positions.push(position);
        self.positions.len() - 1
    }

    /// Remove the first position strictly closer than `radius` pixels.
    ///
    /// Returns the removed position, or `None` if nothing was in range.
    pub fn remove_near(&mut self, position: Position, radius: f64) -> Option<Position> {
        let index = self
            .positions
            .iter()
            .position(|p| p.distance(position) < radius)?;
        Some(self.positions.remove(index))
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Freeze the store into a snapshot with colors sampled from `processed`.
    pub fn snapshot(&self, processed: &PixelField) -> Result<ControlPoints> {
        ControlPoints::sample(&self.positions, processed)
    }
}
