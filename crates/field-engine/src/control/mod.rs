//! Control points: the sparse samples a field is reconstructed from.
//!
//! The interactive session owns a mutable [`ControlPointStore`] of
//! positions. Each engine call receives an immutable [`ControlPoints`]
//! snapshot whose colors were re-sampled from the current processed
//! image, so render state and reconstruction input never alias.

mod point;
mod store;

pub use point::{ControlPoint, ControlPoints, Position};
pub use store::{ControlPointStore, DEFAULT_REMOVE_RADIUS};
