//! Color values and caller-side color models.
//!
//! - [`Color`]: three opaque 8-bit channels, the unit of every pixel buffer
//! - [`ColorModel`]: optional conversion applied before sampling control
//!   points (RGB, HSV, or the hue-flattening HLS model)

mod color;
mod error;
mod model;

pub use color::{Color, CHANNEL_RANGE};
pub use error::ParseColorError;
pub use model::ColorModel;
