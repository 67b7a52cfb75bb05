//! Caller-side image preparation.
//!
//! Turns a raw image into the "processed image" the rest of the engine
//! samples from. The pipeline runs in a fixed order:
//!
//! 1. **Smoothing**: normalized box blur with an odd square kernel.
//!    Borders reflect without repeating the edge pixel (`dcb|abcd|cba`).
//! 2. **Color model**: identity, 8-bit HSV, or HLS hue flattening
//!    (see [`ColorModel`](crate::ColorModel)).
//! 3. **Palette quantization** (optional): k-means with a fixed seed.
//!
//! The engine never requires preprocessing; every other module accepts any
//! [`PixelField`](crate::PixelField). This module exists so callers build the
//! processed image the same way everywhere.
//!
//! # Example
//!
//! ```
//! use field_engine::{Color, ColorModel, PixelField, PreprocessOptions, Preprocessor};
//!
//! let raw = PixelField::filled(6, 4, Color::new(90, 40, 10));
//! let options = PreprocessOptions::new()
//!     .smooth(3)
//!     .color_model(ColorModel::Rgb)
//!     .quantize(2, 5);
//!
//! let processed = Preprocessor::new(options).process(&raw).unwrap();
//! assert_eq!(processed, raw);
//! ```

mod blur;
mod options;
mod preprocessor;

pub use blur::box_blur;
pub use options::{PreprocessOptions, SMOOTH_KERNELS};
pub use preprocessor::Preprocessor;
