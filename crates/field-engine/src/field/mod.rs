//! Dense pixel buffers exchanged with the engine.
//!
//! [`PixelField`] is the only image type the engine accepts or produces:
//! a row-major grid of [`Color`](crate::Color) with explicit dimensions.
//! Packed `[c1, c2, c3, c1, c2, c3, ...]` byte buffers convert in and out
//! via [`PixelField::from_rgb_bytes`] and [`PixelField::to_rgb_bytes`].

mod pixel_field;

pub use pixel_field::PixelField;
