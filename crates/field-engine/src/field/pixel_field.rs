//! Row-major color grid with dimension metadata.

use crate::color::Color;
use crate::control::Position;
use crate::error::{EngineError, Result};

/// A dense `width x height` grid of colors in row-major order.
///
/// # Example
///
/// ```
/// use field_engine::{Color, PixelField};
///
/// let field = PixelField::new(vec![Color::BLACK, Color::WHITE], 2, 1).unwrap();
///
/// assert_eq!(field.width(), 2);
/// assert_eq!(field.height(), 1);
/// assert_eq!(field.get(0, 1), Some(Color::WHITE));
///
/// let bytes = field.to_rgb_bytes();
/// assert_eq!(bytes, vec![0, 0, 0, 255, 255, 255]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelField {
    /// Pixels, one per cell, row-major order.
    pixels: Vec<Color>,
    /// Width in pixels.
    width: usize,
    /// Height in pixels.
    height: usize,
}

impl PixelField {
    /// Create a field from pixels in row-major order.
    ///
    /// Fails with [`EngineError::DimensionMismatch`] if `pixels.len()` is not
    /// `width * height`.
    pub fn new(pixels: Vec<Color>, width: usize, height: usize) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(EngineError::DimensionMismatch {
                expected: (width, height),
                actual: (pixels.len(), 1),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Create a field where every pixel is `color`.
    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self {
            pixels: vec![color; width * height],
            width,
            height,
        }
    }

    /// Create a field from a packed 3-bytes-per-pixel buffer.
    pub fn from_rgb_bytes(bytes: &[u8], width: usize, height: usize) -> Result<Self> {
        if bytes.len() != width * height * 3 {
            return Err(EngineError::DimensionMismatch {
                expected: (width, height),
                actual: (bytes.len() / 3, 1),
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| Color::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Convert to a packed `[c1, c2, c3, ...]` byte buffer of length
    /// `width * height * 3`.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color.0);
        }
        bytes
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the pixels as a row-major slice.
    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Color at `(row, col)`, or `None` outside the field.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        if row < self.height && col < self.width {
            Some(self.pixels[row * self.width + col])
        } else {
            None
        }
    }

    /// Color at `position`, or [`EngineError::OutOfBounds`].
    pub fn sample(&self, position: Position) -> Result<Color> {
        self.get(position.row, position.col)
            .ok_or(EngineError::OutOfBounds {
                row: position.row,
                col: position.col,
                width: self.width,
                height: self.height,
            })
    }

    /// Overwrite the color at `(row, col)`. Returns `false` outside the field.
    pub fn set(&mut self, row: usize, col: usize, color: Color) -> bool {
        if row < self.height && col < self.width {
            self.pixels[row * self.width + col] = color;
            true
        } else {
            false
        }
    }

    /// Whether `other` has the same width and height.
    #[inline]
    pub fn same_dimensions(&self, other: &PixelField) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Fail with [`EngineError::DimensionMismatch`] unless the field is
    /// exactly `width x height`.
    pub fn expect_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if self.dimensions() != (width, height) {
            return Err(EngineError::DimensionMismatch {
                expected: (width, height),
                actual: self.dimensions(),
            });
        }
        Ok(())
    }

    /// Apply `f` to every pixel, producing a new field of the same size.
    pub fn map(&self, f: impl Fn(Color) -> Color) -> PixelField {
        PixelField {
            pixels: self.pixels.iter().map(|&c| f(c)).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Iterate rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        // chunks(0) panics; an empty field has no rows either way
        self.pixels.chunks(self.width.max(1))
    }

    /// Build from a buffer whose length the caller already guarantees.
    pub(crate) fn from_parts(pixels: Vec<Color>, width: usize, height: usize) -> Self {
        debug_assert_eq!(pixels.len(), width * height, "pixel buffer length");
        Self {
            pixels,
            width,
            height,
        }
    }

    pub(crate) fn into_pixels(self) -> Vec<Color> {
        self.pixels
    }
}
