//! Palette quantization by iterative relocation (Lloyd's k-means).
//!
//! Reduces an image to `k` representative colors:
//!
//! 1. Seed up to `k` distinct representatives from the pixel population
//!    with a deterministic RNG ([`Quantizer::seed`]). An image with fewer
//!    distinct colors gets one cluster per color.
//! 2. Assign every pixel to its nearest representative (Euclidean distance
//!    over the three channels, lowest index on ties).
//! 3. Move every representative to the mean of its pixels; clusters that
//!    received no pixels keep their previous representative.
//! 4. Repeat 2-3 up to the iteration budget, stopping early once no pixel
//!    changes cluster.
//!
//! When the image has no more than `k` distinct colors every color seeds
//! its own cluster, so quantizing an already-quantized image is a no-op.
//!
//! # Parallelism
//!
//! The assignment step runs on rayon over fixed-size pixel chunks. Each
//! chunk accumulates its own integer channel sums; chunks are merged by an
//! explicit reduction before representatives move, so results do not
//! depend on thread scheduling.

mod kmeans;

pub use kmeans::{ClusterPalette, Quantizer, DEFAULT_ITERATIONS, DEFAULT_K, DEFAULT_SEED};

use crate::error::Result;
use crate::field::PixelField;

/// Quantize `image` to `k` colors with at most `iterations` relocation
/// passes, using [`DEFAULT_SEED`].
///
/// # Errors
///
/// [`EngineError::InvalidParameter`](crate::EngineError::InvalidParameter)
/// if `k` or `iterations` is zero.
///
/// # Example
///
/// ```
/// use field_engine::{quantize_palette, Color, PixelField};
///
/// let image = PixelField::new(
///     vec![Color::new(0, 0, 0), Color::new(10, 10, 10), Color::new(250, 250, 250)],
///     3,
///     1,
/// )
/// .unwrap();
///
/// let quantized = quantize_palette(&image, 2, 10).unwrap();
/// assert_eq!(quantized.get(0, 0), Some(Color::new(5, 5, 5)));
/// assert_eq!(quantized.get(0, 2), Some(Color::new(250, 250, 250)));
/// ```
pub fn quantize_palette(image: &PixelField, k: usize, iterations: usize) -> Result<PixelField> {
    Ok(Quantizer::new(k).iterations(iterations).run(image)?.apply())
}
