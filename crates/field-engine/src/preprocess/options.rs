//! Preprocessing configuration.

use crate::color::ColorModel;
use crate::quantize::DEFAULT_SEED;

/// Smoothing kernel sizes offered to users. Any odd size is accepted.
pub const SMOOTH_KERNELS: [usize; 10] = [1, 3, 5, 7, 9, 11, 13, 15, 25, 49];

/// Configuration for [`Preprocessor`](super::Preprocessor).
///
/// The default is a no-op: kernel 1, RGB, no quantization.
///
/// ```
/// use field_engine::{ColorModel, PreprocessOptions};
///
/// let options = PreprocessOptions::new()
///     .smooth(5)
///     .color_model(ColorModel::Hls)
///     .quantize(10, 10)
///     .seed(3);
///
/// assert_eq!(options.smooth_kernel, 5);
/// assert_eq!(options.quantize, Some((10, 10)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessOptions {
    /// Box blur side length. Must be odd; 1 disables smoothing.
    pub smooth_kernel: usize,

    /// Color model applied after smoothing.
    pub color_model: ColorModel,

    /// Cluster count and iteration budget, or `None` to skip quantization.
    pub quantize: Option<(usize, usize)>,

    /// Seed for quantizer initialization.
    pub seed: u64,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            smooth_kernel: 1,
            color_model: ColorModel::Rgb,
            quantize: None,
            seed: DEFAULT_SEED,
        }
    }
}

impl PreprocessOptions {
    /// Same as `PreprocessOptions::default()`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the smoothing kernel size.
    #[inline]
    pub fn smooth(mut self, kernel: usize) -> Self {
        self.smooth_kernel = kernel;
        self
    }

    /// Set the color model.
    #[inline]
    pub fn color_model(mut self, model: ColorModel) -> Self {
        self.color_model = model;
        self
    }

    /// Enable palette quantization with `k` clusters and `iterations` passes.
    #[inline]
    pub fn quantize(mut self, k: usize, iterations: usize) -> Self {
        self.quantize = Some((k, iterations));
        self
    }

    /// Disable palette quantization.
    #[inline]
    pub fn no_quantize(mut self) -> Self {
        self.quantize = None;
        self
    }

    /// Set the quantizer seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Whether processing leaves every image unchanged.
    pub fn is_identity(&self) -> bool {
        self.smooth_kernel == 1 && self.color_model == ColorModel::Rgb && self.quantize.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let opts = PreprocessOptions::default();
        assert_eq!(opts.smooth_kernel, 1);
        assert_eq!(opts.color_model, ColorModel::Rgb);
        assert!(opts.quantize.is_none());
        assert_eq!(opts.seed, DEFAULT_SEED);
        assert!(opts.is_identity());
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(PreprocessOptions::new(), PreprocessOptions::default());
    }

    #[test]
    fn test_builder_chain() {
        let opts = PreprocessOptions::new()
            .smooth(7)
            .color_model(ColorModel::Hsv)
            .quantize(4, 2);
        assert_eq!(opts.smooth_kernel, 7);
        assert_eq!(opts.color_model, ColorModel::Hsv);
        assert_eq!(opts.quantize, Some((4, 2)));
        assert!(!opts.is_identity());

        let opts = opts.no_quantize();
        assert!(opts.quantize.is_none());
    }

    #[test]
    fn test_offered_kernels_are_odd() {
        assert!(SMOOTH_KERNELS.iter().all(|k| k % 2 == 1));
    }
}
