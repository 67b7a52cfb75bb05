//! Smoothing, color model, then optional quantization.

use crate::error::Result;
use crate::field::PixelField;
use crate::preprocess::PreprocessOptions;
use crate::quantize::Quantizer;

use super::blur::box_blur;

/// Builds the processed image from a raw one.
///
/// `Preprocessor` holds only its options and is `Send + Sync`; one instance
/// may serve many images.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    options: PreprocessOptions,
}

impl Preprocessor {
    /// Preprocessor with the given options.
    pub fn new(options: PreprocessOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    #[inline]
    pub fn options(&self) -> &PreprocessOptions {
        &self.options
    }

    /// Run the pipeline on `raw`. Output dimensions equal input dimensions.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidParameter`](crate::EngineError::InvalidParameter)
    /// for an even or zero kernel, or a zero cluster count or iteration budget.
    pub fn process(&self, raw: &PixelField) -> Result<PixelField> {
        let smoothed = box_blur(raw, self.options.smooth_kernel)?;
        let modeled = self.options.color_model.apply(&smoothed);

        match self.options.quantize {
            Some((k, iterations)) => Ok(Quantizer::new(k)
                .iterations(iterations)
                .seed(self.options.seed)
                .run(&modeled)?
                .apply()),
            None => Ok(modeled),
        }
    }
}
