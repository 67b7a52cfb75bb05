use field_engine::{
    ColorModel, EngineError, FieldPipeline, ParameterMask, PreprocessOptions, DEFAULT_REMOVE_RADIUS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Enabled distance dimensions as five 0/1 flags: channel 1-3, row, column
    pub mask: String,

    /// Cluster count for palette quantization
    pub kmeans_clusters: usize,

    /// Iteration budget for palette quantization
    pub kmeans_iterations: usize,

    /// Quantizer seed
    pub seed: u64,

    /// Difference tolerance in percent of channel range
    pub threshold: f64,

    /// Box blur kernel size (odd)
    pub smooth_kernel: usize,

    /// "RGB", "HSV" or "HLS"
    pub color_model: String,

    /// Quantize the processed image
    pub quantize: bool,

    /// Compute the difference image in pipeline runs
    pub compare: bool,

    /// Largest accepted canvas side in pixels
    pub max_canvas: usize,

    /// Largest accepted blur kernel
    pub max_smooth_kernel: usize,

    /// Largest accepted cluster count
    pub max_kmeans_clusters: usize,

    /// Largest accepted iteration budget
    pub max_kmeans_iterations: usize,

    /// Radius in pixels within which a click removes a control point
    pub remove_radius: f64,

    /// Server listen address
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mask: ParameterMask::ALL.to_string(),
            kmeans_clusters: field_engine::quantize::DEFAULT_K,
            kmeans_iterations: field_engine::quantize::DEFAULT_ITERATIONS,
            seed: field_engine::quantize::DEFAULT_SEED,
            threshold: 0.0,
            smooth_kernel: 1,
            color_model: ColorModel::Rgb.to_string(),
            quantize: false,
            compare: true,
            max_canvas: 5000,
            max_smooth_kernel: 49,
            max_kmeans_clusters: 256,
            max_kmeans_iterations: 100,
            remove_radius: DEFAULT_REMOVE_RADIUS,
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid setting: {0}")]
    Invalid(#[from] EngineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from `path`, or from `CONFIG_FILE` when `path` is
    /// `None`. Falls back to defaults when no file is given or it cannot be
    /// used. `BIND_ADDR` overrides the listen address.
    pub fn load(path: Option<&Path>) -> Self {
        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));

        let mut config = match path {
            Some(path) => match Self::from_file(&path) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        mask = %config.mask,
                        color_model = %config.color_model,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), %e, "Failed to load config, using defaults");
                    Self::default()
                }
            },
            None => {
                tracing::debug!("No config file given, using defaults");
                Self::default()
            }
        };

        if let Ok(addr) = std::env::var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        config
    }

    /// Read and validate a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML. Missing keys take their defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every engine-facing setting.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.preprocess_options()?;
        self.parameter_mask()?;
        field_engine::difference::check_threshold(self.threshold)?;
        if self.max_canvas == 0 {
            return Err(invalid("max_canvas", "must be at least 1"));
        }
        if self.max_kmeans_clusters == 0 {
            return Err(invalid("max_kmeans_clusters", "must be at least 1"));
        }
        if self.max_kmeans_iterations == 0 {
            return Err(invalid("max_kmeans_iterations", "must be at least 1"));
        }
        self.check_quantize(self.kmeans_clusters, self.kmeans_iterations)?;
        self.check_smooth_kernel(self.smooth_kernel)?;
        if !(self.remove_radius > 0.0) {
            return Err(invalid("remove_radius", "must be positive"));
        }
        Ok(())
    }

    /// Cluster count and iteration budget within `1..=max`.
    pub fn check_quantize(&self, k: usize, iterations: usize) -> Result<(), EngineError> {
        if k == 0 || k > self.max_kmeans_clusters {
            return Err(invalid(
                "kmeans_clusters",
                &format!("must be within 1..={}, got {}", self.max_kmeans_clusters, k),
            ));
        }
        if iterations == 0 || iterations > self.max_kmeans_iterations {
            return Err(invalid(
                "kmeans_iterations",
                &format!(
                    "must be within 1..={}, got {}",
                    self.max_kmeans_iterations, iterations
                ),
            ));
        }
        Ok(())
    }

    /// Odd kernel no larger than `max_smooth_kernel`.
    pub fn check_smooth_kernel(&self, kernel: usize) -> Result<(), EngineError> {
        if kernel % 2 == 0 {
            return Err(invalid("smooth_kernel", "must be odd"));
        }
        if kernel > self.max_smooth_kernel {
            return Err(invalid(
                "smooth_kernel",
                &format!("must be at most {}, got {}", self.max_smooth_kernel, kernel),
            ));
        }
        Ok(())
    }

    pub fn parameter_mask(&self) -> Result<ParameterMask, EngineError> {
        self.mask.parse()
    }

    pub fn color_model(&self) -> Result<ColorModel, EngineError> {
        self.color_model.parse()
    }

    /// Preprocessing options derived from the smoothing, color model and
    /// quantization settings.
    pub fn preprocess_options(&self) -> Result<PreprocessOptions, EngineError> {
        let options = PreprocessOptions::new()
            .smooth(self.smooth_kernel)
            .color_model(self.color_model()?)
            .seed(self.seed);
        Ok(if self.quantize {
            options.quantize(self.kmeans_clusters, self.kmeans_iterations)
        } else {
            options
        })
    }

    /// Pipeline configured from this file.
    pub fn pipeline(&self) -> Result<FieldPipeline, EngineError> {
        Ok(FieldPipeline::new(self.parameter_mask()?)
            .preprocess(self.preprocess_options()?)
            .threshold(self.threshold)
            .compare(self.compare))
    }
}

fn invalid(name: &'static str, reason: &str) -> EngineError {
    EngineError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}
