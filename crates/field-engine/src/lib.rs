#![allow(clippy::module_inception)]

//! field-engine: sparse-sample field reconstruction and comparison
//!
//! Given a handful of control points (a position plus a color sampled from
//! a processed image) this crate rebuilds a full-resolution field by giving
//! every pixel the color of its nearest control point, answers single-point
//! nearest queries, compares two fields under a tolerance, and reduces an
//! image to a small palette.
//!
//! # Quick Start
//!
//! ```
//! use field_engine::{
//!     compute_difference, reconstruct_field, Color, ControlPoints, ParameterMask, PixelField,
//!     Position,
//! };
//!
//! let mut image = PixelField::filled(6, 2, Color::new(255, 0, 0));
//! for row in 0..2 {
//!     for col in 3..6 {
//!         image.set(row, col, Color::new(0, 0, 255));
//!     }
//! }
//!
//! let points = ControlPoints::sample(&[Position::new(0, 0), Position::new(1, 5)], &image).unwrap();
//! let field = reconstruct_field(&points, ParameterMask::ALL, &image, 6, 2).unwrap();
//! let diff = compute_difference(&image, &field, 0.0).unwrap();
//!
//! assert_eq!(diff.rounded_percentage(), 100);
//! ```
//!
//! # Weighted Distance
//!
//! Each pixel and each control point is a five-dimensional feature:
//! three color channels, row and column. A [`ParameterMask`] selects which
//! dimensions count. Every dimension is normalized to roughly `[0, 1]`
//! (channels by 255, rows by the canvas height, columns by the canvas
//! width) so that no attribute dominates because of its units.
//!
//! Nearest means smallest weighted distance; equal distances resolve to the
//! lowest control point index. This rule holds for every search strategy.
//!
//! # Ownership
//!
//! Every operation is a function over borrowed, read-only inputs. The
//! mutable [`ControlPointStore`] belongs to the caller and is frozen into a
//! [`ControlPoints`] snapshot before each call. Nothing is cached between
//! calls; concurrent calls on distinct inputs are independent.
//!
//! # Modules
//!
//! - [`metric`]: parameter mask and weighted distance
//! - [`reconstruct`]: field reconstruction and nearest-point query
//! - [`difference`]: threshold comparison
//! - [`quantize`]: k-means palette quantization
//! - [`preprocess`]: smoothing and color model ahead of sampling
//! - [`api`]: [`FieldPipeline`] tying the above together

pub mod api;
pub mod color;
pub mod control;
pub mod difference;
mod domain_tests;
pub mod error;
pub mod field;
pub mod metric;
pub mod preprocess;
pub mod quantize;
pub mod reconstruct;

pub use api::{FieldPipeline, PipelineOutput};
pub use color::{Color, ColorModel, ParseColorError};
pub use control::{ControlPoint, ControlPointStore, ControlPoints, Position, DEFAULT_REMOVE_RADIUS};
pub use difference::{compute_difference, DifferenceResult, MATCH_COLOR, MISMATCH_COLOR};
pub use error::{EngineError, Result};
pub use field::PixelField;
pub use metric::{Dimension, Feature, ParameterMask, WeightedMetric};
pub use preprocess::{PreprocessOptions, Preprocessor, SMOOTH_KERNELS};
pub use quantize::{quantize_palette, ClusterPalette, Quantizer};
pub use reconstruct::{
    nearest_control_point, reconstruct_assignments, reconstruct_field, reconstruct_field_with,
    SearchStrategy,
};
