//! Unified error type for the field-engine public API.
//!
//! Every fallible engine call returns [`EngineError`]. Degenerate but valid
//! inputs (an empty parameter mask, more clusters than distinct colors, a
//! threshold of exactly 0 or 100) are defined behaviors and never errors.

use std::fmt;

use crate::color::ParseColorError;

/// Errors surfaced by the engine operations.
///
/// All variants are fatal to the call that produced them and recoverable
/// by the caller; nothing in the engine retries.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Reconstruction or nearest-point query invoked with zero control points.
    EmptyStore,
    /// Two buffers that must share dimensions do not.
    DimensionMismatch {
        /// Dimensions required by the call, as `(width, height)`.
        expected: (usize, usize),
        /// Dimensions actually supplied, as `(width, height)`.
        actual: (usize, usize),
    },
    /// A numeric or textual parameter is outside its accepted domain.
    InvalidParameter {
        /// Parameter name as the caller knows it.
        name: &'static str,
        /// Human-readable constraint that was violated.
        reason: String,
    },
    /// A position lies outside the image it indexes.
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },
    /// Invalid hex color string.
    ParseColor(ParseColorError),
}

impl EngineError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::EmptyStore => write!(f, "control point store is empty"),
            EngineError::DimensionMismatch { expected, actual } => write!(
                f,
                "dimension mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            EngineError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter `{}`: {}", name, reason)
            }
            EngineError::OutOfBounds {
                row,
                col,
                width,
                height,
            } => write!(
                f,
                "position (row {}, col {}) outside {}x{} image",
                row, col, width, height
            ),
            EngineError::ParseColor(err) => write!(f, "color parse error: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::ParseColor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseColorError> for EngineError {
    fn from(err: ParseColorError) -> Self {
        EngineError::ParseColor(err)
    }
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
