//! Five-flag dimension selector.

use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// One dimension of the feature vector, in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Channel1,
    Channel2,
    Channel3,
    Row,
    Column,
}

impl Dimension {
    /// All dimensions in mask order.
    pub const ALL: [Dimension; 5] = [
        Dimension::Channel1,
        Dimension::Channel2,
        Dimension::Channel3,
        Dimension::Row,
        Dimension::Column,
    ];

    /// Position of this dimension in the mask.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Which dimensions contribute to the weighted distance.
///
/// An all-false mask is legal: every distance is then 0.
///
/// ```
/// use field_engine::{Dimension, ParameterMask};
///
/// let mask: ParameterMask = "00011".parse().unwrap();
/// assert_eq!(mask, ParameterMask::SPATIAL);
/// assert!(mask.is_enabled(Dimension::Row));
/// assert!(!mask.has_color());
/// assert_eq!(mask.to_string(), "00011");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterMask {
    pub channel1: bool,
    pub channel2: bool,
    pub channel3: bool,
    pub row: bool,
    pub column: bool,
}

impl Default for ParameterMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl ParameterMask {
    pub const ALL: ParameterMask = ParameterMask::from_flags([true; 5]);
    pub const NONE: ParameterMask = ParameterMask::from_flags([false; 5]);
    pub const SPATIAL: ParameterMask = ParameterMask::from_flags([false, false, false, true, true]);
    pub const COLOR: ParameterMask = ParameterMask::from_flags([true, true, true, false, false]);

    /// Build from flags in `{channel1, channel2, channel3, row, column}` order.
    pub const fn from_flags(flags: [bool; 5]) -> Self {
        Self {
            channel1: flags[0],
            channel2: flags[1],
            channel3: flags[2],
            row: flags[3],
            column: flags[4],
        }
    }

    /// Flags in `{channel1, channel2, channel3, row, column}` order.
    pub const fn flags(self) -> [bool; 5] {
        [
            self.channel1,
            self.channel2,
            self.channel3,
            self.row,
            self.column,
        ]
    }

    #[inline]
    pub fn is_enabled(self, dimension: Dimension) -> bool {
        self.flags()[dimension.index()]
    }

    /// Copy of this mask with `dimension` set to `enabled`.
    pub fn with(self, dimension: Dimension, enabled: bool) -> Self {
        let mut flags = self.flags();
        flags[dimension.index()] = enabled;
        Self::from_flags(flags)
    }

    pub fn active_count(self) -> usize {
        self.flags().iter().filter(|&&f| f).count()
    }

    pub fn is_empty(self) -> bool {
        self.active_count() == 0
    }

    pub fn has_color(self) -> bool {
        self.channel1 || self.channel2 || self.channel3
    }

    pub fn has_spatial(self) -> bool {
        self.row || self.column
    }
}

impl fmt::Display for ParameterMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in self.flags() {
            f.write_str(if flag { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for ParameterMask {
    type Err = EngineError;

    /// Parse a five-character `0`/`1` string in mask order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.chars().count() != 5 {
            return Err(EngineError::invalid(
                "mask",
                format!("expected 5 flags, got '{}'", s),
            ));
        }
        let mut flags = [false; 5];
        for (flag, ch) in flags.iter_mut().zip(s.chars()) {
            *flag = match ch {
                '1' => true,
                '0' => false,
                other => {
                    return Err(EngineError::invalid(
                        "mask",
                        format!("flag must be 0 or 1, got '{}'", other),
                    ))
                }
            };
        }
        Ok(Self::from_flags(flags))
    }
}
