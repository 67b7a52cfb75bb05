//! Three-channel 8-bit color value.
//!
//! The engine never interprets channels: a [`Color`] may hold RGB, HSV or
//! any other 3-channel encoding, as long as every buffer taking part in one
//! call uses the same model.

use std::fmt;
use std::str::FromStr;

use super::error::ParseColorError;

/// Full range of a single channel, used to normalise channel differences.
pub const CHANNEL_RANGE: f64 = 255.0;

/// Three opaque 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);

    /// Create a color from its three channel values.
    ///
    /// # Example
    /// ```
    /// use field_engine::Color;
    /// let red = Color::new(255, 0, 0);
    /// assert_eq!(red.channels(), [255, 0, 0]);
    /// ```
    #[inline]
    pub const fn new(c1: u8, c2: u8, c3: u8) -> Self {
        Self([c1, c2, c3])
    }

    /// Returns the channel values as a byte array.
    #[inline]
    pub const fn channels(self) -> [u8; 3] {
        self.0
    }

    /// Largest absolute per-channel difference to `other`.
    #[inline]
    pub fn max_channel_delta(self, other: Color) -> u8 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| a.abs_diff(b))
            .max()
            .unwrap_or(0)
    }

    /// Squared Euclidean distance over the three channels.
    #[inline]
    pub fn distance_squared(self, other: Color) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| {
                let d = a.abs_diff(b) as u32;
                d * d
            })
            .sum()
    }

    /// Format as `#RRGGBB` (lowercase).
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

impl From<[u8; 3]> for Color {
    fn from(bytes: [u8; 3]) -> Self {
        Self(bytes)
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse a color from a hex string.
    ///
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`. Parsing is
    /// case-insensitive and surrounding whitespace is trimmed.
    ///
    /// ```
    /// use field_engine::Color;
    ///
    /// let white: Color = "#FFFFFF".parse().unwrap();
    /// assert_eq!(white, Color::WHITE);
    ///
    /// let red: Color = "#F00".parse().unwrap();
    /// assert_eq!(red, Color::new(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // Shorthand: expand each digit by multiplying by 17 (0xF -> 0xFF)
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}
