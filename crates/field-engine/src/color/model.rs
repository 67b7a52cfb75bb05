//! Color models applied to an image before control points sample it.
//!
//! Conversions follow the 8-bit conventions common to image libraries:
//! hue is stored as degrees / 2 (0..=179), every other component spans
//! 0..=255.

use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::field::PixelField;

use super::Color;

/// HLS lightness below this collapses to black.
const HLS_DARK_CUTOFF: u8 = 10;
/// HLS lightness above this collapses to white.
const HLS_LIGHT_CUTOFF: u8 = 240;

/// Color model applied to the processed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorModel {
    /// Channels are used as-is.
    #[default]
    Rgb,
    /// Channels become (hue/2, saturation, value) and stay in HSV.
    Hsv,
    /// Hue flattening: saturation forced to full, lightness posterized to
    /// black / mid / white, then converted back to RGB.
    Hls,
}

impl ColorModel {
    /// All models in display order.
    pub const ALL: [ColorModel; 3] = [ColorModel::Rgb, ColorModel::Hsv, ColorModel::Hls];

    /// Convert a single RGB pixel.
    pub fn convert(self, color: Color) -> Color {
        match self {
            ColorModel::Rgb => color,
            ColorModel::Hsv => rgb_to_hsv(color),
            ColorModel::Hls => {
                let [h, l, _] = rgb_to_hls(color).0;
                let l = if l < HLS_DARK_CUTOFF {
                    0
                } else if l > HLS_LIGHT_CUTOFF {
                    255
                } else {
                    128
                };
                hls_to_rgb(Color::new(h, l, 255))
            }
        }
    }

    /// Convert every pixel of an RGB field.
    pub fn apply(self, field: &PixelField) -> PixelField {
        if self == ColorModel::Rgb {
            return field.clone();
        }
        field.map(|c| self.convert(c))
    }

    /// Canonical upper-case name.
    pub fn name(self) -> &'static str {
        match self {
            ColorModel::Rgb => "RGB",
            ColorModel::Hsv => "HSV",
            ColorModel::Hls => "HLS",
        }
    }
}

impl fmt::Display for ColorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorModel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RGB" => Ok(ColorModel::Rgb),
            "HSV" => Ok(ColorModel::Hsv),
            "HLS" => Ok(ColorModel::Hls),
            other => Err(EngineError::invalid(
                "color_model",
                format!("unknown color model '{}' (expected RGB, HSV or HLS)", other),
            )),
        }
    }
}

/// Hue in degrees [0, 360) from normalised components.
fn hue_degrees(r: f32, g: f32, b: f32, max: f32, delta: f32) -> f32 {
    if delta <= 0.0 {
        return 0.0;
    }
    let h = if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Hue degrees to the 8-bit half-degree encoding (wrapping 180 to 0).
fn encode_hue(h: f32) -> u8 {
    let half = (h / 2.0).round();
    if half >= 180.0 {
        0
    } else {
        half as u8
    }
}

fn normalised(color: Color) -> (f32, f32, f32) {
    let [r, g, b] = color.0;
    (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

fn rgb_to_hsv(color: Color) -> Color {
    let (r, g, b) = normalised(color);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { delta / max } else { 0.0 };
    let h = hue_degrees(r, g, b, max, delta);

    Color::new(encode_hue(h), to_u8(s * 255.0), to_u8(max * 255.0))
}

fn rgb_to_hls(color: Color) -> Color {
    let (r, g, b) = normalised(color);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;

    let s = if delta <= 0.0 {
        0.0
    } else if l < 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let h = hue_degrees(r, g, b, max, delta);

    Color::new(encode_hue(h), to_u8(l * 255.0), to_u8(s * 255.0))
}

fn hue_component(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn hls_to_rgb(color: Color) -> Color {
    let [h, l, s] = color.0;
    let h = (h as f32 * 2.0) / 360.0;
    let l = l as f32 / 255.0;
    let s = s as f32 / 255.0;

    if s <= 0.0 {
        let v = to_u8(l * 255.0);
        return Color::new(v, v, v);
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Color::new(
        to_u8(hue_component(p, q, h + 1.0 / 3.0) * 255.0),
        to_u8(hue_component(p, q, h) * 255.0),
        to_u8(hue_component(p, q, h - 1.0 / 3.0) * 255.0),
    )
}
