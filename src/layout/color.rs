//! Colors and color normalization.
//!
//! Callers describe colors loosely (`"#336699"`, `[51, 102, 153]`,
//! `{"c": 0, "m": 0.2, "y": 0, "k": 0.1}`); [`ColorNormalizer`] turns them
//! into a device color with every component clamped to `[0, 1]`. Any
//! component above 1 is read as a 0-255 value.

use serde::{Deserialize, Serialize};

use crate::writer::ContentStreamOp;

/// A device color ready for content stream operators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorSpec", into = "ColorSpec")]
pub enum Color {
    /// DeviceRGB
    Rgb(f32, f32, f32),
    /// DeviceGray
    Gray(f32),
    /// DeviceCMYK
    Cmyk(f32, f32, f32, f32),
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

impl Color {
    /// Create an RGB color from 0-1 components.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color::Rgb(clamp(r), clamp(g), clamp(b))
    }

    /// Create a black color.
    pub fn black() -> Self {
        Color::Gray(0.0)
    }

    /// Create a white color.
    pub fn white() -> Self {
        Color::Gray(1.0)
    }

    /// Fill color operator (`rg` / `g` / `k`).
    pub fn fill_op(&self) -> ContentStreamOp {
        match *self {
            Color::Rgb(r, g, b) => ContentStreamOp::SetFillColorRGB(r, g, b),
            Color::Gray(g) => ContentStreamOp::SetFillColorGray(g),
            Color::Cmyk(c, m, y, k) => ContentStreamOp::SetFillColorCMYK(c, m, y, k),
        }
    }

    /// Stroke color operator (`RG` / `G` / `K`).
    pub fn stroke_op(&self) -> ContentStreamOp {
        match *self {
            Color::Rgb(r, g, b) => ContentStreamOp::SetStrokeColorRGB(r, g, b),
            Color::Gray(g) => ContentStreamOp::SetStrokeColorGray(g),
            Color::Cmyk(c, m, y, k) => ContentStreamOp::SetStrokeColorCMYK(c, m, y, k),
        }
    }
}

/// Loose color description as supplied by callers or flow records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    /// `#rgb` / `#rrggbb` (the `#` is optional)
    Hex(String),
    /// 1 (gray), 3 (RGB) or 4 (CMYK) components
    Components(Vec<f32>),
    /// Named RGB components
    Rgb {
        /// Red
        r: f32,
        /// Green
        g: f32,
        /// Blue
        b: f32,
    },
    /// Named CMYK components
    Cmyk {
        /// Cyan
        c: f32,
        /// Magenta
        m: f32,
        /// Yellow
        y: f32,
        /// Black
        k: f32,
    },
    /// Named gray level
    Gray {
        /// Gray level
        gray: f32,
    },
}

impl TryFrom<ColorSpec> for Color {
    type Error = String;

    fn try_from(spec: ColorSpec) -> Result<Self, Self::Error> {
        BasicColorNormalizer
            .normalize(&spec)
            .ok_or_else(|| format!("unrecognized color: {:?}", spec))
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        match color {
            Color::Rgb(r, g, b) => ColorSpec::Rgb { r, g, b },
            Color::Gray(gray) => ColorSpec::Gray { gray },
            Color::Cmyk(c, m, y, k) => ColorSpec::Cmyk { c, m, y, k },
        }
    }
}

/// Turns loose color descriptions into device colors.
pub trait ColorNormalizer {
    /// Normalize a color description; `None` when it cannot be understood.
    fn normalize(&self, spec: &ColorSpec) -> Option<Color>;
}

/// Default normalizer: hex strings, component arrays and named maps.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicColorNormalizer;

impl ColorNormalizer for BasicColorNormalizer {
    fn normalize(&self, spec: &ColorSpec) -> Option<Color> {
        match spec {
            ColorSpec::Hex(hex) => parse_hex(hex),
            ColorSpec::Components(components) => match components.as_slice() {
                [g] => Some(Color::Gray(unit(*g))),
                [r, g, b] => Some(Color::Rgb(unit(*r), unit(*g), unit(*b))),
                [c, m, y, k] => Some(Color::Cmyk(unit(*c), unit(*m), unit(*y), unit(*k))),
                _ => None,
            },
            ColorSpec::Rgb { r, g, b } => Some(Color::Rgb(unit(*r), unit(*g), unit(*b))),
            ColorSpec::Cmyk { c, m, y, k } => {
                Some(Color::Cmyk(unit(*c), unit(*m), unit(*y), unit(*k)))
            },
            ColorSpec::Gray { gray } => Some(Color::Gray(unit(*gray))),
        }
    }
}

/// Components above 1 are 0-255 values.
fn unit(value: f32) -> f32 {
    if value > 1.0 {
        clamp(value / 255.0)
    } else {
        clamp(value)
    }
}

fn clamp(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digits = hex.trim().trim_start_matches('#');
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}
