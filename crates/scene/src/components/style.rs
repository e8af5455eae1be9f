use serde::{Deserialize, Serialize};

/// Linear RGBA color, components in `0.0..=1.0`.
///
/// Deserializes from either `{ "r", "g", "b", "a"? }` or a CSS hex string.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    pub const DARK_RED: Self = Self::rgb(0.545, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rgb` or `#rrggbb`.
    pub fn from_css_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        let channel = |v: u8, max: f32| f32::from(v) / max;
        match hex.len() {
            3 => {
                let mut c = [0u8; 3];
                for (i, ch) in hex.chars().enumerate() {
                    c[i] = ch.to_digit(16)? as u8;
                }
                Some(Self::rgb(
                    channel(c[0], 15.0),
                    channel(c[1], 15.0),
                    channel(c[2], 15.0),
                ))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
                Some(Self::rgb(
                    channel(byte(0)?, 255.0),
                    channel(byte(2)?, 255.0),
                    channel(byte(4)?, 255.0),
                ))
            }
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Css(String),
    Rgba {
        r: f32,
        g: f32,
        b: f32,
        #[serde(default = "opaque")]
        a: f32,
    },
}

fn opaque() -> f32 {
    1.0
}

impl TryFrom<ColorRepr> for Color {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Css(text) => {
                Color::from_css_hex(&text).ok_or_else(|| format!("invalid css color {text:?}"))
            }
            ColorRepr::Rgba { r, g, b, a } => Ok(Color { r, g, b, a }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointStyle {
    pub pixel_size: f32,
    pub color: Color,
    pub outline_width: f32,
    pub clamp_to_ground: bool,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            pixel_size: 10.0,
            color: Color::DARK_RED,
            outline_width: 2.0,
            clamp_to_ground: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub width: f32,
    pub color: Color,
    /// Color used where the line is occluded by terrain.
    pub depth_fail_color: Option<Color>,
    pub clamp_to_ground: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 2.0,
            color: Color::YELLOW,
            depth_fail_color: Some(Color::YELLOW),
            clamp_to_ground: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonStyle {
    pub fill: Color,
    pub filled: bool,
    pub clamp_to_ground: bool,
}

impl Default for PolygonStyle {
    fn default() -> Self {
        Self {
            fill: Color::RED.with_alpha(0.5),
            filled: true,
            clamp_to_ground: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub font: String,
    pub fill: Color,
    pub pixel_offset: [f32; 2],
    /// Draw over terrain and other primitives regardless of depth.
    pub always_on_top: bool,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font: "14px sans-serif".to_string(),
            fill: Color::WHITE,
            pixel_offset: [10.0, 10.0],
            always_on_top: true,
        }
    }
}
