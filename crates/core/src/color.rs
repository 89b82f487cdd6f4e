use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{FreqVizError, Result};

/// Straight (non-premultiplied) RGBA colour with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Builds an opaque colour from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Linear interpolation in sRGB space, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = FreqVizError;

    /// Accepts `#rrggbb` and `#rrggbbaa`; the leading `#` is optional.
    fn from_str(value: &str) -> Result<Self> {
        let digits = value.trim().trim_start_matches('#');
        let invalid = || FreqVizError::InvalidConfig(format!("`{value}` is not a hex colour"));

        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |index: usize| {
            u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16).map_err(|_| invalid())
        };

        let alpha = if digits.len() == 8 { channel(3)? } else { 255 };
        Ok(Color::rgba(channel(0)?, channel(1)?, channel(2)?, alpha))
    }
}

impl TryFrom<String> for Color {
    type Error = FreqVizError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}
