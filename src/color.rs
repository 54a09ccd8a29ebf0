//! Linear RGBA colors and 8-bit sRGB triples.
//!
//! [`Color`] stores *linear* components, which is what the shaders expect
//! (the surface format is sRGB, so the GPU encodes on write). Colors that come
//! from the outside world, such as hex strings in config or the pointer-driven
//! [`Rgb8`] triples, are sRGB-encoded and go through [`Color::from_srgb8`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An RGBA color with linear components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Decode an 8-bit sRGB triple into an opaque linear color.
    pub fn from_srgb8(rgb: Rgb8) -> Self {
        Self::rgb(
            srgb_to_linear(rgb.r),
            srgb_to_linear(rgb.g),
            srgb_to_linear(rgb.b),
        )
    }

    /// Parse a `#rrggbb` (or `rrggbb`) sRGB hex string.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        Rgb8::from_hex(hex).map(Self::from_srgb8)
    }

    /// Encode back to the nearest 8-bit sRGB triple, ignoring alpha.
    pub fn to_srgb8(self) -> Rgb8 {
        Rgb8::new(
            linear_to_srgb(self.r),
            linear_to_srgb(self.g),
            linear_to_srgb(self.b),
        )
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_srgb8().to_string()
    }
}

/// An 8-bit-per-channel sRGB triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = f32::from(channel) / 255.0;
    if c < 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(channel: f32) -> u8 {
    let c = channel.clamp(0.0, 1.0);
    let encoded = if c < 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Rgb8::from_hex("#00ff83").unwrap(), Rgb8::new(0, 255, 131));
        assert_eq!(Rgb8::from_hex("FFFFFF").unwrap(), Rgb8::new(255, 255, 255));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Rgb8::from_hex("#00ff8").is_err());
        assert!(Rgb8::from_hex("#zzzzzz").is_err());
        assert!(Rgb8::from_hex("#ff00ffaa").is_err());
    }

    #[test]
    fn srgb_round_trips_through_linear() {
        for rgb in [Rgb8::new(0, 255, 131), Rgb8::new(128, 128, 150), Rgb8::new(3, 7, 250)] {
            assert_eq!(Color::from_srgb8(rgb).to_srgb8(), rgb);
        }
    }

    #[test]
    fn srgb_decoding_darkens_midtones() {
        let mid = Color::from_srgb8(Rgb8::new(128, 128, 128));
        assert!((mid.r - 0.2158).abs() < 1e-3);
        let red = Color::from_srgb8(Rgb8::new(255, 0, 0));
        assert!((red.r - 1.0).abs() < 1e-6);
        assert_eq!((red.g, red.b, red.a), (0.0, 0.0, 1.0));
    }

    #[test]
    fn hex_display_is_lowercase_with_hash() {
        assert_eq!(Rgb8::new(0, 255, 131).to_string(), "#00ff83");
    }
}
