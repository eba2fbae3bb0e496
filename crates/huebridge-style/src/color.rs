//! RGBA color values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseColorError;

/// An RGBA color with premultiplied alpha.
///
/// Serializes as a hex string (`"#RRGGBB"` or `"#RRGGBBAA"`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color from premultiplied RGBA components (0.0-1.0 range).
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from non-premultiplied RGBA components.
    #[inline]
    pub const fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r * a,
            g: g * a,
            b: b * a,
            a,
        }
    }

    /// Create a color from 8-bit RGBA components (0-255 range).
    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Create an opaque color from RGB components.
    #[inline]
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create an opaque color from 8-bit RGB components.
    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse a hex string such as `"#FF0000"` or `"#FF000080"`.
    ///
    /// The leading `#` is optional. Returns `None` for anything else,
    /// including non-ASCII input, so it never panics.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let len = digits.len();

        if (len != 6 && len != 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        let a = if len == 8 {
            u8::from_str_radix(&digits[6..8], 16).ok()?
        } else {
            255
        };

        Some(Self::from_rgba8(r, g, b, a))
    }

    /// Convert to non-premultiplied 8-bit components `[r, g, b, a]`.
    pub fn to_rgba8(self) -> [u8; 4] {
        let (r, g, b) = if self.a > 0.0 {
            (self.r / self.a, self.g / self.a, self.b / self.a)
        } else {
            (0.0, 0.0, 0.0)
        };
        [channel(r), channel(g), channel(b), channel(self.a)]
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        }
    }

    // Common colors
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::from_rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::from_rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::from_rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::from_rgb(0.0, 0.0, 1.0);
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| ParseColorError::new(s))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::RED));
        assert_eq!(Color::from_hex("00FF00"), Some(Color::GREEN));
        assert_eq!(Color::from_hex("#0000ffff"), Some(Color::BLUE));
    }

    #[test]
    fn hex_rejects_garbage() {
        assert_eq!(Color::from_hex(""), None);
        assert_eq!(Color::from_hex("#"), None);
        assert_eq!(Color::from_hex("ocean"), None);
        assert_eq!(Color::from_hex("#FF00"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
        assert_eq!(Color::from_hex("##FF0000"), None);
        assert_eq!(Color::from_hex("#FF0000F"), None);
        // Six bytes, but not six ASCII digits.
        assert_eq!(Color::from_hex("ééé"), None);
        assert_eq!(Color::from_hex("aéééb"), None);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(Color::RED.to_hex(), "#FF0000");
        assert_eq!(Color::from_rgb8(0x58, 0x56, 0xD6).to_hex(), "#5856D6");
        assert_eq!(Color::from_rgba8(255, 255, 255, 128).to_hex(), "#FFFFFF80");
        assert_eq!(Color::TRANSPARENT.to_hex(), "#00000000");
    }

    #[test]
    fn hex_round_trip_preserves_value() {
        let color = Color::from_hex("#30B0C7").unwrap();
        assert_eq!(Color::from_hex(&color.to_hex()), Some(color));
    }

    #[test]
    fn from_str_error() {
        let err = "teal-ish".parse::<Color>().unwrap_err();
        assert_eq!(err.input(), "teal-ish");
    }

    #[test]
    fn serde_as_hex_string() {
        let json = serde_json::to_string(&Color::RED).unwrap();
        assert_eq!(json, "\"#FF0000\"");

        let parsed: Color = serde_json::from_str("\"#007AFF\"").unwrap();
        assert_eq!(parsed, Color::from_rgb8(0, 122, 255));

        assert!(serde_json::from_str::<Color>("\"blue\"").is_err());
    }
}
