//! 24-bit RGB color type and the pure numeric transforms theme
//! derivation is built on.
//!
//! Every transform is total over valid RGB input and exact-reproducible:
//! the same inputs always format to the same lower-case, zero-padded,
//! `#`-prefixed hex string. Fractional channel math truncates toward
//! zero to stay byte-compatible with previously generated documents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error produced when parsing a hex color string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected 6 hex digits, got {0:?}")]
    BadLength(String),

    #[error("invalid hex digit in {0:?}")]
    BadDigit(String),
}

/// A 24-bit RGB color. Alpha is handled separately by consumers that
/// need it (see [`Rgb::rgba_hex`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Format with a 2-hex-digit alpha suffix (`#rrggbbaa`) for targets
    /// whose roles need translucency.
    pub fn rgba_hex(&self, alpha: u8) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, alpha)
    }

    /// Move each channel toward 255 by `amount` of the remaining
    /// headroom. `amount` is clamped to [0, 1].
    pub fn lighten(&self, amount: f32) -> Rgb {
        let amount = amount.clamp(0.0, 1.0);
        let ch = |c: u8| -> u8 {
            let lifted = (c as f32 + (255.0 - c as f32) * amount) as u32;
            lifted.min(255) as u8
        };
        Rgb::new(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Scale each channel by `(1 - amount)`. `amount` is clamped to
    /// [0, 1].
    pub fn darken(&self, amount: f32) -> Rgb {
        let amount = amount.clamp(0.0, 1.0);
        let ch = |c: u8| -> u8 { (c as f32 * (1.0 - amount)) as u8 };
        Rgb::new(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Per-channel linear interpolation toward `other`. `ratio` 0 gives
    /// `self`, 1 gives `other`.
    pub fn blend(&self, other: Rgb, ratio: f32) -> Rgb {
        let ratio = ratio.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| -> u8 {
            let mixed = (a as f32 + (b as f32 - a as f32) * ratio) as i32;
            mixed.clamp(0, 255) as u8
        };
        Rgb::new(
            ch(self.r, other.r),
            ch(self.g, other.g),
            ch(self.b, other.b),
        )
    }

    /// Push channels away from their shared gray level (`amount > 0`)
    /// or pull them toward it (`amount <= 0`). A gray input (r == g ==
    /// b) is a fixed point for any amount.
    pub fn adjust_saturation(&self, amount: f32) -> Rgb {
        let gray = ((self.r as u32 + self.g as u32 + self.b as u32) / 3) as i32;
        let ch = |c: u8| -> u8 {
            let c = c as i32;
            let shifted = if amount > 0.0 {
                (c as f32 + (c - gray) as f32 * amount) as i32
            } else {
                (gray as f32 + (c - gray) as f32 * (1.0 + amount)) as i32
            };
            shifted.clamp(0, 255) as u8
        };
        Rgb::new(ch(self.r), ch(self.g), ch(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Parse `#rrggbb` (leading `#` optional, case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            return Err(ColorParseError::BadLength(s.to_string()));
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(s.to_string()));
        }
        let value =
            u32::from_str_radix(hex, 16).map_err(|_| ColorParseError::BadDigit(s.to_string()))?;
        Ok(Rgb::new(
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
