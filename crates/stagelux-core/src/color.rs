//! RGB color values for fixture output

use serde::{Deserialize, Serialize};

use crate::{CoreError, Result};

/// An 8-bit RGB color as sent on DMX color channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb8 {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl Rgb8 {
    /// All channels off.
    pub const BLACK: Rgb8 = Rgb8 { r: 0, g: 0, b: 0 };
    /// All channels full.
    pub const WHITE: Rgb8 = Rgb8 {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Create a color from its components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every component by a 0-100 level, truncating.
    ///
    /// This is the "virtual dimmer" applied when a fixture has no hardware
    /// Dim channel, and the brightness applied when a memory or pad source
    /// wins the HTP comparison.
    pub fn scaled(self, level: u8) -> Self {
        let level = u16::from(level.min(100));
        Self {
            r: (u16::from(self.r) * level / 100) as u8,
            g: (u16::from(self.g) * level / 100) as u8,
            b: (u16::from(self.b) * level / 100) as u8,
        }
    }

    /// Smallest of the three components. Used to derive a white channel.
    pub fn min_component(self) -> u8 {
        self.r.min(self.g).min(self.b)
    }

    /// Parse a `#rrggbb` string (the format the patch documents store).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(CoreError::InvalidColor(hex.to_string()));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| CoreError::InvalidColor(hex.to_string()))
        };
        Ok(Self {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_truncates() {
        let c = Rgb8::new(255, 10, 1);
        assert_eq!(c.scaled(50), Rgb8::new(127, 5, 0));
        assert_eq!(c.scaled(100), c);
        assert_eq!(c.scaled(0), Rgb8::BLACK);
    }

    #[test]
    fn scaled_clamps_level() {
        assert_eq!(Rgb8::new(100, 100, 100).scaled(200), Rgb8::new(100, 100, 100));
    }

    #[test]
    fn hex_roundtrip() {
        let c = Rgb8::new(0xff, 0x88, 0x00);
        assert_eq!(c.to_hex(), "#ff8800");
        assert_eq!(Rgb8::from_hex("#ff8800").unwrap(), c);
        assert_eq!(Rgb8::from_hex("ff8800").unwrap(), c);
    }

    #[test]
    fn hex_rejects_garbage() {
        assert!(Rgb8::from_hex("#ff88").is_err());
        assert!(Rgb8::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn min_component() {
        assert_eq!(Rgb8::new(200, 50, 120).min_component(), 50);
        assert_eq!(Rgb8::WHITE.min_component(), 255);
    }
}
