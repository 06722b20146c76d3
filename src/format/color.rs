use std::fmt;
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;

/// An 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color {0:?}: expected six hex digits with an optional '#'")]
pub struct ParseColorError(String);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Add `amount` to every channel, clamping to `0..=255`.
    pub fn shift(self, amount: i32) -> Self {
        let channel = |value: u8| {
            let shifted = (i32::from(value) + amount).clamp(0, 255);
            u8::try_from(shifted).unwrap_or(u8::MAX)
        };
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_owned()));
        }

        let channel = |at: usize| {
            u8::from_str_radix(&digits[at..at + 2], 16).map_err(|_| ParseColorError(s.to_owned()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Lowercase `#rrggbb`.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    hex.parse().ok()
}

pub fn rgb_to_hex(rgb: Rgb) -> String {
    rgb.to_string()
}

/// Brighten `hex` by `percent` (negative darkens), each channel moving by
/// `floor(percent * 255 / 100 + 0.5)` and clamping at the ends.
pub fn lighten(hex: &str, percent: f64) -> Option<String> {
    let rgb = hex_to_rgb(hex)?;
    // Half-way cases round toward positive infinity.
    let amount = (percent * 255.0 / 100.0 + 0.5).floor();
    let amount = amount.clamp(-255.0, 255.0) as i32;
    Some(rgb.shift(amount).to_string())
}

pub fn darken(hex: &str, percent: f64) -> Option<String> {
    lighten(hex, -percent)
}

pub fn random_color() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..=0x00FF_FFFF);
    format!("#{value:06x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_hex_color(s: &str) -> bool {
        s.len() == 7 && s.starts_with('#') && s[1..].bytes().all(|b| b.is_ascii_hexdigit())
    }

    #[test]
    fn converts_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ffffff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(hex_to_rgb("#000000"), Some(Rgb::new(0, 0, 0)));
        assert_eq!(hex_to_rgb("FF0000"), Some(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(hex_to_rgb("invalid"), None);
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("#12345g"), None);
        assert!("##123456".parse::<Rgb>().is_err());
    }

    #[test]
    fn converts_rgb_to_hex() {
        assert_eq!(rgb_to_hex(Rgb::new(255, 255, 255)), "#ffffff");
        assert_eq!(rgb_to_hex(Rgb::new(0, 0, 0)), "#000000");
        assert_eq!(rgb_to_hex(Rgb::new(255, 0, 0)), "#ff0000");
        assert_eq!(rgb_to_hex(Rgb::new(1, 2, 3)), "#010203");
    }

    #[test]
    fn lighten_moves_and_clamps() {
        assert_eq!(lighten("#000000", 50.0).as_deref(), Some("#808080"));
        assert_eq!(lighten("#ffffff", 10.0).as_deref(), Some("#ffffff"));
        assert_eq!(lighten("#102030", 0.0).as_deref(), Some("#102030"));
        assert_eq!(lighten("#102030", 10.0).as_deref(), Some("#2a3a4a"));
        assert_eq!(lighten("nope", 10.0), None);
    }

    #[test]
    fn darken_moves_and_clamps() {
        assert_eq!(darken("#ffffff", 50.0).as_deref(), Some("#808080"));
        assert_eq!(darken("#000000", 10.0).as_deref(), Some("#000000"));
    }

    #[test]
    fn random_color_is_hex() {
        for _ in 0..32 {
            assert!(is_hex_color(&random_color()));
        }
    }
}
