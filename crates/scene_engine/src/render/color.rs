//! Linear RGB colors

use serde::{Serialize, Deserialize};

/// Linear RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Color {
    /// Pure black
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Pure white
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Create a color from components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from 8-bit components
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// Create a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let [_, r, g, b] = hex.to_be_bytes();
        Self::from_rgb8(r, g, b)
    }

    /// Parse `#rrggbb` or `rrggbb`
    ///
    /// Malformed input yields white, the neutral multiplier.
    pub fn parse_hex(text: &str) -> Self {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if digits.len() != 6 {
            return Self::WHITE;
        }
        u32::from_str_radix(digits, 16).map_or(Self::WHITE, Self::from_hex)
    }

    /// Component-wise product
    pub fn multiply(self, other: Color) -> Self {
        Self::rgb(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    /// Weighted blend: `weight` of `self` plus `1 - weight` of `other`
    pub fn interpolate(self, other: Color, weight: f32) -> Self {
        Self::rgb(
            self.r * weight + other.r * (1.0 - weight),
            self.g * weight + other.g * (1.0 - weight),
            self.b * weight + other.b * (1.0 - weight),
        )
    }

    /// Scale every component
    pub fn scaled(self, factor: f32) -> Self {
        Self::rgb(self.r * factor, self.g * factor, self.b * factor)
    }

    /// True when every component is zero
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::parse_hex("#ff0000"), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(Color::parse_hex("00ff00"), Color::rgb(0.0, 1.0, 0.0));
        assert_eq!(Color::parse_hex("#zzzzzz"), Color::WHITE);
        assert_eq!(Color::parse_hex("#fff"), Color::WHITE);
        assert_eq!(Color::from_hex(0x0000ff), Color::rgb(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_interpolate_weights_first_color() {
        let warm = Color::rgb(1.0, 0.5, 0.0);
        assert_eq!(warm.interpolate(Color::WHITE, 1.0), warm);
        assert_eq!(warm.interpolate(Color::WHITE, 0.0), Color::WHITE);
        assert_eq!(Color::WHITE.multiply(warm), warm);
    }
}
