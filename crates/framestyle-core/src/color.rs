//! Color representation with WCAG luminance and color-spec parsing.

use crate::error::{ColorParseError, StyleError};
use crate::named;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGBA color with values in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component [0.0, 1.0]
    pub r: f32,
    /// Green component [0.0, 1.0]
    pub g: f32,
    /// Blue component [0.0, 1.0]
    pub b: f32,
    /// Alpha component [0.0, 1.0]
    pub a: f32,
}

impl Color {
    /// Create a new color, clamping values to [0.0, 1.0].
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color from RGB values.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create an opaque color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// 8-bit channels, rounded.
    #[must_use]
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
        )
    }

    /// Parse a hex color string (e.g., "#ff0000", "ff0000" or "#f00").
    ///
    /// Supports 3-character shorthand, 6-character RGB and 8-character RGBA.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex);
        }
        let channel =
            |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidHex);

        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Self::from_rgb8(r * 17, g * 17, b * 17))
            }
            6 => Ok(Self::from_rgb8(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => {
                let a = channel(&hex[6..8])?;
                let base = Self::from_rgb8(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                );
                Ok(Self {
                    a: f32::from(a) / 255.0,
                    ..base
                })
            }
            _ => Err(ColorParseError::InvalidLength),
        }
    }

    /// Parse an `rgb(r, g, b)` triplet with integer components 0-255.
    ///
    /// # Errors
    ///
    /// Returns an error if the triplet is malformed or out of range.
    pub fn from_rgb_triplet(s: &str) -> Result<Self, ColorParseError> {
        let inner = s
            .trim()
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(ColorParseError::InvalidRgb)?;

        let parts: Vec<u8> = inner
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| ColorParseError::InvalidRgb)?;

        match parts.as_slice() {
            [r, g, b] => Ok(Self::from_rgb8(*r, *g, *b)),
            _ => Err(ColorParseError::InvalidRgb),
        }
    }

    /// Parse any supported color notation: a named color, a hex triplet or
    /// an `rgb()` triplet.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::InvalidColor`] when no notation matches.
    pub fn parse(input: &str) -> Result<Self, StyleError> {
        ColorSpec::classify(input).resolve()
    }

    /// Convert to hex string (RGB only).
    #[must_use]
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Calculate relative luminance per WCAG 2.1.
    ///
    /// See: <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>
    #[must_use]
    pub fn relative_luminance(&self) -> f32 {
        let r = Self::linearize(self.r);
        let g = Self::linearize(self.g);
        let b = Self::linearize(self.b);

        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// Linearize sRGB component for luminance calculation.
    fn linearize(c: f32) -> f32 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    // Common colors
    /// Black color
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    /// White color
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    /// Transparent color
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A color as written by the caller, before conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpec {
    /// A color name such as `red`, `dark_blue` or `grey15`.
    Named(String),
    /// A hex string such as `#ff8800` or `#f80`.
    Hex(String),
    /// An 8-bit RGB triplet.
    Rgb(u8, u8, u8),
}

impl ColorSpec {
    /// Classify a color string by notation without validating it.
    #[must_use]
    pub fn classify(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with('#') {
            Self::Hex(trimmed.to_string())
        } else if let Ok(c) = Color::from_rgb_triplet(trimmed) {
            let (r, g, b) = c.to_rgb8();
            Self::Rgb(r, g, b)
        } else {
            Self::Named(trimmed.to_string())
        }
    }

    /// Convert to the internal color representation.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::InvalidColor`] for malformed hex strings and
    /// unknown names.
    pub fn resolve(&self) -> Result<Color, StyleError> {
        match self {
            Self::Rgb(r, g, b) => Ok(Color::from_rgb8(*r, *g, *b)),
            Self::Hex(hex) => Color::from_hex(hex).map_err(|source| StyleError::InvalidColor {
                input: hex.clone(),
                source,
            }),
            Self::Named(name) => {
                if name.starts_with("rgb(") {
                    return Err(StyleError::InvalidColor {
                        input: name.clone(),
                        source: ColorParseError::InvalidRgb,
                    });
                }
                named::lookup(name).ok_or_else(|| StyleError::InvalidColor {
                    input: name.clone(),
                    source: ColorParseError::UnknownName,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_constants() {
        assert_eq!(Color::BLACK.r, 0.0);
        assert_eq!(Color::WHITE.r, 1.0);
        assert_eq!(Color::TRANSPARENT.a, 0.0);
    }

    #[test]
    fn test_color_default() {
        assert_eq!(Color::default(), Color::BLACK);
    }

    #[test]
    fn test_from_hex_six_digits() {
        let c = Color::from_hex("#ff8000").unwrap();
        assert_eq!(c.to_rgb8(), (255, 128, 0));
    }

    #[test]
    fn test_from_hex_shorthand() {
        let c = Color::from_hex("#f80").unwrap();
        assert_eq!(c.to_rgb8(), (255, 136, 0));
    }

    #[test]
    fn test_from_hex_with_alpha() {
        let c = Color::from_hex("ff000080").unwrap();
        assert_eq!(c.to_rgb8(), (255, 0, 0));
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_hex_errors() {
        assert_eq!(Color::from_hex("#ff00"), Err(ColorParseError::InvalidLength));
        assert_eq!(Color::from_hex("#gg0000"), Err(ColorParseError::InvalidHex));
        assert_eq!(Color::from_hex("#ééé"), Err(ColorParseError::InvalidHex));
    }

    #[test]
    fn test_rgb_triplet() {
        let c = Color::from_rgb_triplet("rgb(255, 0, 10)").unwrap();
        assert_eq!(c.to_rgb8(), (255, 0, 10));
        assert!(Color::from_rgb_triplet("rgb(256, 0, 0)").is_err());
        assert!(Color::from_rgb_triplet("rgb(1, 2)").is_err());
    }

    #[test]
    fn test_parse_all_notations_agree() {
        let named = Color::parse("red").unwrap();
        let hex = Color::parse("#ff0000").unwrap();
        let rgb = Color::parse("rgb(255,0,0)").unwrap();
        assert_eq!(named, hex);
        assert_eq!(hex, rgb);
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = Color::parse("blurple").unwrap_err();
        assert!(matches!(
            err,
            StyleError::InvalidColor {
                source: ColorParseError::UnknownName,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_malformed_rgb_reports_rgb_error() {
        let err = Color::parse("rgb(1,2,three)").unwrap_err();
        assert!(matches!(
            err,
            StyleError::InvalidColor {
                source: ColorParseError::InvalidRgb,
                ..
            }
        ));
    }

    #[test]
    fn test_to_hex_round_trip() {
        assert_eq!(Color::from_rgb8(18, 52, 86).to_hex(), "#123456");
    }

    #[test]
    fn test_relative_luminance_extremes() {
        assert!(Color::BLACK.relative_luminance() < 1e-6);
        assert!((Color::WHITE.relative_luminance() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_hex_rejects_signs_and_non_digits() {
        assert_eq!(Color::from_hex("#+f+f+f"), Err(ColorParseError::InvalidHex));
        assert_eq!(Color::from_hex("#-1-1-1"), Err(ColorParseError::InvalidHex));
        assert_eq!(Color::from_hex("#gg0000"), Err(ColorParseError::InvalidHex));
        assert!(Color::parse("#+f+f+f").is_err());
    }

    #[test]
    fn test_classify() {
        assert_eq!(ColorSpec::classify("#fff"), ColorSpec::Hex("#fff".into()));
        assert_eq!(ColorSpec::classify("rgb(1,2,3)"), ColorSpec::Rgb(1, 2, 3));
        assert_eq!(ColorSpec::classify(" blue "), ColorSpec::Named("blue".into()));
    }

    #[test]
    fn test_color_display_is_hex() {
        assert_eq!(Color::WHITE.to_string(), "#ffffff");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_rgb8_round_trip(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
                let c = Color::from_rgb8(r, g, b);
                prop_assert_eq!(c.to_rgb8(), (r, g, b));
            }

            #[test]
            fn prop_all_notations_convert_to_same_color(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
                let hex = Color::parse(&format!("#{r:02x}{g:02x}{b:02x}")).unwrap();
                let rgb = Color::parse(&format!("rgb({r}, {g}, {b})")).unwrap();
                prop_assert_eq!(hex, rgb);
            }
        }
    }
}
