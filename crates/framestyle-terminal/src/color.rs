//! Color mode detection and conversion for terminals.

use crossterm::style::Color as CrosstermColor;
use framestyle_core::Color;

/// Terminal color capability mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// 24-bit true color (COLORTERM=truecolor or 24bit).
    #[default]
    TrueColor,
    /// 256 color palette.
    Color256,
    /// 16 ANSI colors.
    Color16,
    /// Monochrome: no color escapes at all.
    Mono,
}

impl ColorMode {
    /// Auto-detect terminal color capabilities.
    #[must_use]
    pub fn detect() -> Self {
        if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            return Self::Mono;
        }
        Self::detect_with_env(std::env::var("COLORTERM").ok(), std::env::var("TERM").ok())
    }

    /// Detect color mode from environment variable values.
    #[must_use]
    #[allow(clippy::needless_pass_by_value)]
    pub fn detect_with_env(colorterm: Option<String>, term: Option<String>) -> Self {
        if let Some(ref ct) = colorterm {
            if ct == "truecolor" || ct == "24bit" {
                return Self::TrueColor;
            }
        }

        match term.as_deref() {
            Some(t) if t.contains("256color") => Self::Color256,
            Some(t) if t.contains("color") || t.contains("xterm") => Self::Color16,
            Some("dumb") | None => Self::Mono,
            _ => Self::Color16,
        }
    }

    /// Convert a color for this mode. `None` means "emit no color".
    ///
    /// Transparent colors and every color in [`ColorMode::Mono`] map to
    /// `None` so the terminal default shows through.
    #[must_use]
    pub fn to_crossterm(&self, color: Color) -> Option<CrosstermColor> {
        if color.a == 0.0 {
            return None;
        }

        let (r, g, b) = color.to_rgb8();
        match self {
            Self::TrueColor => Some(CrosstermColor::Rgb { r, g, b }),
            Self::Color256 => Some(CrosstermColor::AnsiValue(Self::rgb_to_256(r, g, b))),
            Self::Color16 => Some(Self::rgb_to_16(r, g, b)),
            Self::Mono => None,
        }
    }

    /// Convert RGB to a 256-color palette index.
    fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
        if r == g && g == b {
            if r < 8 {
                return 16;
            }
            if r > 248 {
                return 231;
            }
            // 24-step grayscale ramp
            return 232 + ((r - 8) / 10).min(23);
        }

        // 6x6x6 cube
        let r_idx = (u16::from(r) * 5 / 255) as u8;
        let g_idx = (u16::from(g) * 5 / 255) as u8;
        let b_idx = (u16::from(b) * 5 / 255) as u8;
        16 + 36 * r_idx + 6 * g_idx + b_idx
    }

    /// Convert RGB to one of the 16 ANSI colors.
    fn rgb_to_16(r: u8, g: u8, b: u8) -> CrosstermColor {
        let luminance = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
        let bright = luminance > 127;

        let threshold = r.max(g).max(b) / 2;
        let has_r = r > threshold;
        let has_g = g > threshold;
        let has_b = b > threshold;

        match (has_r, has_g, has_b, bright) {
            (false, false, false, false) => CrosstermColor::Black,
            (false, false, false, true) => CrosstermColor::DarkGrey,
            (true, false, false, false) => CrosstermColor::DarkRed,
            (true, false, false, true) => CrosstermColor::Red,
            (false, true, false, false) => CrosstermColor::DarkGreen,
            (false, true, false, true) => CrosstermColor::Green,
            (true, true, false, false) => CrosstermColor::DarkYellow,
            (true, true, false, true) => CrosstermColor::Yellow,
            (false, false, true, false) => CrosstermColor::DarkBlue,
            (false, false, true, true) => CrosstermColor::Blue,
            (true, false, true, false) => CrosstermColor::DarkMagenta,
            (true, false, true, true) => CrosstermColor::Magenta,
            (false, true, true, false) => CrosstermColor::DarkCyan,
            (false, true, true, true) => CrosstermColor::Cyan,
            (true, true, true, false) => CrosstermColor::Grey,
            (true, true, true, true) => CrosstermColor::White,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_default() {
        assert_eq!(ColorMode::default(), ColorMode::TrueColor);
    }

    #[test]
    fn test_truecolor_conversion() {
        let color = Color::from_rgb8(128, 64, 191);
        assert_eq!(
            ColorMode::TrueColor.to_crossterm(color),
            Some(CrosstermColor::Rgb {
                r: 128,
                g: 64,
                b: 191
            })
        );
    }

    #[test]
    fn test_transparent_emits_nothing() {
        assert_eq!(ColorMode::TrueColor.to_crossterm(Color::TRANSPARENT), None);
    }

    #[test]
    fn test_mono_emits_nothing() {
        assert_eq!(ColorMode::Mono.to_crossterm(Color::from_rgb8(255, 0, 0)), None);
    }

    #[test]
    fn test_256_grayscale() {
        assert_eq!(ColorMode::rgb_to_256(0, 0, 0), 16);
        assert_eq!(ColorMode::rgb_to_256(255, 255, 255), 231);
        assert!(ColorMode::rgb_to_256(128, 128, 128) >= 232);
    }

    #[test]
    fn test_256_color_cube() {
        let red = ColorMode::rgb_to_256(255, 0, 0);
        assert_eq!(red, 196);
        let viridis_low = ColorMode::rgb_to_256(0x44, 0x01, 0x54);
        assert!((16..=231).contains(&viridis_low));
    }

    #[test]
    fn test_16_color_mapping() {
        assert_eq!(ColorMode::rgb_to_16(0, 0, 0), CrosstermColor::Black);
        assert_eq!(ColorMode::rgb_to_16(255, 255, 255), CrosstermColor::White);
        assert!(matches!(
            ColorMode::rgb_to_16(255, 255, 0),
            CrosstermColor::Yellow | CrosstermColor::DarkYellow
        ));
    }

    #[test]
    fn test_detect_with_env() {
        assert_eq!(
            ColorMode::detect_with_env(Some("truecolor".into()), None),
            ColorMode::TrueColor
        );
        assert_eq!(
            ColorMode::detect_with_env(None, Some("xterm-256color".into())),
            ColorMode::Color256
        );
        assert_eq!(
            ColorMode::detect_with_env(None, Some("xterm".into())),
            ColorMode::Color16
        );
        assert_eq!(
            ColorMode::detect_with_env(None, Some("dumb".into())),
            ColorMode::Mono
        );
        assert_eq!(ColorMode::detect_with_env(None, None), ColorMode::Mono);
    }
}
