//! Style fragments: partial sets of visual attributes.
//!
//! Fragments are written as space-separated style strings such as
//! `"bold white on blue"`, `"italic green"` or `"on grey15"`.

use crate::color::Color;
use crate::error::StyleError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Text emphasis flags (bitflags).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self(0);
    /// Bold text.
    pub const BOLD: Self = Self(1 << 0);
    /// Italic text.
    pub const ITALIC: Self = Self(1 << 1);
    /// Underlined text.
    pub const UNDERLINE: Self = Self(1 << 2);
    /// Strikethrough text.
    pub const STRIKETHROUGH: Self = Self(1 << 3);
    /// Dim/faint text.
    pub const DIM: Self = Self(1 << 4);
    /// Blinking text.
    pub const BLINK: Self = Self(1 << 5);
    /// Reversed colors.
    pub const REVERSE: Self = Self(1 << 6);

    /// Create empty modifiers.
    #[must_use]
    pub const fn empty() -> Self {
        Self::NONE
    }

    /// Check if modifiers is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if all flags in `other` are set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "bold" | "b" => Some(Self::BOLD),
            "italic" | "i" => Some(Self::ITALIC),
            "underline" | "u" => Some(Self::UNDERLINE),
            "strike" | "s" | "strikethrough" => Some(Self::STRIKETHROUGH),
            "dim" | "d" => Some(Self::DIM),
            "blink" => Some(Self::BLINK),
            "reverse" | "r" => Some(Self::REVERSE),
            _ => None,
        }
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for Modifiers {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

/// Horizontal justification of cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

impl FromStr for Justify {
    type Err = StyleError;

    /// Accepts the CSS `text-align` keywords.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" | "end" => Ok(Self::Right),
            _ => Err(StyleError::InvalidJustify(s.to_string())),
        }
    }
}

/// A partial set of visual attributes. `None` means "not specified".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StyleFragment {
    /// Foreground (text) color.
    pub fg: Option<Color>,
    /// Background color.
    pub bg: Option<Color>,
    /// Horizontal justification.
    pub justify: Option<Justify>,
    /// Emphasis flags.
    pub modifiers: Option<Modifiers>,
}

impl StyleFragment {
    /// Empty fragment.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            justify: None,
            modifiers: None,
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn with_fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn with_bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Set the justification.
    #[must_use]
    pub const fn with_justify(mut self, justify: Justify) -> Self {
        self.justify = Some(justify);
        self
    }

    /// Set the emphasis flags.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    /// True when no attribute is specified.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.justify.is_none() && self.modifiers.is_none()
    }

    /// Parse a style string.
    ///
    /// Tokens: emphasis flags (`bold`, `italic`, `underline`, `strike`,
    /// `dim`, `blink`, `reverse`), justification (`left`, `center`,
    /// `right`), a foreground color, and `on <color>` for the background.
    /// Colors may be names, hex or `rgb(r, g, b)` triplets. `none`,
    /// `default` and the empty string yield an empty fragment.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError`] for unknown tokens and malformed colors.
    pub fn parse(input: &str) -> Result<Self, StyleError> {
        let mut fragment = Self::new();
        let tokens = tokenize(input);
        let mut iter = tokens.iter().map(String::as_str);

        while let Some(token) = iter.next() {
            let lower = token.to_ascii_lowercase();
            match lower.as_str() {
                "none" | "default" => {}
                "on" => {
                    let color = iter
                        .next()
                        .ok_or_else(|| StyleError::MissingBackground(input.to_string()))?;
                    fragment.bg = Some(Color::parse(color)?);
                }
                "left" | "center" | "right" => {
                    fragment.justify = Some(lower.parse()?);
                }
                other => {
                    if let Some(m) = Modifiers::from_token(other) {
                        fragment.modifiers = Some(fragment.modifiers.unwrap_or_default() | m);
                    } else {
                        fragment.fg = Some(Color::parse(token).map_err(|err| {
                            if token.starts_with('#') || token.starts_with("rgb(") {
                                err
                            } else {
                                StyleError::UnknownToken(token.to_string())
                            }
                        })?);
                    }
                }
            }
        }

        Ok(fragment)
    }
}

impl FromStr for StyleFragment {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split on whitespace, keeping `rgb( a, b, c )` together.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut open = false;
    for word in input.split_whitespace() {
        if open {
            if let Some(last) = tokens.last_mut() {
                last.push_str(word);
            }
        } else {
            tokens.push(word.to_string());
        }
        let last = tokens.last().map_or("", String::as_str);
        open = last.starts_with("rgb(") && !last.ends_with(')');
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_bitops() {
        let m = Modifiers::BOLD | Modifiers::ITALIC;
        assert!(m.contains(Modifiers::BOLD));
        assert!(m.contains(Modifiers::ITALIC));
        assert!(!m.contains(Modifiers::DIM));
        assert_eq!(m & Modifiers::BOLD, Modifiers::BOLD);
        assert!(Modifiers::empty().is_empty());
    }

    #[test]
    fn test_justify_from_css() {
        assert_eq!("center".parse::<Justify>().unwrap(), Justify::Center);
        assert_eq!("END".parse::<Justify>().unwrap(), Justify::Right);
        assert!("middle".parse::<Justify>().is_err());
    }

    #[test]
    fn test_parse_full_style() {
        let f = StyleFragment::parse("bold white on blue").unwrap();
        assert_eq!(f.fg, Some(Color::WHITE));
        assert_eq!(f.bg.map(|c| c.to_rgb8()), Some((0, 0, 255)));
        assert_eq!(f.modifiers, Some(Modifiers::BOLD));
        assert_eq!(f.justify, None);
    }

    #[test]
    fn test_parse_background_only() {
        let f = StyleFragment::parse("on grey15").unwrap();
        assert!(f.fg.is_none());
        assert_eq!(f.bg.map(|c| c.to_rgb8()), Some((38, 38, 38)));
    }

    #[test]
    fn test_parse_empty_and_none() {
        assert!(StyleFragment::parse("").unwrap().is_empty());
        assert!(StyleFragment::parse("none").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rgb_with_spaces() {
        let f = StyleFragment::parse("italic rgb(10, 20, 30) on #000").unwrap();
        assert_eq!(f.fg.map(|c| c.to_rgb8()), Some((10, 20, 30)));
        assert_eq!(f.bg, Some(Color::BLACK));
        assert_eq!(f.modifiers, Some(Modifiers::ITALIC));
    }

    #[test]
    fn test_parse_justification() {
        let f = StyleFragment::parse("right dim").unwrap();
        assert_eq!(f.justify, Some(Justify::Right));
        assert_eq!(f.modifiers, Some(Modifiers::DIM));
    }

    #[test]
    fn test_parse_unknown_token() {
        assert_eq!(
            StyleFragment::parse("bold sparkly").unwrap_err(),
            StyleError::UnknownToken("sparkly".into())
        );
    }

    #[test]
    fn test_parse_bad_hex_keeps_color_error() {
        assert!(matches!(
            StyleFragment::parse("#12").unwrap_err(),
            StyleError::InvalidColor { .. }
        ));
    }

    #[test]
    fn test_parse_dangling_on() {
        assert!(matches!(
            StyleFragment::parse("bold on").unwrap_err(),
            StyleError::MissingBackground(_)
        ));
    }

    #[test]
    fn test_tokenize_rgb() {
        assert_eq!(
            tokenize("rgb( 1, 2, 3 ) bold"),
            vec!["rgb(1,2,3)".to_string(), "bold".to_string()]
        );
    }
}
