//! Display-width aware truncation and alignment.

use framestyle_core::Justify;
use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Truncate to at most `max` terminal cells, ending in `…` when cut.
///
/// Cuts on grapheme boundaries, so combining marks and wide characters are
/// never split.
#[must_use]
pub fn truncate(s: &str, max: usize) -> Cow<'_, str> {
    if s.width() <= max {
        return Cow::Borrowed(s);
    }
    if max == 0 {
        return Cow::Borrowed("");
    }

    let budget = max - 1;
    let mut used = 0;
    let mut out = String::with_capacity(s.len());
    for grapheme in s.graphemes(true) {
        let w = grapheme.width();
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(grapheme);
    }
    out.push('…');
    Cow::Owned(out)
}

/// Collapse to one terminal line.
///
/// Line breaks (`\n`, `\r`, `\r\n`) become `↵` and other control characters
/// become spaces.
#[must_use]
pub fn single_line(s: &str) -> Cow<'_, str> {
    if !s.chars().any(char::is_control) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => out.push('↵'),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Truncate then pad to exactly `width` cells.
#[must_use]
pub fn fit(s: &str, width: usize, justify: Justify) -> String {
    let text = truncate(s, width);
    let gap = width.saturating_sub(text.width());
    let (left, right) = match justify {
        Justify::Left => (0, gap),
        Justify::Right => (gap, 0),
        Justify::Center => (gap / 2, gap - gap / 2),
    };
    let mut out = String::with_capacity(text.len() + gap);
    out.extend(std::iter::repeat(' ').take(left));
    out.push_str(&text);
    out.extend(std::iter::repeat(' ').take(right));
    out
}
