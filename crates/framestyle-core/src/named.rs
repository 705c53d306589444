//! Named color table.
//!
//! Covers the CSS basic names, the 16 ANSI names (`bright_*`), a few
//! `dark_*`/`light_*` variants and the `grey0`..`grey100` ramp. Lookup is
//! case-insensitive and treats `-` and spaces like `_`.

use crate::color::Color;

const NAMED: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("silver", [192, 192, 192]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("purple", [128, 0, 128]),
    ("teal", [0, 128, 128]),
    ("navy", [0, 0, 128]),
    ("orange", [255, 165, 0]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
    ("gold", [255, 215, 0]),
    ("violet", [238, 130, 238]),
    ("indigo", [75, 0, 130]),
    ("coral", [255, 127, 80]),
    ("salmon", [250, 128, 114]),
    ("khaki", [240, 230, 140]),
    ("turquoise", [64, 224, 208]),
    ("crimson", [220, 20, 60]),
    ("bright_black", [128, 128, 128]),
    ("bright_red", [255, 85, 85]),
    ("bright_green", [85, 255, 85]),
    ("bright_yellow", [255, 255, 85]),
    ("bright_blue", [85, 85, 255]),
    ("bright_magenta", [255, 85, 255]),
    ("bright_cyan", [85, 255, 255]),
    ("bright_white", [255, 255, 255]),
    ("dark_red", [139, 0, 0]),
    ("dark_green", [0, 100, 0]),
    ("dark_blue", [0, 0, 139]),
    ("dark_cyan", [0, 139, 139]),
    ("dark_magenta", [139, 0, 139]),
    ("dark_orange", [255, 140, 0]),
    ("dark_violet", [148, 0, 211]),
    ("light_red", [255, 128, 128]),
    ("light_green", [144, 238, 144]),
    ("light_blue", [173, 216, 230]),
    ("light_cyan", [224, 255, 255]),
    ("light_yellow", [255, 255, 224]),
    ("light_gray", [211, 211, 211]),
    ("light_grey", [211, 211, 211]),
    ("dark_gray", [169, 169, 169]),
    ("dark_grey", [169, 169, 169]),
];

/// Look up a color by name.
#[must_use]
pub fn lookup(name: &str) -> Option<Color> {
    let key = normalize(name);

    if let Some(level) = grey_level(&key) {
        return Some(Color::from_rgb8(level, level, level));
    }

    NAMED
        .iter()
        .find(|(n, _)| *n == key)
        .map(|(_, [r, g, b])| Color::from_rgb8(*r, *g, *b))
}

/// Iterate the fixed color names (the grey ramp is not listed).
pub fn names() -> impl Iterator<Item = &'static str> {
    NAMED.iter().map(|(n, _)| *n)
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// `grey37` / `gray37` → 37% of full intensity.
fn grey_level(key: &str) -> Option<u8> {
    let digits = key
        .strip_prefix("grey")
        .or_else(|| key.strip_prefix("gray"))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let percent: u32 = digits.parse().ok()?;
    if percent > 100 {
        return None;
    }
    Some(((percent * 255 + 50) / 100) as u8)
}
