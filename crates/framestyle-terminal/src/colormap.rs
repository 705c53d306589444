//! Named colormaps.
//!
//! Each map is a static table of evenly spaced 8-bit stops. Sampling
//! interpolates linearly between neighbouring stops and rounds to 8 bits,
//! so `t = 0.0` and `t = 1.0` return the first and last stop exactly.
//! The table is immutable and safe to read from any thread.

use crate::error::RenderError;
use framestyle_core::Color;

/// Name used when a gradient asks for `"gradient"`.
pub const DEFAULT_COLORMAP: &str = "viridis";

type Stops = &'static [[u8; 3]];

const VIRIDIS: Stops = &[
    [0x44, 0x01, 0x54],
    [0x47, 0x2d, 0x7b],
    [0x3b, 0x52, 0x8b],
    [0x2c, 0x72, 0x8e],
    [0x21, 0x91, 0x8c],
    [0x28, 0xae, 0x80],
    [0x5e, 0xc9, 0x62],
    [0xad, 0xdc, 0x30],
    [0xfd, 0xe7, 0x25],
];

const PLASMA: Stops = &[
    [0x0d, 0x08, 0x87],
    [0x4c, 0x02, 0xa1],
    [0x7e, 0x03, 0xa8],
    [0xa9, 0x23, 0x95],
    [0xcc, 0x47, 0x78],
    [0xe5, 0x6b, 0x5d],
    [0xf8, 0x95, 0x40],
    [0xfd, 0xc5, 0x27],
    [0xf0, 0xf9, 0x21],
];

const INFERNO: Stops = &[
    [0x00, 0x00, 0x04],
    [0x1f, 0x0c, 0x48],
    [0x55, 0x0f, 0x6d],
    [0x88, 0x22, 0x6a],
    [0xba, 0x36, 0x55],
    [0xe3, 0x59, 0x33],
    [0xf9, 0x8e, 0x09],
    [0xf9, 0xcb, 0x35],
    [0xfc, 0xff, 0xa4],
];

const MAGMA: Stops = &[
    [0x00, 0x00, 0x04],
    [0x1c, 0x10, 0x44],
    [0x4f, 0x12, 0x7b],
    [0x81, 0x25, 0x81],
    [0xb5, 0x36, 0x7a],
    [0xe5, 0x50, 0x64],
    [0xfb, 0x87, 0x61],
    [0xfe, 0xc2, 0x87],
    [0xfc, 0xfd, 0xbf],
];

const CIVIDIS: Stops = &[
    [0x00, 0x22, 0x4e],
    [0x12, 0x35, 0x70],
    [0x3b, 0x49, 0x6c],
    [0x57, 0x5d, 0x6d],
    [0x70, 0x71, 0x73],
    [0x8a, 0x86, 0x78],
    [0xa5, 0x9c, 0x74],
    [0xc3, 0xb3, 0x69],
    [0xfe, 0xe8, 0x38],
];

const COOLWARM: Stops = &[
    [0x3b, 0x4c, 0xc0],
    [0x62, 0x82, 0xea],
    [0x8d, 0xb0, 0xfe],
    [0xb8, 0xd0, 0xf9],
    [0xdd, 0xdc, 0xdc],
    [0xf5, 0xc4, 0xad],
    [0xf4, 0x9a, 0x7b],
    [0xde, 0x60, 0x4d],
    [0xb4, 0x04, 0x26],
];

const RDYLBU: Stops = &[
    [0xa5, 0x00, 0x26],
    [0xd7, 0x30, 0x27],
    [0xf4, 0x6d, 0x43],
    [0xfd, 0xae, 0x61],
    [0xfe, 0xe0, 0x90],
    [0xff, 0xff, 0xbf],
    [0xe0, 0xf3, 0xf8],
    [0xab, 0xd9, 0xe9],
    [0x74, 0xad, 0xd1],
    [0x45, 0x75, 0xb4],
    [0x31, 0x36, 0x95],
];

const RDYLGN: Stops = &[
    [0xa5, 0x00, 0x26],
    [0xd7, 0x30, 0x27],
    [0xf4, 0x6d, 0x43],
    [0xfd, 0xae, 0x61],
    [0xfe, 0xe0, 0x8b],
    [0xff, 0xff, 0xbf],
    [0xd9, 0xef, 0x8b],
    [0xa6, 0xd9, 0x6a],
    [0x66, 0xbd, 0x63],
    [0x1a, 0x98, 0x50],
    [0x00, 0x68, 0x37],
];

const SPECTRAL: Stops = &[
    [0x9e, 0x01, 0x42],
    [0xd5, 0x3e, 0x4f],
    [0xf4, 0x6d, 0x43],
    [0xfd, 0xae, 0x61],
    [0xfe, 0xe0, 0x8b],
    [0xff, 0xff, 0xbf],
    [0xe6, 0xf5, 0x98],
    [0xab, 0xdd, 0xa4],
    [0x66, 0xc2, 0xa5],
    [0x32, 0x88, 0xbd],
    [0x5e, 0x4f, 0xa2],
];

const BLUES: Stops = &[
    [0xf7, 0xfb, 0xff],
    [0xde, 0xeb, 0xf7],
    [0xc6, 0xdb, 0xef],
    [0x9e, 0xca, 0xe1],
    [0x6b, 0xae, 0xd6],
    [0x42, 0x92, 0xc6],
    [0x21, 0x71, 0xb5],
    [0x08, 0x51, 0x9c],
    [0x08, 0x30, 0x6b],
];

const GREENS: Stops = &[
    [0xf7, 0xfc, 0xf5],
    [0xe5, 0xf5, 0xe0],
    [0xc7, 0xe9, 0xc0],
    [0xa1, 0xd9, 0x9b],
    [0x74, 0xc4, 0x76],
    [0x41, 0xab, 0x5d],
    [0x23, 0x8b, 0x45],
    [0x00, 0x6d, 0x2c],
    [0x00, 0x44, 0x1b],
];

const REDS: Stops = &[
    [0xff, 0xf5, 0xf0],
    [0xfe, 0xe0, 0xd2],
    [0xfc, 0xbb, 0xa1],
    [0xfc, 0x92, 0x72],
    [0xfb, 0x6a, 0x4a],
    [0xef, 0x3b, 0x2c],
    [0xcb, 0x18, 0x1d],
    [0xa5, 0x0f, 0x15],
    [0x67, 0x00, 0x0d],
];

const GREYS: Stops = &[
    [0xff, 0xff, 0xff],
    [0xf0, 0xf0, 0xf0],
    [0xd9, 0xd9, 0xd9],
    [0xbd, 0xbd, 0xbd],
    [0x96, 0x96, 0x96],
    [0x73, 0x73, 0x73],
    [0x52, 0x52, 0x52],
    [0x25, 0x25, 0x25],
    [0x00, 0x00, 0x00],
];

const COLORMAPS: &[(&str, Stops)] = &[
    ("viridis", VIRIDIS),
    ("plasma", PLASMA),
    ("inferno", INFERNO),
    ("magma", MAGMA),
    ("cividis", CIVIDIS),
    ("coolwarm", COOLWARM),
    ("RdYlBu", RDYLBU),
    ("RdYlGn", RDYLGN),
    ("Spectral", SPECTRAL),
    ("Blues", BLUES),
    ("Greens", GREENS),
    ("Reds", REDS),
    ("Greys", GREYS),
];

/// A named colormap, optionally reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colormap {
    name: &'static str,
    stops: Stops,
    reversed: bool,
}

impl Colormap {
    /// Look up a colormap by name.
    ///
    /// Names are case-insensitive, a `_r` suffix reverses the map and
    /// `"gradient"` is an alias of [`DEFAULT_COLORMAP`].
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        let (base, reversed) = match trimmed.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (trimmed, false),
        };
        let base = if base.eq_ignore_ascii_case("gradient") {
            DEFAULT_COLORMAP
        } else {
            base
        };

        COLORMAPS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(base))
            .map(|(n, stops)| Self {
                name: n,
                stops,
                reversed,
            })
    }

    /// Look up a colormap, failing with the list of known names.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownColormap`] for unknown names.
    pub fn lookup(name: &str) -> Result<Self, RenderError> {
        Self::named(name).ok_or_else(|| RenderError::UnknownColormap {
            name: name.to_string(),
            available: available().collect::<Vec<_>>().join(", "),
        })
    }

    /// Canonical name of the underlying map.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True for `_r` maps.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Sample at `t` in [0, 1]. Out-of-range values clamp; NaN samples the
    /// midpoint.
    #[must_use]
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        let t = if self.reversed { 1.0 - t } else { t };

        let n = self.stops.len();
        if n == 1 {
            let [r, g, b] = self.stops[0];
            return Color::from_rgb8(r, g, b);
        }

        let pos = t * (n - 1) as f64;
        let segment = (pos.floor() as usize).min(n - 2);
        let local = pos - segment as f64;

        let start = self.stops[segment];
        let end = self.stops[segment + 1];
        let channel = |i: usize| {
            let a = f64::from(start[i]);
            let b = f64::from(end[i]);
            (a + (b - a) * local).round().clamp(0.0, 255.0) as u8
        };

        Color::from_rgb8(channel(0), channel(1), channel(2))
    }

    /// Color at `t = 0.5`.
    #[must_use]
    pub fn midpoint(&self) -> Color {
        self.sample(0.5)
    }

    /// Colors at `t = 0` and `t = 1`.
    #[must_use]
    pub fn endpoints(&self) -> (Color, Color) {
        (self.sample(0.0), self.sample(1.0))
    }
}

/// Names of the built-in colormaps.
pub fn available() -> impl Iterator<Item = &'static str> {
    COLORMAPS.iter().map(|(n, _)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(Colormap::named("VIRIDIS").map(|c| c.name()), Some("viridis"));
        assert_eq!(Colormap::named("rdylgn").map(|c| c.name()), Some("RdYlGn"));
    }

    #[test]
    fn test_gradient_alias() {
        assert_eq!(
            Colormap::named("gradient").map(|c| c.name()),
            Some(DEFAULT_COLORMAP)
        );
    }

    #[test]
    fn test_unknown_colormap_error() {
        let err = Colormap::lookup("nonexistent_colormap").unwrap_err();
        match err {
            RenderError::UnknownColormap { name, available } => {
                assert_eq!(name, "nonexistent_colormap");
                assert!(available.contains("viridis"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_endpoints_are_exact_stops() {
        let cmap = Colormap::named("viridis").unwrap();
        let (lo, hi) = cmap.endpoints();
        assert_eq!(lo, Color::from_rgb8(0x44, 0x01, 0x54));
        assert_eq!(hi, Color::from_rgb8(0xfd, 0xe7, 0x25));
    }

    #[test]
    fn test_midpoint_of_odd_stop_count_is_middle_stop() {
        let cmap = Colormap::named("viridis").unwrap();
        assert_eq!(cmap.midpoint(), Color::from_rgb8(0x21, 0x91, 0x8c));
    }

    #[test]
    fn test_reversed_map() {
        let fwd = Colormap::named("plasma").unwrap();
        let rev = Colormap::named("plasma_r").unwrap();
        assert!(rev.is_reversed());
        assert_eq!(fwd.sample(0.0), rev.sample(1.0));
        assert_eq!(fwd.sample(0.3), rev.sample(0.7));
    }

    #[test]
    fn test_sample_clamps_and_handles_nan() {
        let cmap = Colormap::named("Greys").unwrap();
        assert_eq!(cmap.sample(-1.0), cmap.sample(0.0));
        assert_eq!(cmap.sample(2.0), cmap.sample(1.0));
        assert_eq!(cmap.sample(f64::NAN), cmap.midpoint());
    }

    #[test]
    fn test_viridis_luminance_increases() {
        let cmap = Colormap::named("viridis").unwrap();
        let mut last = -1.0;
        for i in 0..=20 {
            let l = cmap.sample(f64::from(i) / 20.0).relative_luminance();
            assert!(l > last, "luminance not increasing at step {i}");
            last = l;
        }
    }

    #[test]
    fn test_all_builtin_maps_resolve() {
        for name in available() {
            let cmap = Colormap::lookup(name).unwrap();
            let _ = cmap.sample(0.25);
        }
        assert_eq!(available().count(), 13);
    }
}
