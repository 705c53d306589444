//! Gradient engine: numeric cell values to colormap colors.

use crate::colormap::{Colormap, DEFAULT_COLORMAP};
use crate::error::RenderError;
use framestyle_core::{Color, Selector, SourceRank, StyleDirective, StyleFragment, TableModel};
use serde::{Deserialize, Serialize};

/// Backgrounds darker than this relative luminance get white text.
pub const TEXT_CONTRAST_THRESHOLD: f32 = 0.408;

/// Readable text color for a background: white on dark, black on light.
#[must_use]
pub fn contrast_text(background: Color) -> Color {
    if background.relative_luminance() < TEXT_CONTRAST_THRESHOLD {
        Color::WHITE
    } else {
        Color::BLACK
    }
}

/// How values are partitioned before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "AxisRepr", into = "String")]
pub enum GradientAxis {
    /// Each column is normalized on its own.
    #[default]
    PerColumn,
    /// Each row is normalized on its own.
    PerRow,
    /// The whole selected region shares one range.
    WholeTable,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AxisRepr {
    Number(i64),
    Name(String),
    Null,
}

impl TryFrom<AxisRepr> for GradientAxis {
    type Error = String;

    fn try_from(repr: AxisRepr) -> Result<Self, Self::Error> {
        match repr {
            AxisRepr::Number(0) => Ok(Self::PerColumn),
            AxisRepr::Number(1) => Ok(Self::PerRow),
            AxisRepr::Number(n) => Err(format!("invalid axis {n}, expected 0, 1 or null")),
            AxisRepr::Null => Ok(Self::WholeTable),
            AxisRepr::Name(name) => name.parse(),
        }
    }
}

impl std::str::FromStr for GradientAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-column" | "columns" | "column" | "index" | "0" => Ok(Self::PerColumn),
            "per-row" | "rows" | "row" | "1" => Ok(Self::PerRow),
            "whole-table" | "table" | "none" => Ok(Self::WholeTable),
            other => Err(format!("invalid axis '{other}'")),
        }
    }
}

impl From<GradientAxis> for String {
    fn from(axis: GradientAxis) -> Self {
        match axis {
            GradientAxis::PerColumn => "per-column",
            GradientAxis::PerRow => "per-row",
            GradientAxis::WholeTable => "whole-table",
        }
        .to_string()
    }
}

/// Which attribute a gradient colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientTarget {
    /// Cell background, optionally with contrast text.
    #[default]
    Background,
    /// Cell foreground.
    Text,
}

/// Columns and row labels a gradient is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Subset {
    /// Column identifiers; `None` means every column.
    pub columns: Option<Vec<String>>,
    /// Row labels; `None` means every row.
    pub rows: Option<Vec<String>>,
}

impl Subset {
    /// Restrict to the given columns.
    #[must_use]
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: Some(columns.into_iter().map(Into::into).collect()),
            rows: None,
        }
    }

    /// Additionally restrict to the given row labels.
    #[must_use]
    pub fn with_rows<I, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows = Some(rows.into_iter().map(Into::into).collect());
        self
    }
}

/// One gradient to apply. Built per call and consumed once.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientRequest {
    pub cmap: String,
    pub axis: GradientAxis,
    pub subset: Option<Subset>,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    /// Fraction of the observed range added below the minimum.
    pub low: f64,
    /// Fraction of the observed range added above the maximum.
    pub high: f64,
    pub text_contrast: bool,
    pub target: GradientTarget,
}

impl Default for GradientRequest {
    fn default() -> Self {
        Self::background(DEFAULT_COLORMAP)
    }
}

impl GradientRequest {
    /// Background gradient with contrast text.
    #[must_use]
    pub fn background(cmap: impl Into<String>) -> Self {
        Self {
            cmap: cmap.into(),
            axis: GradientAxis::PerColumn,
            subset: None,
            vmin: None,
            vmax: None,
            low: 0.0,
            high: 0.0,
            text_contrast: true,
            target: GradientTarget::Background,
        }
    }

    /// Foreground gradient.
    #[must_use]
    pub fn text(cmap: impl Into<String>) -> Self {
        Self {
            text_contrast: false,
            target: GradientTarget::Text,
            ..Self::background(cmap)
        }
    }

    #[must_use]
    pub fn with_axis(mut self, axis: GradientAxis) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn with_subset(mut self, subset: Subset) -> Self {
        self.subset = Some(subset);
        self
    }

    /// Fixed normalization bounds. Values outside clamp.
    #[must_use]
    pub fn with_bounds(mut self, vmin: f64, vmax: f64) -> Self {
        self.vmin = Some(vmin);
        self.vmax = Some(vmax);
        self
    }

    #[must_use]
    pub fn with_range_extension(mut self, low: f64, high: f64) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    #[must_use]
    pub fn with_text_contrast(mut self, enabled: bool) -> Self {
        self.text_contrast = enabled;
        self
    }

    /// Compute one `Derived` directive per numeric, non-missing cell in scope.
    ///
    /// # Errors
    ///
    /// Fails on an unknown colormap or subset labels absent from `model`.
    pub fn directives(&self, model: &TableModel) -> Result<Vec<StyleDirective>, RenderError> {
        let cmap = Colormap::lookup(&self.cmap)?;
        let (rows, columns) = self.scope(model)?;

        let groups: Vec<Vec<(usize, usize)>> = match self.axis {
            GradientAxis::PerColumn => columns
                .iter()
                .map(|&c| rows.iter().map(|&r| (r, c)).collect())
                .collect(),
            GradientAxis::PerRow => rows
                .iter()
                .map(|&r| columns.iter().map(|&c| (r, c)).collect())
                .collect(),
            GradientAxis::WholeTable => vec![rows
                .iter()
                .flat_map(|&r| columns.iter().map(move |&c| (r, c)))
                .collect()],
        };

        let mut out = Vec::new();
        for group in groups {
            let cells: Vec<(usize, usize, f64)> = group
                .into_iter()
                .filter_map(|(r, c)| {
                    let value = model.value(r, c)?;
                    if value.is_missing() {
                        return None;
                    }
                    value.as_f64().map(|v| (r, c, v))
                })
                .collect();
            if cells.is_empty() {
                continue;
            }

            let norm = self.normalizer(cells.iter().map(|&(_, _, v)| v));
            for (row, column, value) in cells {
                let color = cmap.sample(norm.apply(value));
                out.push(StyleDirective::new(
                    Selector::Cell { row, column },
                    self.fragment(color),
                    SourceRank::Derived,
                ));
            }
        }

        tracing::trace!(cmap = cmap.name(), axis = ?self.axis, directives = out.len(), "gradient computed");
        Ok(out)
    }

    /// Style fragment for one computed color.
    pub(crate) fn fragment(&self, color: Color) -> StyleFragment {
        match self.target {
            GradientTarget::Background if self.text_contrast => StyleFragment::new()
                .with_bg(color)
                .with_fg(contrast_text(color)),
            GradientTarget::Background => StyleFragment::new().with_bg(color),
            GradientTarget::Text => StyleFragment::new().with_fg(color),
        }
    }

    /// Row and numeric column positions selected by the subset.
    fn scope(&self, model: &TableModel) -> Result<(Vec<usize>, Vec<usize>), RenderError> {
        let subset = self.subset.as_ref();

        let columns: Vec<usize> = match subset.and_then(|s| s.columns.as_ref()) {
            Some(names) => names
                .iter()
                .map(|name| {
                    model
                        .column_position(name)
                        .ok_or_else(|| RenderError::UnknownColumn(name.clone()))
                })
                .collect::<Result<_, _>>()?,
            None => (0..model.n_cols()).collect(),
        };
        let columns = columns
            .into_iter()
            .filter(|&c| model.is_numeric_column(c))
            .collect();

        let rows = match subset.and_then(|s| s.rows.as_ref()) {
            Some(labels) => {
                let mut rows = Vec::new();
                for label in labels {
                    let found = model.index().positions_of(label);
                    if found.is_empty() {
                        return Err(RenderError::UnknownRow(label.clone()));
                    }
                    rows.extend(found);
                }
                rows.sort_unstable();
                rows.dedup();
                rows
            }
            None => (0..model.n_rows()).collect(),
        };

        Ok((rows, columns))
    }

    fn normalizer(&self, values: impl Iterator<Item = f64>) -> Normalizer {
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for v in values.filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        let lo = self.vmin.unwrap_or(lo);
        let hi = self.vmax.unwrap_or(hi);
        let range = hi - lo;
        Normalizer {
            lo: lo - self.low * range,
            hi: hi + self.high * range,
        }
    }
}

/// Maps a value into [0, 1] for one partition.
#[derive(Debug, Clone, Copy)]
struct Normalizer {
    lo: f64,
    hi: f64,
}

impl Normalizer {
    fn apply(self, value: f64) -> f64 {
        let span = self.hi - self.lo;
        if !span.is_finite() || span <= 0.0 {
            // flat or degenerate range
            return 0.5;
        }
        ((value - self.lo) / span).clamp(0.0, 1.0)
    }
}

/// Color index cells by row position with contrast text.
///
/// # Errors
///
/// Fails on an unknown colormap.
pub fn index_gradient_directives(
    model: &TableModel,
    cmap: &str,
) -> Result<Vec<StyleDirective>, RenderError> {
    let cmap = Colormap::lookup(cmap)?;
    let n = model.n_rows();
    Ok((0..n)
        .map(|row| {
            let t = if n > 1 {
                row as f64 / (n - 1) as f64
            } else {
                0.5
            };
            let bg = cmap.sample(t);
            StyleDirective::new(
                Selector::Index {
                    row: Some(row),
                    level: None,
                },
                StyleFragment::new().with_bg(bg).with_fg(contrast_text(bg)),
                SourceRank::Derived,
            )
        })
        .collect())
}
