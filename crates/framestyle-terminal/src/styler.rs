//! Builder for external style objects.
//!
//! A [`Styler`] records styling operations against one model and computes
//! them only in [`Styler::finish`], which yields an [`ExternalStyle`] of
//! CSS entries. Gradients are precomputed into per-cell colors there, so
//! the result ranks as `ExternalStyler` when rendered.

use crate::error::RenderError;
use crate::gradient::{GradientAxis, GradientRequest};
use framestyle_core::{Color, ExternalEntry, ExternalStyle, Selector, TableModel, Target};

const DEFAULT_HIGHLIGHT: &str = "yellow";
const DEFAULT_NULL_HIGHLIGHT: &str = "red";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extreme {
    Max,
    Min,
}

#[derive(Debug, Clone)]
enum Op {
    Properties(Target, Vec<(String, String)>),
    Highlight {
        extreme: Extreme,
        axis: GradientAxis,
        color: String,
    },
    Null(String),
    Gradient(GradientRequest),
}

/// Lazily accumulated external styling for one [`TableModel`].
#[derive(Debug, Clone)]
pub struct Styler<'a> {
    model: &'a TableModel,
    ops: Vec<Op>,
}

impl<'a> Styler<'a> {
    #[must_use]
    pub fn new(model: &'a TableModel) -> Self {
        Self {
            model,
            ops: Vec::new(),
        }
    }

    /// Attach CSS properties to a target.
    #[must_use]
    pub fn set_properties<I, K, V>(mut self, target: Target, css: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let css = css.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.ops.push(Op::Properties(target, css));
        self
    }

    /// Shade the largest value of each partition. `color` defaults to yellow.
    #[must_use]
    pub fn highlight_max(mut self, axis: GradientAxis, color: Option<&str>) -> Self {
        self.ops.push(Op::Highlight {
            extreme: Extreme::Max,
            axis,
            color: color.unwrap_or(DEFAULT_HIGHLIGHT).to_string(),
        });
        self
    }

    /// Shade the smallest value of each partition. `color` defaults to yellow.
    #[must_use]
    pub fn highlight_min(mut self, axis: GradientAxis, color: Option<&str>) -> Self {
        self.ops.push(Op::Highlight {
            extreme: Extreme::Min,
            axis,
            color: color.unwrap_or(DEFAULT_HIGHLIGHT).to_string(),
        });
        self
    }

    /// Shade missing values. `color` defaults to red.
    #[must_use]
    pub fn highlight_null(mut self, color: Option<&str>) -> Self {
        self.ops
            .push(Op::Null(color.unwrap_or(DEFAULT_NULL_HIGHLIGHT).to_string()));
        self
    }

    /// Precompute a gradient into per-cell CSS colors.
    #[must_use]
    pub fn background_gradient(mut self, request: GradientRequest) -> Self {
        self.ops.push(Op::Gradient(request));
        self
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Compute every recorded operation, in order.
    ///
    /// # Errors
    ///
    /// Fails on malformed highlight colors, unknown colormaps and unknown
    /// gradient subset labels.
    pub fn finish(self) -> Result<ExternalStyle, RenderError> {
        let mut entries = Vec::new();
        for op in self.ops {
            match op {
                Op::Properties(target, css) => entries.push(ExternalEntry::new(target, css)),
                Op::Highlight {
                    extreme,
                    axis,
                    color,
                } => {
                    let hex = Color::parse(&color)?.to_hex();
                    entries.extend(
                        extreme_cells(self.model, extreme, axis)
                            .into_iter()
                            .map(|(row, column)| background(row, column, &hex)),
                    );
                }
                Op::Null(color) => {
                    let hex = Color::parse(&color)?.to_hex();
                    entries.extend(
                        null_cells(self.model)
                            .map(|(row, column)| background(row, column, &hex)),
                    );
                }
                Op::Gradient(request) => {
                    for directive in request.directives(self.model)? {
                        let Selector::Cell { row, column } = directive.selector else {
                            continue;
                        };
                        let mut css = Vec::with_capacity(2);
                        if let Some(bg) = directive.fragment.bg {
                            css.push(("background-color".to_string(), bg.to_hex()));
                        }
                        if let Some(fg) = directive.fragment.fg {
                            css.push(("color".to_string(), fg.to_hex()));
                        }
                        entries.push(ExternalEntry::new(Target::Position { row, column }, css));
                    }
                }
            }
        }

        tracing::debug!(entries = entries.len(), "external style built");
        Ok(ExternalStyle::new(entries))
    }
}

fn background(row: usize, column: usize, hex: &str) -> ExternalEntry {
    ExternalEntry::new(
        Target::Position { row, column },
        vec![("background-color".to_string(), hex.to_string())],
    )
}

fn null_cells(model: &TableModel) -> impl Iterator<Item = (usize, usize)> + '_ {
    (0..model.n_rows()).flat_map(move |row| {
        (0..model.n_cols()).filter_map(move |column| {
            model
                .value(row, column)
                .filter(|v| v.is_missing())
                .map(|_| (row, column))
        })
    })
}

/// Cells holding the extreme value of each partition; ties all qualify.
fn extreme_cells(model: &TableModel, extreme: Extreme, axis: GradientAxis) -> Vec<(usize, usize)> {
    let numeric: Vec<usize> = (0..model.n_cols())
        .filter(|&c| model.is_numeric_column(c))
        .collect();
    let rows = 0..model.n_rows();

    let partitions: Vec<Vec<(usize, usize)>> = match axis {
        GradientAxis::PerColumn => numeric
            .iter()
            .map(|&c| rows.clone().map(|r| (r, c)).collect())
            .collect(),
        GradientAxis::PerRow => rows
            .map(|r| numeric.iter().map(|&c| (r, c)).collect())
            .collect(),
        GradientAxis::WholeTable => vec![rows
            .flat_map(|r| numeric.iter().map(move |&c| (r, c)))
            .collect()],
    };

    let mut out = Vec::new();
    for cells in partitions {
        let values: Vec<((usize, usize), f64)> = cells
            .into_iter()
            .filter_map(|(r, c)| model.value(r, c).and_then(|v| v.as_f64()).map(|v| ((r, c), v)))
            .collect();
        let best = values.iter().map(|(_, v)| *v).reduce(|a, b| match extreme {
            Extreme::Max => a.max(b),
            Extreme::Min => a.min(b),
        });
        if let Some(best) = best {
            out.extend(values.iter().filter(|(_, v)| *v == best).map(|(cell, _)| *cell));
        }
    }
    out
}
