//! Layout optimizer: column widths, padding, box style and padding collapse.

use crate::error::LayoutError;
use crate::options::RenderOptions;
use crate::resolve::ResolvedTable;
use serde::{Deserialize, Serialize};

/// Columns are never shrunk below this width (or their natural width, when
/// smaller).
pub const MIN_COLUMN_WIDTH: usize = 3;

/// Glyphs for one box style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxChars {
    pub top_left: char,
    pub top: char,
    pub top_mid: char,
    pub top_right: char,
    pub edge: char,
    pub divider: char,
    pub head_left: char,
    pub head: char,
    pub head_mid: char,
    pub head_right: char,
    pub bottom_left: char,
    pub bottom: char,
    pub bottom_mid: char,
    pub bottom_right: char,
}

/// Table border style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxStyle {
    /// Rounded corners: ╭─┬─╮
    #[default]
    Rounded,
    /// Single line: ┌─┬─┐
    #[serde(alias = "square")]
    Single,
    /// Double line: ╔═╦═╗
    Double,
    /// Heavy: ┏━┳━┓
    Heavy,
    /// ASCII only: +-+-+
    Ascii,
    /// Inner dividers and a header rule only.
    Minimal,
    /// No visible border.
    None,
}

impl BoxStyle {
    /// Glyph set for this style.
    #[must_use]
    pub fn chars(&self) -> BoxChars {
        let g = |s: [char; 14]| BoxChars {
            top_left: s[0],
            top: s[1],
            top_mid: s[2],
            top_right: s[3],
            edge: s[4],
            divider: s[5],
            head_left: s[6],
            head: s[7],
            head_mid: s[8],
            head_right: s[9],
            bottom_left: s[10],
            bottom: s[11],
            bottom_mid: s[12],
            bottom_right: s[13],
        };
        match self {
            Self::Rounded => g([
                '╭', '─', '┬', '╮', '│', '│', '├', '─', '┼', '┤', '╰', '─', '┴', '╯',
            ]),
            Self::Single => g([
                '┌', '─', '┬', '┐', '│', '│', '├', '─', '┼', '┤', '└', '─', '┴', '┘',
            ]),
            Self::Double => g([
                '╔', '═', '╦', '╗', '║', '║', '╠', '═', '╬', '╣', '╚', '═', '╩', '╝',
            ]),
            Self::Heavy => g([
                '┏', '━', '┳', '┓', '┃', '┃', '┣', '━', '╋', '┫', '┗', '━', '┻', '┛',
            ]),
            Self::Ascii => g([
                '+', '-', '+', '+', '|', '|', '+', '-', '+', '+', '+', '-', '+', '+',
            ]),
            Self::Minimal => g([
                ' ', ' ', '╷', ' ', ' ', '│', '╶', '─', '┼', '╴', ' ', ' ', '╵', ' ',
            ]),
            Self::None => g([' '; 14]),
        }
    }
}

impl std::str::FromStr for BoxStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rounded" => Ok(Self::Rounded),
            "single" | "square" => Ok(Self::Single),
            "double" => Ok(Self::Double),
            "heavy" => Ok(Self::Heavy),
            "ascii" => Ok(Self::Ascii),
            "minimal" => Ok(Self::Minimal),
            "none" => Ok(Self::None),
            other => Err(format!("unknown box style '{other}'")),
        }
    }
}

/// Cell padding in lines (vertical) and columns (horizontal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Padding {
    pub vertical: usize,
    pub horizontal: usize,
}

impl Padding {
    #[must_use]
    pub const fn new(vertical: usize, horizontal: usize) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl From<(usize, usize)> for Padding {
    fn from((vertical, horizontal): (usize, usize)) -> Self {
        Self::new(vertical, horizontal)
    }
}

impl From<Padding> for (usize, usize) {
    fn from(p: Padding) -> Self {
        (p.vertical, p.horizontal)
    }
}

/// Layout decisions for one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    /// Width of each rendered column, index columns first.
    pub widths: Vec<usize>,
    pub padding: Padding,
    pub box_style: BoxStyle,
    pub show_edge: bool,
    /// One flag per boundary between adjacent columns.
    pub collapse: Vec<bool>,
}

impl LayoutPlan {
    /// Rendered width in terminal cells.
    #[must_use]
    pub fn total_width(&self) -> usize {
        total_width(&self.widths, self.padding.horizontal, self.show_edge)
    }
}

/// `sum(w) + n*2h + (n-1) + 2*edge`.
fn total_width(widths: &[usize], horizontal: usize, show_edge: bool) -> usize {
    let n = widths.len();
    let content: usize = widths.iter().sum();
    content + n * 2 * horizontal + n.saturating_sub(1) + if show_edge { 2 } else { 0 }
}

/// Natural width of every rendered column: header versus widest cell.
#[must_use]
pub fn natural_widths(table: &ResolvedTable) -> Vec<usize> {
    let mut widths: Vec<usize> = table.header().iter().map(|c| c.width()).collect();
    for row in table.rows() {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }
    widths.into_iter().map(|w| w.max(1)).collect()
}

/// Plan the layout of `table` for a target width.
///
/// # Errors
///
/// Returns [`LayoutError::CannotFit`] when auto-optimization cannot bring
/// the table within `max_width`.
pub fn plan(
    table: &ResolvedTable,
    options: &RenderOptions,
    max_width: usize,
) -> Result<LayoutPlan, LayoutError> {
    let natural = natural_widths(table);

    let mut plan = if options.auto_optimize {
        auto_plan(&natural, options, max_width)?
    } else {
        manual_plan(&natural, options, max_width)
    };
    plan.collapse = collapse_flags(table);

    tracing::debug!(
        columns = plan.widths.len(),
        width = plan.total_width(),
        available = max_width,
        auto = options.auto_optimize,
        "layout planned"
    );
    Ok(plan)
}

fn auto_plan(
    natural: &[usize],
    options: &RenderOptions,
    max_width: usize,
) -> Result<LayoutPlan, LayoutError> {
    if options.box_style.is_some()
        || options.padding.is_some()
        || options.show_edge.is_some()
        || options.column_widths.is_some()
        || options.expand
    {
        tracing::debug!("manual layout options ignored while auto_optimize is on");
    }

    let (box_style, show_edge, mut padding) = if options.minimize_gaps {
        (BoxStyle::Minimal, false, Padding::new(0, 0))
    } else {
        (BoxStyle::Rounded, true, Padding::new(0, 1))
    };

    let mut widths = natural.to_vec();

    if total_width(&widths, padding.horizontal, show_edge) > max_width {
        // Padding goes before any column is shrunk.
        padding.horizontal = 0;

        if total_width(&widths, 0, show_edge) > max_width {
            let floors: Vec<usize> = natural.iter().map(|&w| w.min(MIN_COLUMN_WIDTH)).collect();
            let required = total_width(&floors, 0, show_edge);
            if required > max_width {
                return Err(LayoutError::CannotFit {
                    required,
                    available: max_width,
                });
            }

            while total_width(&widths, 0, show_edge) > max_width {
                // Widest shrinkable column; ties go to the leftmost.
                let Some(i) = (0..widths.len())
                    .filter(|&i| widths[i] > floors[i])
                    .max_by(|&a, &b| widths[a].cmp(&widths[b]).then(b.cmp(&a)))
                else {
                    break;
                };
                widths[i] -= 1;
            }
            tracing::warn!(
                available = max_width,
                natural = total_width(natural, 0, show_edge),
                "columns shrunk to fit terminal width"
            );
        }
    }

    Ok(LayoutPlan {
        widths,
        padding,
        box_style,
        show_edge,
        collapse: Vec::new(),
    })
}

fn manual_plan(natural: &[usize], options: &RenderOptions, max_width: usize) -> LayoutPlan {
    let padding = options.padding.unwrap_or_default();
    let show_edge = options.show_edge.unwrap_or(true);

    let mut widths = natural.to_vec();
    if let Some(explicit) = &options.column_widths {
        for (w, &e) in widths.iter_mut().zip(explicit) {
            *w = e.max(1);
        }
    }

    if options.expand {
        let total = total_width(&widths, padding.horizontal, show_edge);
        if total < max_width {
            widths = expand_by_weights(&widths, max_width - total);
        }
    }

    LayoutPlan {
        widths,
        padding,
        box_style: options.box_style.unwrap_or_default(),
        show_edge,
        collapse: Vec::new(),
    }
}

/// Distribute `extra` cells proportionally to the current widths.
fn expand_by_weights(widths: &[usize], extra: usize) -> Vec<usize> {
    let total_weight: usize = widths.iter().map(|&w| w.max(1)).sum();
    if total_weight == 0 {
        return widths.to_vec();
    }

    let mut sizes = widths.to_vec();
    let mut distributed = 0;
    let last = sizes.len().saturating_sub(1);
    for (i, size) in sizes.iter_mut().enumerate() {
        let share = if i == last {
            extra - distributed
        } else {
            extra * (*size).max(1) / total_weight
        };
        *size += share;
        distributed += share;
    }
    sizes
}

/// A boundary collapses when every data row has the same present background
/// on both sides of it.
fn collapse_flags(table: &ResolvedTable) -> Vec<bool> {
    let n = table.width();
    (0..n.saturating_sub(1))
        .map(|k| {
            !table.rows().is_empty()
                && table.rows().iter().all(|row| {
                    let left = row.get(k).and_then(|c| c.style.bg);
                    let right = row.get(k + 1).and_then(|c| c.style.bg);
                    matches!((left, right), (Some(a), Some(b)) if a == b)
                })
        })
        .collect()
}
