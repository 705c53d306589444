//! The `to_table` entry point: aggregate, derive, resolve, lay out.

use crate::aggregate::{aggregate, DirectiveSet};
use crate::error::RenderError;
use crate::format::Formatter;
use crate::gradient::index_gradient_directives;
use crate::layout::plan;
use crate::options::{FormatOption, RenderOptions};
use crate::render::StyledTable;
use crate::resolve::{alternating_row_directives, resolve};
use framestyle_core::{ExternalStyle, TableModel};

/// Width used when the terminal size is unknown.
pub const FALLBACK_WIDTH: usize = 80;

/// Current terminal width, or [`FALLBACK_WIDTH`] when it cannot be queried.
#[must_use]
pub fn terminal_width() -> usize {
    match crossterm::terminal::size() {
        Ok((0, _)) | Err(_) => FALLBACK_WIDTH,
        Ok((cols, _)) => usize::from(cols),
    }
}

fn formatter(model: &TableModel, options: &RenderOptions) -> Result<Formatter, RenderError> {
    let formatter = Formatter::new(&options.na_rep);
    match &options.format {
        None => Ok(formatter),
        Some(FormatOption::All(format)) => formatter.with_global(format),
        Some(FormatOption::PerColumn(formats)) => formatter.with_columns(model, formats),
    }
}

/// Every directive for `model`, in precedence-stamped order.
///
/// # Errors
///
/// Propagates style, colormap and label errors from each source.
pub fn directives(
    model: &TableModel,
    options: &RenderOptions,
    external: Option<&ExternalStyle>,
) -> Result<DirectiveSet, RenderError> {
    let mut set = aggregate(model, options, external)?;

    set.extend(alternating_row_directives(model.n_rows(), options)?);
    for request in options.gradient_requests() {
        set.extend(request.directives(model)?);
    }
    if let Some(cmap) = options.index_gradient_cmap() {
        set.extend(index_gradient_directives(model, cmap)?);
    }
    Ok(set)
}

/// Render `model` into a [`StyledTable`].
///
/// `external` is an optional pre-built style object; its entries rank
/// between the defaults and `options`. The table is laid out for
/// `options.max_width`, or for the terminal width when that is unset.
///
/// # Errors
///
/// Fails on malformed styles or formats, unknown colormaps, labels not in
/// the model, and tables that cannot fit the available width.
///
/// # Examples
///
/// ```
/// use framestyle_core::{TableModel, Value};
/// use framestyle_terminal::{to_table, RenderOptions};
///
/// let model = TableModel::from_columns(vec![
///     ("a".to_string(), vec![Value::from(1), Value::from(2)]),
/// ])
/// .unwrap();
/// let options = RenderOptions::default().with_bg("viridis").with_max_width(40);
/// let table = to_table(&model, &options, None).unwrap();
/// assert_eq!(table.row_count(), 2);
/// ```
pub fn to_table(
    model: &TableModel,
    options: &RenderOptions,
    external: Option<&ExternalStyle>,
) -> Result<StyledTable, RenderError> {
    let _span = tracing::debug_span!(
        "render_table",
        rows = model.n_rows(),
        columns = model.n_cols()
    )
    .entered();

    let formatter = formatter(model, options)?;
    let set = directives(model, options, external)?;
    let resolved = resolve(model, options, &set, &formatter);

    let width = options.max_width.unwrap_or_else(terminal_width);
    let layout = plan(&resolved, options, width)?;
    StyledTable::new(resolved, layout, options)
}

/// Method-call form of [`to_table`].
pub trait ToStyledTable {
    /// See [`to_table`].
    ///
    /// # Errors
    ///
    /// Same as [`to_table`].
    fn to_styled_table(&self, options: &RenderOptions) -> Result<StyledTable, RenderError>;
}

impl ToStyledTable for TableModel {
    fn to_styled_table(&self, options: &RenderOptions) -> Result<StyledTable, RenderError> {
        to_table(self, options, None)
    }
}
