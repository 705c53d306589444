//! Styled terminal tables for framestyle.
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_lines)]
//!
//! Turns a [`TableModel`](framestyle_core::TableModel) into a [`StyledTable`]
//! in one stateless pass:
//!
//! 1. **Aggregate** style directives from built-in defaults, an optional
//!    [`ExternalStyle`](framestyle_core::ExternalStyle) and call-time
//!    [`RenderOptions`].
//! 2. **Derive** alternating-row shading and colormap gradients.
//! 3. **Resolve** one style per cell, attribute by attribute, by source rank
//!    then declaration order; format cell text.
//! 4. **Lay out** column widths for the available width.
//! 5. **Render** lines through `crossterm` in the detected [`ColorMode`].
//!
//! # Example
//!
//! ```
//! use framestyle_core::{TableModel, Value};
//! use framestyle_terminal::{to_table, ColorMode, GradientAxis, GradientKwargs, RenderOptions};
//!
//! let model = TableModel::from_columns(vec![
//!     ("cpu".to_string(), vec![Value::from(12.5), Value::from(80.0)]),
//!     ("host".to_string(), vec![Value::from("a"), Value::from("b")]),
//! ])
//! .unwrap();
//!
//! let options = RenderOptions::default()
//!     .with_title("Load")
//!     .with_bg("coolwarm")
//!     .with_bg_kwargs(GradientKwargs {
//!         axis: GradientAxis::WholeTable,
//!         ..GradientKwargs::default()
//!     })
//!     .with_max_width(60);
//!
//! let table = to_table(&model, &options, None).unwrap();
//! for line in table.lines(ColorMode::detect()) {
//!     println!("{line}");
//! }
//! ```

pub mod aggregate;
mod color;
pub mod colormap;
mod error;
pub mod format;
mod gradient;
pub mod layout;
mod options;
mod pipeline;
mod render;
pub mod resolve;
mod styler;
pub mod text;

pub use color::ColorMode;
pub use colormap::{Colormap, DEFAULT_COLORMAP};
pub use error::{LayoutError, RenderError};
pub use format::{CellFormat, Formatter};
pub use gradient::{
    contrast_text, index_gradient_directives, GradientAxis, GradientRequest, GradientTarget,
    Subset, TEXT_CONTRAST_THRESHOLD,
};
pub use layout::{BoxStyle, LayoutPlan, Padding, MIN_COLUMN_WIDTH};
pub use options::{FormatOption, GradientKwargs, IndexGradientKwargs, RenderOptions, SubsetOption};
pub use pipeline::{directives, terminal_width, to_table, ToStyledTable, FALLBACK_WIDTH};
pub use render::{Rendered, StyledTable};
pub use resolve::{CellStyle, ResolvedCell, ResolvedTable};
pub use styler::Styler;
