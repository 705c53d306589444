//! Call-time render options.
//!
//! `RenderOptions` is plain data. It can be built with the `with_*`
//! methods or loaded from JSON/YAML; unknown keys are rejected.

use crate::error::RenderError;
use crate::gradient::{GradientAxis, GradientRequest, Subset};
use crate::layout::{BoxStyle, Padding};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const fn default_true() -> bool {
    true
}

fn default_na_rep() -> String {
    "NaN".to_string()
}

fn default_alternating_row_colors() -> (String, String) {
    (String::new(), "on grey15".to_string())
}

/// A single format for every column, or formats for named columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormatOption {
    All(String),
    PerColumn(BTreeMap<String, String>),
}

/// Subset given either as a column list or as `{columns, rows}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubsetOption {
    Columns(Vec<String>),
    Full(Subset),
}

impl From<SubsetOption> for Subset {
    fn from(option: SubsetOption) -> Self {
        match option {
            SubsetOption::Columns(columns) => Self::columns(columns),
            SubsetOption::Full(subset) => subset,
        }
    }
}

/// Keyword arguments of `bg`/`tg`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradientKwargs {
    /// Overrides the colormap named by `bg`/`tg`.
    pub cmap: Option<String>,
    pub axis: GradientAxis,
    pub subset: Option<SubsetOption>,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub low: f64,
    pub high: f64,
    #[serde(default = "default_true")]
    pub text_contrast: bool,
}

impl Default for GradientKwargs {
    fn default() -> Self {
        Self {
            cmap: None,
            axis: GradientAxis::default(),
            subset: None,
            vmin: None,
            vmax: None,
            low: 0.0,
            high: 0.0,
            text_contrast: true,
        }
    }
}

impl GradientKwargs {
    fn apply(&self, mut request: GradientRequest) -> GradientRequest {
        if let Some(cmap) = &self.cmap {
            request.cmap.clone_from(cmap);
        }
        request.axis = self.axis;
        request.subset = self.subset.clone().map(Subset::from);
        request.vmin = self.vmin;
        request.vmax = self.vmax;
        request.low = self.low;
        request.high = self.high;
        request
    }
}

/// Keyword arguments of `index_bg`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexGradientKwargs {
    /// Overrides the colormap named by `index_bg`.
    pub cmap: Option<String>,
}

/// Everything a caller can ask of one render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    pub title: Option<String>,
    pub caption: Option<String>,
    #[serde(default = "default_true")]
    pub show_index: bool,
    pub format: Option<FormatOption>,
    #[serde(default = "default_na_rep")]
    pub na_rep: String,

    /// Background gradient colormap.
    pub bg: Option<String>,
    pub bg_kwargs: GradientKwargs,
    /// Text gradient colormap.
    pub tg: Option<String>,
    pub tg_kwargs: GradientKwargs,
    /// Index gradient colormap.
    pub index_bg: Option<String>,
    pub index_bg_kwargs: IndexGradientKwargs,

    pub column_header_style: Option<String>,
    pub index_style: Option<String>,
    pub index_header_style: Option<String>,
    pub table_style: Option<String>,
    pub title_style: Option<String>,
    pub border_style: Option<String>,
    /// Styles for named columns, applied in declaration order.
    pub column_styles: IndexMap<String, String>,
    /// Styles for rows by label, applied in declaration order.
    pub row_styles: IndexMap<String, String>,

    pub alternating_rows: bool,
    #[serde(default = "default_alternating_row_colors")]
    pub alternating_row_colors: (String, String),

    #[serde(default = "default_true")]
    pub auto_optimize: bool,
    pub minimize_gaps: bool,
    pub box_style: Option<BoxStyle>,
    pub padding: Option<Padding>,
    pub show_edge: Option<bool>,
    pub expand: bool,
    /// Widths of rendered columns, index columns first.
    pub column_widths: Option<Vec<usize>>,
    /// Target width; the terminal width when unset.
    pub max_width: Option<usize>,
    #[serde(default = "default_true")]
    pub sparsify_index: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: None,
            caption: None,
            show_index: true,
            format: None,
            na_rep: default_na_rep(),
            bg: None,
            bg_kwargs: GradientKwargs::default(),
            tg: None,
            tg_kwargs: GradientKwargs::default(),
            index_bg: None,
            index_bg_kwargs: IndexGradientKwargs::default(),
            column_header_style: None,
            index_style: None,
            index_header_style: None,
            table_style: None,
            title_style: None,
            border_style: None,
            column_styles: IndexMap::new(),
            row_styles: IndexMap::new(),
            alternating_rows: false,
            alternating_row_colors: default_alternating_row_colors(),
            auto_optimize: true,
            minimize_gaps: false,
            box_style: None,
            padding: None,
            show_edge: None,
            expand: false,
            column_widths: None,
            max_width: None,
            sparsify_index: true,
        }
    }
}

impl RenderOptions {
    /// Load options from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Config`] on malformed input or unknown keys.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        serde_json::from_str(json).map_err(|e| RenderError::Config(e.to_string()))
    }

    /// Load options from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Config`] on malformed input or unknown keys.
    pub fn from_yaml(yaml: &str) -> Result<Self, RenderError> {
        serde_yaml_ng::from_str(yaml).map_err(|e| RenderError::Config(e.to_string()))
    }

    /// Gradient requests implied by `bg` and `tg`, background first.
    #[must_use]
    pub fn gradient_requests(&self) -> Vec<GradientRequest> {
        let mut requests = Vec::new();
        if let Some(cmap) = &self.bg {
            let request = self.bg_kwargs.apply(GradientRequest::background(cmap.as_str()));
            requests.push(request.with_text_contrast(self.bg_kwargs.text_contrast));
        }
        if let Some(cmap) = &self.tg {
            requests.push(self.tg_kwargs.apply(GradientRequest::text(cmap.as_str())));
        }
        requests
    }

    /// Colormap of the index gradient, if any.
    #[must_use]
    pub fn index_gradient_cmap(&self) -> Option<&str> {
        self.index_bg
            .as_deref()
            .map(|name| self.index_bg_kwargs.cmap.as_deref().unwrap_or(name))
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    #[must_use]
    pub fn with_show_index(mut self, show: bool) -> Self {
        self.show_index = show;
        self
    }

    /// Format every column with `format`.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(FormatOption::All(format.into()));
        self
    }

    /// Format one column. Replaces a global format.
    #[must_use]
    pub fn with_column_format(
        mut self,
        column: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        let mut map = match self.format.take() {
            Some(FormatOption::PerColumn(map)) => map,
            _ => BTreeMap::new(),
        };
        map.insert(column.into(), format.into());
        self.format = Some(FormatOption::PerColumn(map));
        self
    }

    #[must_use]
    pub fn with_na_rep(mut self, na_rep: impl Into<String>) -> Self {
        self.na_rep = na_rep.into();
        self
    }

    /// Background gradient with default keyword arguments.
    #[must_use]
    pub fn with_bg(mut self, cmap: impl Into<String>) -> Self {
        self.bg = Some(cmap.into());
        self
    }

    #[must_use]
    pub fn with_bg_kwargs(mut self, kwargs: GradientKwargs) -> Self {
        self.bg_kwargs = kwargs;
        self
    }

    /// Text gradient with default keyword arguments.
    #[must_use]
    pub fn with_tg(mut self, cmap: impl Into<String>) -> Self {
        self.tg = Some(cmap.into());
        self
    }

    #[must_use]
    pub fn with_tg_kwargs(mut self, kwargs: GradientKwargs) -> Self {
        self.tg_kwargs = kwargs;
        self
    }

    #[must_use]
    pub fn with_index_bg(mut self, cmap: impl Into<String>) -> Self {
        self.index_bg = Some(cmap.into());
        self
    }

    #[must_use]
    pub fn with_column_header_style(mut self, style: impl Into<String>) -> Self {
        self.column_header_style = Some(style.into());
        self
    }

    #[must_use]
    pub fn with_index_style(mut self, style: impl Into<String>) -> Self {
        self.index_style = Some(style.into());
        self
    }

    #[must_use]
    pub fn with_index_header_style(mut self, style: impl Into<String>) -> Self {
        self.index_header_style = Some(style.into());
        self
    }

    #[must_use]
    pub fn with_table_style(mut self, style: impl Into<String>) -> Self {
        self.table_style = Some(style.into());
        self
    }

    #[must_use]
    pub fn with_title_style(mut self, style: impl Into<String>) -> Self {
        self.title_style = Some(style.into());
        self
    }

    #[must_use]
    pub fn with_border_style(mut self, style: impl Into<String>) -> Self {
        self.border_style = Some(style.into());
        self
    }

    #[must_use]
    pub fn with_column_style(mut self, column: impl Into<String>, style: impl Into<String>) -> Self {
        self.column_styles.insert(column.into(), style.into());
        self
    }

    #[must_use]
    pub fn with_row_style(mut self, label: impl Into<String>, style: impl Into<String>) -> Self {
        self.row_styles.insert(label.into(), style.into());
        self
    }

    #[must_use]
    pub fn with_alternating_rows(mut self, enabled: bool) -> Self {
        self.alternating_rows = enabled;
        self
    }

    #[must_use]
    pub fn with_alternating_row_colors(
        mut self,
        even: impl Into<String>,
        odd: impl Into<String>,
    ) -> Self {
        self.alternating_row_colors = (even.into(), odd.into());
        self
    }

    #[must_use]
    pub fn with_auto_optimize(mut self, enabled: bool) -> Self {
        self.auto_optimize = enabled;
        self
    }

    #[must_use]
    pub fn with_minimize_gaps(mut self, enabled: bool) -> Self {
        self.minimize_gaps = enabled;
        self
    }

    #[must_use]
    pub fn with_box_style(mut self, style: BoxStyle) -> Self {
        self.box_style = Some(style);
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = Some(padding);
        self
    }

    #[must_use]
    pub fn with_show_edge(mut self, show: bool) -> Self {
        self.show_edge = Some(show);
        self
    }

    #[must_use]
    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    #[must_use]
    pub fn with_column_widths(mut self, widths: Vec<usize>) -> Self {
        self.column_widths = Some(widths);
        self
    }

    #[must_use]
    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_sparsify_index(mut self, enabled: bool) -> Self {
        self.sparsify_index = enabled;
        self
    }
}
