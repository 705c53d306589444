//! Style directives and the external style object.

use crate::color::Color;
use crate::error::StyleError;
use crate::style::{Justify, StyleFragment};
use serde::{Deserialize, Serialize};

/// Precedence tier of a directive. Higher ranks win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceRank {
    /// Built-in defaults.
    Default,
    /// Gradients and alternating-row shading.
    Derived,
    /// A pre-built external style object.
    ExternalStyler,
    /// Call-time options.
    Explicit,
}

/// Which rendered cell a directive applies to. Positions are zero-based
/// render positions within the current table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Every data cell.
    All,
    /// Every data cell of a column.
    Column(usize),
    /// Every cell of a rendered row: its data cells and its index cells.
    Row(usize),
    /// One data cell.
    Cell { row: usize, column: usize },
    /// Column header cells; `None` selects all of them.
    Header(Option<usize>),
    /// Index cells, optionally restricted to one row and/or one level.
    Index {
        row: Option<usize>,
        level: Option<usize>,
    },
    /// Index header cells; `None` selects every level.
    IndexHeader(Option<usize>),
}

/// A concrete cell of the rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellRef {
    /// Data cell.
    Data { row: usize, column: usize },
    /// Column header cell.
    Header { column: usize },
    /// Index cell.
    Index { row: usize, level: usize },
    /// Index header cell.
    IndexHeader { level: usize },
}

impl Selector {
    /// True when this selector targets `cell`.
    #[must_use]
    pub fn matches(&self, cell: CellRef) -> bool {
        match (*self, cell) {
            (Self::All, CellRef::Data { .. }) => true,
            (Self::Column(c), CellRef::Data { column, .. }) => c == column,
            (Self::Row(r), CellRef::Data { row, .. } | CellRef::Index { row, .. }) => r == row,
            (Self::Cell { row: r, column: c }, CellRef::Data { row, column }) => {
                r == row && c == column
            }
            (Self::Header(c), CellRef::Header { column }) => c.map_or(true, |c| c == column),
            (Self::Index { row: r, level: l }, CellRef::Index { row, level }) => {
                r.map_or(true, |r| r == row) && l.map_or(true, |l| l == level)
            }
            (Self::IndexHeader(l), CellRef::IndexHeader { level }) => {
                l.map_or(true, |l| l == level)
            }
            _ => false,
        }
    }
}

/// A selector, a fragment, a source rank and a declaration sequence number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleDirective {
    /// Target cells.
    pub selector: Selector,
    /// Attributes to apply.
    pub fragment: StyleFragment,
    /// Precedence tier.
    pub rank: SourceRank,
    /// Declaration order; later declarations win within a rank.
    pub seq: u64,
}

impl StyleDirective {
    /// Create a directive with sequence number 0.
    #[must_use]
    pub const fn new(selector: Selector, fragment: StyleFragment, rank: SourceRank) -> Self {
        Self {
            selector,
            fragment,
            rank,
            seq: 0,
        }
    }

    /// Ordering key: rank first, then declaration order.
    #[must_use]
    pub const fn precedence(&self) -> (SourceRank, u64) {
        (self.rank, self.seq)
    }
}

/// Label-addressed target of an external style entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Every data cell.
    All,
    /// A column by identifier.
    Column(String),
    /// Rows by label.
    Row(String),
    /// A cell by row label and column identifier.
    Cell { row: String, column: String },
    /// A cell by position.
    Position { row: usize, column: usize },
    /// A column header by identifier.
    Header(String),
    /// Index cells of rows by label.
    Index(String),
}

/// A recognized CSS-like property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssProperty {
    /// `background-color`
    BackgroundColor(Color),
    /// `color`
    Color(Color),
    /// `text-align`
    TextAlign(Justify),
}

impl CssProperty {
    /// Parse one `key: value` pair. Unrecognized keys yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError`] when a recognized key has a malformed value.
    pub fn parse(key: &str, value: &str) -> Result<Option<Self>, StyleError> {
        let value = value.trim().trim_end_matches(';').trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "background-color" | "background" => {
                Ok(Some(Self::BackgroundColor(Color::parse(value)?)))
            }
            "color" => Ok(Some(Self::Color(Color::parse(value)?))),
            "text-align" => Ok(Some(Self::TextAlign(value.parse()?))),
            _ => Ok(None),
        }
    }

    fn apply(self, fragment: StyleFragment) -> StyleFragment {
        match self {
            Self::BackgroundColor(c) => fragment.with_bg(c),
            Self::Color(c) => fragment.with_fg(c),
            Self::TextAlign(j) => fragment.with_justify(j),
        }
    }
}

/// One entry of an external style object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalEntry {
    /// Target cells by label.
    pub target: Target,
    /// CSS property pairs in declaration order.
    pub properties: Vec<(String, String)>,
}

impl ExternalEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(target: Target, properties: Vec<(String, String)>) -> Self {
        Self { target, properties }
    }

    /// Fold the properties into a fragment; later properties override
    /// earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError`] for malformed values of recognized keys.
    pub fn fragment(&self) -> Result<StyleFragment, StyleError> {
        self.properties
            .iter()
            .try_fold(StyleFragment::new(), |fragment, (key, value)| {
                Ok(match CssProperty::parse(key, value)? {
                    Some(prop) => prop.apply(fragment),
                    None => fragment,
                })
            })
    }
}

/// An immutable, ordered sequence of external style entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalStyle {
    entries: Vec<ExternalEntry>,
}

impl ExternalStyle {
    /// Wrap entries in declaration order.
    #[must_use]
    pub fn new(entries: Vec<ExternalEntry>) -> Self {
        Self { entries }
    }

    /// Entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[ExternalEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ExternalEntry> for ExternalStyle {
    fn from_iter<I: IntoIterator<Item = ExternalEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order() {
        assert!(SourceRank::Explicit > SourceRank::ExternalStyler);
        assert!(SourceRank::ExternalStyler > SourceRank::Derived);
        assert!(SourceRank::Derived > SourceRank::Default);
    }

    #[test]
    fn test_row_selector_covers_index() {
        let row = Selector::Row(1);
        assert!(row.matches(CellRef::Data { row: 1, column: 0 }));
        assert!(row.matches(CellRef::Index { row: 1, level: 0 }));
        assert!(!row.matches(CellRef::Data { row: 0, column: 0 }));
        assert!(!row.matches(CellRef::Header { column: 0 }));
    }

    #[test]
    fn test_all_selector_is_data_only() {
        assert!(Selector::All.matches(CellRef::Data { row: 5, column: 5 }));
        assert!(!Selector::All.matches(CellRef::Header { column: 0 }));
        assert!(!Selector::All.matches(CellRef::Index { row: 0, level: 0 }));
    }

    #[test]
    fn test_index_selector_levels() {
        let sel = Selector::Index {
            row: None,
            level: Some(1),
        };
        assert!(sel.matches(CellRef::Index { row: 3, level: 1 }));
        assert!(!sel.matches(CellRef::Index { row: 3, level: 0 }));
    }

    #[test]
    fn test_header_selectors() {
        assert!(Selector::Header(None).matches(CellRef::Header { column: 2 }));
        assert!(!Selector::Header(Some(1)).matches(CellRef::Header { column: 2 }));
        assert!(Selector::IndexHeader(None).matches(CellRef::IndexHeader { level: 1 }));
    }

    #[test]
    fn test_css_property_parse() {
        assert!(matches!(
            CssProperty::parse("background-color", "#ff0000;").unwrap(),
            Some(CssProperty::BackgroundColor(_))
        ));
        assert_eq!(
            CssProperty::parse("text-align", "center").unwrap(),
            Some(CssProperty::TextAlign(Justify::Center))
        );
        assert_eq!(CssProperty::parse("font-weight", "bold").unwrap(), None);
    }

    #[test]
    fn test_css_property_malformed_color() {
        assert!(CssProperty::parse("color", "not-a-color").is_err());
    }

    #[test]
    fn test_entry_fragment_later_wins() {
        let entry = ExternalEntry::new(
            Target::All,
            vec![
                ("color".into(), "red".into()),
                ("border".into(), "1px".into()),
                ("color".into(), "blue".into()),
            ],
        );
        let f = entry.fragment().unwrap();
        assert_eq!(f.fg.map(|c| c.to_rgb8()), Some((0, 0, 255)));
        assert!(f.bg.is_none());
    }

    #[test]
    fn test_external_style_from_json() {
        let json = r#"[
            {"target": {"column": "A"}, "properties": [["background-color", "yellow"]]},
            {"target": "all", "properties": [["text-align", "right"]]}
        ]"#;
        let style: ExternalStyle = serde_json::from_str(json).unwrap();
        assert_eq!(style.len(), 2);
        assert_eq!(style.entries()[0].target, Target::Column("A".into()));
        assert_eq!(style.entries()[1].target, Target::All);
    }
}
