//! Style resolution: one final style and text per rendered cell.
//!
//! Each attribute (foreground, background, justification, emphasis) is
//! taken independently from the highest-precedence directive that sets it.

use crate::aggregate::DirectiveSet;
use crate::error::RenderError;
use crate::format::Formatter;
use crate::options::RenderOptions;
use crate::text::single_line;
use compact_str::CompactString;
use framestyle_core::{
    CellRef, Color, Justify, Modifiers, Selector, SourceRank, StyleDirective, StyleFragment,
    TableModel,
};
use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

/// Final visual attributes of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellStyle {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub justify: Justify,
    pub modifiers: Modifiers,
}

impl CellStyle {
    /// True when nothing needs to be emitted for this style.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.modifiers.is_empty()
    }
}

/// Formatted text plus its resolved style.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCell {
    pub text: CompactString,
    pub style: CellStyle,
}

impl ResolvedCell {
    /// Control characters in `text` are flattened so the cell stays on one line.
    #[must_use]
    pub fn new(text: impl Into<CompactString>, style: CellStyle) -> Self {
        let mut text = text.into();
        if text.chars().any(char::is_control) {
            text = CompactString::from(single_line(&text).into_owned());
        }
        Self { text, style }
    }

    /// Display width of the text in terminal cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.text.width()
    }
}

/// Every rendered cell of a table, index columns first.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
    header: Vec<ResolvedCell>,
    rows: Vec<Vec<ResolvedCell>>,
    index_levels: usize,
}

impl ResolvedTable {
    #[must_use]
    pub fn new(header: Vec<ResolvedCell>, rows: Vec<Vec<ResolvedCell>>, index_levels: usize) -> Self {
        Self {
            header,
            rows,
            index_levels,
        }
    }

    /// Header cells: index headers, then column headers.
    #[must_use]
    pub fn header(&self) -> &[ResolvedCell] {
        &self.header
    }

    /// Full rendered rows: index cells, then data cells.
    #[must_use]
    pub fn rows(&self) -> &[Vec<ResolvedCell>] {
        &self.rows
    }

    /// Number of index columns rendered (0 when the index is hidden).
    #[must_use]
    pub fn index_levels(&self) -> usize {
        self.index_levels
    }

    /// Number of rendered columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.header.len()
    }
}

/// Alternating-row shading as `Derived` row directives by render position.
///
/// # Errors
///
/// Fails when either shading style does not parse.
pub fn alternating_row_directives(
    n_rows: usize,
    options: &RenderOptions,
) -> Result<Vec<StyleDirective>, RenderError> {
    if !options.alternating_rows {
        return Ok(Vec::new());
    }
    let (even, odd) = &options.alternating_row_colors;
    let even = StyleFragment::parse(even)?;
    let odd = StyleFragment::parse(odd)?;

    Ok((0..n_rows)
        .filter_map(|row| {
            let fragment = if row % 2 == 0 { even } else { odd };
            (!fragment.is_empty())
                .then(|| StyleDirective::new(Selector::Row(row), fragment, SourceRank::Derived))
        })
        .collect())
}

/// Directives bucketed by the cells they can reach.
#[derive(Default)]
struct Buckets<'a> {
    all: Vec<&'a StyleDirective>,
    columns: HashMap<usize, Vec<&'a StyleDirective>>,
    rows: HashMap<usize, Vec<&'a StyleDirective>>,
    cells: HashMap<(usize, usize), Vec<&'a StyleDirective>>,
    index_rows: HashMap<usize, Vec<&'a StyleDirective>>,
    /// Header, index header and row-agnostic index selectors.
    other: Vec<&'a StyleDirective>,
}

impl<'a> Buckets<'a> {
    fn new(directives: &'a DirectiveSet) -> Self {
        let mut b = Self::default();
        for d in directives {
            match d.selector {
                Selector::All => b.all.push(d),
                Selector::Column(c) => b.columns.entry(c).or_default().push(d),
                Selector::Row(r) => b.rows.entry(r).or_default().push(d),
                Selector::Cell { row, column } => b.cells.entry((row, column)).or_default().push(d),
                Selector::Index { row: Some(r), .. } => b.index_rows.entry(r).or_default().push(d),
                Selector::Header(_) | Selector::Index { row: None, .. } | Selector::IndexHeader(_) => {
                    b.other.push(d);
                }
            }
        }
        b
    }

    fn candidates(&self, cell: CellRef) -> Vec<&'a StyleDirective> {
        let mut out: Vec<&'a StyleDirective> = Vec::new();
        match cell {
            CellRef::Data { row, column } => {
                out.extend(&self.all);
                out.extend(slot(&self.columns, column));
                out.extend(slot(&self.rows, row));
                if let Some(ds) = self.cells.get(&(row, column)) {
                    out.extend(ds);
                }
            }
            CellRef::Index { row, .. } => {
                out.extend(slot(&self.rows, row));
                out.extend(slot(&self.index_rows, row));
            }
            CellRef::Header { .. } | CellRef::IndexHeader { .. } => {}
        }
        out.extend(&self.other);
        out.retain(|d| d.selector.matches(cell));
        out
    }

    fn style(&self, cell: CellRef) -> CellStyle {
        resolve_style(self.candidates(cell))
    }
}

fn slot<'m, 'a>(
    map: &'m HashMap<usize, Vec<&'a StyleDirective>>,
    key: usize,
) -> &'m [&'a StyleDirective] {
    map.get(&key).map_or(&[], Vec::as_slice)
}

/// Pick each attribute from the highest-precedence directive that sets it.
fn resolve_style<'a>(candidates: impl IntoIterator<Item = &'a StyleDirective>) -> CellStyle {
    type Slot<T> = Option<((SourceRank, u64), T)>;
    fn offer<T>(slot: &mut Slot<T>, key: (SourceRank, u64), value: Option<T>) {
        if let Some(value) = value {
            if slot.as_ref().map_or(true, |(k, _)| key > *k) {
                *slot = Some((key, value));
            }
        }
    }

    let mut fg: Slot<Color> = None;
    let mut bg: Slot<Color> = None;
    let mut justify: Slot<Justify> = None;
    let mut modifiers: Slot<Modifiers> = None;

    for d in candidates {
        let key = d.precedence();
        offer(&mut fg, key, d.fragment.fg);
        offer(&mut bg, key, d.fragment.bg);
        offer(&mut justify, key, d.fragment.justify);
        offer(&mut modifiers, key, d.fragment.modifiers);
    }

    CellStyle {
        fg: fg.map(|(_, v)| v),
        bg: bg.map(|(_, v)| v),
        justify: justify.map(|(_, v)| v).unwrap_or_default(),
        modifiers: modifiers.map(|(_, v)| v).unwrap_or_default(),
    }
}

/// Resolve text and style for every cell of `model`.
#[must_use]
pub fn resolve(
    model: &TableModel,
    options: &RenderOptions,
    directives: &DirectiveSet,
    formatter: &Formatter,
) -> ResolvedTable {
    let buckets = Buckets::new(directives);
    let index = model.index();
    let levels = if options.show_index { index.levels() } else { 0 };

    let mut header = Vec::with_capacity(levels + model.n_cols());
    if levels > 0 {
        for (level, name) in index.header_names().into_iter().enumerate() {
            header.push(ResolvedCell::new(name, buckets.style(CellRef::IndexHeader { level })));
        }
    }
    for (column, name) in model.columns().iter().enumerate() {
        header.push(ResolvedCell::new(
            name.as_str(),
            buckets.style(CellRef::Header { column }),
        ));
    }

    let mut rows = Vec::with_capacity(model.n_rows());
    for row in 0..model.n_rows() {
        let mut cells = Vec::with_capacity(header.len());
        let key = index.key(row).unwrap_or(&[]);
        let previous = row.checked_sub(1).and_then(|r| index.key(r));

        for level in 0..levels {
            // Outer components repeated from the previous row render blank.
            let repeated = options.sparsify_index
                && levels > 1
                && level + 1 < levels
                && previous.is_some_and(|prev| prev.get(..=level) == key.get(..=level));
            let text = match key.get(level) {
                Some(_) if repeated => CompactString::default(),
                Some(value) => formatter.format_label(value),
                None => CompactString::default(),
            };
            cells.push(ResolvedCell::new(text, buckets.style(CellRef::Index { row, level })));
        }

        for column in 0..model.n_cols() {
            let text = model
                .value(row, column)
                .map(|v| formatter.format_cell(column, v))
                .unwrap_or_default();
            cells.push(ResolvedCell::new(text, buckets.style(CellRef::Data { row, column })));
        }
        rows.push(cells);
    }

    tracing::debug!(
        rows = rows.len(),
        columns = header.len(),
        directives = directives.len(),
        "styles resolved"
    );
    ResolvedTable::new(header, rows, levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::gradient::GradientRequest;
    use framestyle_core::{RowIndex, Value};

    fn model() -> TableModel {
        TableModel::new(
            vec!["A".into(), "B".into()],
            vec![
                vec![Value::Int(1), Value::Int(2)],
                vec![Value::Int(3), Value::Int(4)],
                vec![Value::Int(5), Value::Int(6)],
            ],
        )
        .unwrap()
    }

    fn directive(selector: Selector, fragment: StyleFragment, rank: SourceRank) -> StyleDirective {
        StyleDirective::new(selector, fragment, rank)
    }

    fn resolve_default(model: &TableModel, set: &DirectiveSet) -> ResolvedTable {
        resolve(model, &RenderOptions::default(), set, &Formatter::default())
    }

    #[test]
    fn test_rank_beats_declaration_order() {
        let red = Color::from_rgb8(255, 0, 0);
        let blue = Color::from_rgb8(0, 0, 255);
        let mut set = DirectiveSet::new();
        set.push(directive(
            Selector::All,
            StyleFragment::new().with_fg(red),
            SourceRank::Explicit,
        ));
        set.push(directive(
            Selector::Cell { row: 0, column: 0 },
            StyleFragment::new().with_fg(blue),
            SourceRank::ExternalStyler,
        ));
        let t = resolve_default(&model(), &set);
        assert_eq!(t.rows()[0][1].style.fg, Some(red));
    }

    #[test]
    fn test_later_declaration_wins_within_rank() {
        let red = Color::from_rgb8(255, 0, 0);
        let blue = Color::from_rgb8(0, 0, 255);
        let mut set = DirectiveSet::new();
        set.push(directive(Selector::All, StyleFragment::new().with_bg(red), SourceRank::Derived));
        set.push(directive(
            Selector::Column(1),
            StyleFragment::new().with_bg(blue),
            SourceRank::Derived,
        ));
        let t = resolve_default(&model(), &set);
        // index cell, then A, then B
        assert_eq!(t.rows()[0][1].style.bg, Some(red));
        assert_eq!(t.rows()[0][2].style.bg, Some(blue));
    }

    #[test]
    fn test_attributes_resolved_independently() {
        let fg = Color::from_rgb8(1, 2, 3);
        let bg = Color::from_rgb8(4, 5, 6);
        let mut set = DirectiveSet::new();
        set.push(directive(
            Selector::Cell { row: 1, column: 0 },
            StyleFragment::new().with_bg(bg),
            SourceRank::Derived,
        ));
        set.push(directive(
            Selector::Column(0),
            StyleFragment::new().with_fg(fg),
            SourceRank::Explicit,
        ));
        let t = resolve_default(&model(), &set);
        let style = t.rows()[1][1].style;
        assert_eq!(style.fg, Some(fg));
        assert_eq!(style.bg, Some(bg));
    }

    #[test]
    fn test_row_selector_reaches_index_cells() {
        let bg = Color::from_rgb8(9, 9, 9);
        let mut set = DirectiveSet::new();
        set.push(directive(Selector::Row(2), StyleFragment::new().with_bg(bg), SourceRank::Derived));
        let t = resolve_default(&model(), &set);
        assert_eq!(t.rows()[2][0].style.bg, Some(bg));
        assert_eq!(t.rows()[2][2].style.bg, Some(bg));
        assert_eq!(t.rows()[1][0].style.bg, None);
        assert_eq!(t.header()[0].style.bg, None);
    }

    #[test]
    fn test_defaults_applied() {
        let m = model();
        let set = aggregate(&m, &RenderOptions::default(), None).unwrap();
        let t = resolve_default(&m, &set);
        assert_eq!(t.index_levels(), 1);
        assert_eq!(t.width(), 3);
        assert_eq!(t.header()[0].text, "Index");
        assert!(t.header()[1].style.modifiers.contains(Modifiers::BOLD));
        assert_eq!(t.rows()[0][1].style.justify, Justify::Right);
        assert_eq!(t.rows()[0][0].style.justify, Justify::Left);
        assert_eq!(t.rows()[0][0].text, "0");
    }

    #[test]
    fn test_hidden_index() {
        let m = model();
        let options = RenderOptions::default().with_show_index(false);
        let t = resolve(&m, &options, &DirectiveSet::new(), &Formatter::default());
        assert_eq!(t.index_levels(), 0);
        assert_eq!(t.width(), 2);
        assert_eq!(t.rows()[0][0].text, "1");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let m = model();
        let options = RenderOptions::default()
            .with_bg("viridis")
            .with_alternating_rows(true);
        let mut set = aggregate(&m, &options, None).unwrap();
        set.extend(alternating_row_directives(m.n_rows(), &options).unwrap());
        set.extend(GradientRequest::background("viridis").directives(&m).unwrap());
        let first = resolve(&m, &options, &set, &Formatter::default());
        let second = resolve(&m, &options, &set, &Formatter::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_alternating_rows_parity() {
        let options = RenderOptions::default()
            .with_alternating_rows(true)
            .with_alternating_row_colors("on red", "on blue");
        let ds = alternating_row_directives(5, &options).unwrap();
        let red = Color::from_rgb8(255, 0, 0);
        let even = ds.iter().filter(|d| d.fragment.bg == Some(red)).count();
        assert_eq!(even, 3);
        assert_eq!(ds.len() - even, 2);
        assert!(ds.iter().all(|d| d.rank == SourceRank::Derived));
    }

    #[test]
    fn test_alternating_rows_empty_style_skipped() {
        let options = RenderOptions::default()
            .with_alternating_rows(true)
            .with_alternating_row_colors("", "on blue");
        let ds = alternating_row_directives(4, &options).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds[0].selector, Selector::Row(1));
        assert!(alternating_row_directives(4, &RenderOptions::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_hierarchical_index_sparsified() {
        let index = RowIndex::from_tuples(
            vec![Some("region".into()), None],
            vec![
                vec!["east".into(), Value::Int(1)],
                vec!["east".into(), Value::Int(2)],
                vec!["west".into(), Value::Int(1)],
            ],
        )
        .unwrap();
        let m = model().with_index(index).unwrap();
        let t = resolve_default(&m, &DirectiveSet::new());
        assert_eq!(t.index_levels(), 2);
        assert_eq!(t.header()[0].text, "region");
        assert_eq!(t.header()[1].text, "level_1");
        let outer: Vec<&str> = t.rows().iter().map(|r| r[0].text.as_str()).collect();
        assert_eq!(outer, vec!["east", "", "west"]);
        let inner: Vec<&str> = t.rows().iter().map(|r| r[1].text.as_str()).collect();
        assert_eq!(inner, vec!["1", "2", "1"]);

        let dense = resolve(
            &m,
            &RenderOptions::default().with_sparsify_index(false),
            &DirectiveSet::new(),
            &Formatter::default(),
        );
        assert_eq!(dense.rows()[1][0].text, "east");
    }

    #[test]
    fn test_missing_values_use_na_rep() {
        let m = TableModel::new(vec!["A".into()], vec![vec![Value::Missing]]).unwrap();
        let t = resolve(
            &m,
            &RenderOptions::default(),
            &DirectiveSet::new(),
            &Formatter::new("--"),
        );
        assert_eq!(t.rows()[0][1].text, "--");
    }

    #[test]
    fn test_multiline_text_is_flattened() {
        let model = TableModel::new(
            vec!["first\nsecond".into()],
            vec![vec![Value::from("ab\r\ncd\tef")]],
        )
        .unwrap();
        let t = resolve_default(&model, &DirectiveSet::new());
        assert_eq!(t.header()[1].text, "first↵second");
        assert_eq!(t.rows()[0][1].text, "ab↵cd ef");
        assert_eq!(ResolvedCell::new("plain", CellStyle::default()).text, "plain");
    }
}
