//! Table renderer: the displayable `StyledTable`.

use crate::color::ColorMode;
use crate::error::RenderError;
use crate::layout::{BoxChars, BoxStyle, LayoutPlan};
use crate::options::RenderOptions;
use crate::resolve::{CellStyle, ResolvedCell, ResolvedTable};
use crate::text::{fit, single_line, truncate};
use crossterm::style::{Attribute, Attributes, ContentStyle};
use framestyle_core::{Justify, Modifiers, StyleFragment};
use std::fmt;
use unicode_width::UnicodeWidthStr;

fn cell_style(fragment: StyleFragment) -> CellStyle {
    CellStyle {
        fg: fragment.fg,
        bg: fragment.bg,
        justify: fragment.justify.unwrap_or_default(),
        modifiers: fragment.modifiers.unwrap_or_default(),
    }
}

fn parse_style(style: Option<&str>) -> Result<CellStyle, RenderError> {
    Ok(style
        .map(StyleFragment::parse)
        .transpose()?
        .map(cell_style)
        .unwrap_or_default())
}

/// A fully resolved and laid-out table. Printing is the caller's job.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledTable {
    title: Option<String>,
    caption: Option<String>,
    title_style: CellStyle,
    border_style: CellStyle,
    table: ResolvedTable,
    layout: LayoutPlan,
    columns: usize,
}

impl StyledTable {
    /// Assemble a table from resolved cells and a layout.
    ///
    /// # Errors
    ///
    /// Fails when the title or border style does not parse.
    pub fn new(
        table: ResolvedTable,
        layout: LayoutPlan,
        options: &RenderOptions,
    ) -> Result<Self, RenderError> {
        let columns = table.width() - table.index_levels();
        Ok(Self {
            title: options.title.clone(),
            caption: options.caption.clone(),
            title_style: parse_style(options.title_style.as_deref())?,
            border_style: parse_style(options.border_style.as_deref())?,
            table,
            layout,
            columns,
        })
    }

    /// Number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.table.rows().len()
    }

    /// Number of data columns, index columns excluded.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Number of rendered index columns.
    #[must_use]
    pub fn index_levels(&self) -> usize {
        self.table.index_levels()
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Header cells, index headers first.
    #[must_use]
    pub fn header(&self) -> &[ResolvedCell] {
        self.table.header()
    }

    /// Rendered rows, index cells first.
    #[must_use]
    pub fn rows(&self) -> &[Vec<ResolvedCell>] {
        self.table.rows()
    }

    /// Data cell by row and data-column position.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&ResolvedCell> {
        if column >= self.columns {
            return None;
        }
        self.table
            .rows()
            .get(row)
            .and_then(|r| r.get(self.index_levels() + column))
    }

    /// Index cell by row and level.
    #[must_use]
    pub fn index_cell(&self, row: usize, level: usize) -> Option<&ResolvedCell> {
        if level >= self.index_levels() {
            return None;
        }
        self.table.rows().get(row).and_then(|r| r.get(level))
    }

    /// Header cell of a data column.
    #[must_use]
    pub fn header_cell(&self, column: usize) -> Option<&ResolvedCell> {
        if column >= self.columns {
            return None;
        }
        self.table.header().get(self.index_levels() + column)
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutPlan {
        &self.layout
    }

    /// Display adapter for a color mode.
    #[must_use]
    pub fn render(&self, mode: ColorMode) -> Rendered<'_> {
        Rendered {
            table: self,
            mode,
            plain: false,
        }
    }

    /// Rendered lines with ANSI escapes for `mode`.
    #[must_use]
    pub fn lines(&self, mode: ColorMode) -> Vec<String> {
        self.render(mode)
            .to_string()
            .split('\n')
            .map(String::from)
            .collect()
    }

    /// The table without any escape sequences.
    #[must_use]
    pub fn to_plain(&self) -> String {
        Rendered {
            table: self,
            mode: ColorMode::Mono,
            plain: true,
        }
        .to_string()
    }
}

impl fmt::Display for StyledTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(ColorMode::TrueColor).fmt(f)
    }
}

/// A `StyledTable` bound to a color mode, ready to print.
#[derive(Debug, Clone, Copy)]
pub struct Rendered<'a> {
    table: &'a StyledTable,
    mode: ColorMode,
    plain: bool,
}

impl Rendered<'_> {
    fn paint(&self, f: &mut fmt::Formatter<'_>, text: &str, style: &CellStyle) -> fmt::Result {
        if self.plain || style.is_plain() || text.is_empty() {
            return f.write_str(text);
        }

        let mut content = ContentStyle::new();
        content.foreground_color = style.fg.and_then(|c| self.mode.to_crossterm(c));
        content.background_color = style.bg.and_then(|c| self.mode.to_crossterm(c));
        content.attributes = attributes(style.modifiers);
        write!(f, "{}", content.apply(text))
    }

    /// Title or caption centered over the table width.
    fn banner(&self, f: &mut fmt::Formatter<'_>, text: &str, style: &CellStyle) -> fmt::Result {
        let width = self.table.layout.total_width();
        let text = single_line(text);
        let text = truncate(&text, width);
        let gap = width.saturating_sub(text.width());
        f.write_str(&" ".repeat(gap / 2))?;
        self.paint(f, &text, style)?;
        f.write_str(&" ".repeat(gap - gap / 2))
    }

    /// A horizontal border line.
    fn rule(
        &self,
        f: &mut fmt::Formatter<'_>,
        left: char,
        fill: char,
        mid: char,
        right: char,
    ) -> fmt::Result {
        let layout = &self.table.layout;
        let pad = layout.padding.horizontal * 2;
        let mut line = String::new();
        if layout.show_edge {
            line.push(left);
        }
        for (k, w) in layout.widths.iter().enumerate() {
            if k > 0 {
                line.push(mid);
            }
            line.extend(std::iter::repeat(fill).take(w + pad));
        }
        if layout.show_edge {
            line.push(right);
        }
        self.paint(f, &line, &self.table.border_style)
    }

    /// One line of a row. `blank` renders vertical padding.
    fn row_line(
        &self,
        f: &mut fmt::Formatter<'_>,
        cells: &[ResolvedCell],
        blank: bool,
        collapsible: bool,
        chars: &BoxChars,
    ) -> fmt::Result {
        let layout = &self.table.layout;
        let pad = " ".repeat(layout.padding.horizontal);
        let border = &self.table.border_style;

        if layout.show_edge {
            self.paint(f, &chars.edge.to_string(), border)?;
        }
        for (k, (cell, &width)) in cells.iter().zip(&layout.widths).enumerate() {
            if k > 0 {
                let collapsed = collapsible && layout.collapse.get(k - 1).copied().unwrap_or(false);
                if collapsed {
                    let shared = CellStyle {
                        bg: cells[k - 1].style.bg,
                        ..CellStyle::default()
                    };
                    self.paint(f, " ", &shared)?;
                } else {
                    self.paint(f, &chars.divider.to_string(), border)?;
                }
            }
            let text = if blank { "" } else { cell.text.as_str() };
            let justify = if blank { Justify::Left } else { cell.style.justify };
            let content = format!("{pad}{}{pad}", fit(text, width, justify));
            self.paint(f, &content, &cell.style)?;
        }
        if layout.show_edge {
            self.paint(f, &chars.edge.to_string(), border)?;
        }
        Ok(())
    }

    fn row(
        &self,
        f: &mut fmt::Formatter<'_>,
        cells: &[ResolvedCell],
        collapsible: bool,
        chars: &BoxChars,
        first: &mut bool,
    ) -> fmt::Result {
        let vertical = self.table.layout.padding.vertical;
        for line in 0..(2 * vertical + 1) {
            newline(f, first)?;
            self.row_line(f, cells, line != vertical, collapsible, chars)?;
        }
        Ok(())
    }
}

fn newline(f: &mut fmt::Formatter<'_>, first: &mut bool) -> fmt::Result {
    if *first {
        *first = false;
        Ok(())
    } else {
        f.write_str("\n")
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table;
        let layout = &table.layout;
        let chars = layout.box_style.chars();
        let rules = layout.box_style != BoxStyle::None;
        let mut first = true;

        if let Some(title) = &table.title {
            newline(f, &mut first)?;
            self.banner(f, title, &table.title_style)?;
        }

        if rules && layout.show_edge {
            newline(f, &mut first)?;
            self.rule(f, chars.top_left, chars.top, chars.top_mid, chars.top_right)?;
        }

        self.row(f, table.table.header(), false, &chars, &mut first)?;

        if rules {
            newline(f, &mut first)?;
            self.rule(f, chars.head_left, chars.head, chars.head_mid, chars.head_right)?;
        }

        for row in table.table.rows() {
            self.row(f, row, true, &chars, &mut first)?;
        }

        if rules && layout.show_edge {
            newline(f, &mut first)?;
            self.rule(
                f,
                chars.bottom_left,
                chars.bottom,
                chars.bottom_mid,
                chars.bottom_right,
            )?;
        }

        if let Some(caption) = &table.caption {
            newline(f, &mut first)?;
            self.banner(f, caption, &CellStyle::default())?;
        }
        Ok(())
    }
}

fn attributes(modifiers: Modifiers) -> Attributes {
    let mut attrs = Attributes::default();
    let table = [
        (Modifiers::BOLD, Attribute::Bold),
        (Modifiers::ITALIC, Attribute::Italic),
        (Modifiers::UNDERLINE, Attribute::Underlined),
        (Modifiers::STRIKETHROUGH, Attribute::CrossedOut),
        (Modifiers::DIM, Attribute::Dim),
        (Modifiers::BLINK, Attribute::SlowBlink),
        (Modifiers::REVERSE, Attribute::Reverse),
    ];
    for (modifier, attribute) in table {
        if modifiers.contains(modifier) {
            attrs.set(attribute);
        }
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Padding;
    use framestyle_core::Color;

    fn cell(text: &str) -> ResolvedCell {
        ResolvedCell::new(text, CellStyle::default())
    }

    fn plan(widths: Vec<usize>, box_style: BoxStyle, show_edge: bool) -> LayoutPlan {
        let n = widths.len();
        LayoutPlan {
            widths,
            padding: Padding::new(0, 1),
            box_style,
            show_edge,
            collapse: vec![false; n.saturating_sub(1)],
        }
    }

    fn small() -> StyledTable {
        let table = ResolvedTable::new(
            vec![cell("Index"), cell("A")],
            vec![vec![cell("0"), cell("1")], vec![cell("1"), cell("22")]],
            1,
        );
        StyledTable::new(table, plan(vec![5, 2], BoxStyle::Rounded, true), &RenderOptions::default())
            .unwrap()
    }

    #[test]
    fn test_plain_rendering() {
        let plain = small().to_plain();
        let expected = [
            "╭───────┬────╮",
            "│ Index │ A  │",
            "├───────┼────┤",
            "│ 0     │ 1  │",
            "│ 1     │ 22 │",
            "╰───────┴────╯",
        ]
        .join("\n");
        assert_eq!(plain, expected);
    }

    #[test]
    fn test_accessors() {
        let t = small();
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column_count(), 1);
        assert_eq!(t.index_levels(), 1);
        assert_eq!(t.cell(1, 0).map(|c| c.text.as_str()), Some("22"));
        assert_eq!(t.index_cell(1, 0).map(|c| c.text.as_str()), Some("1"));
        assert_eq!(t.header_cell(0).map(|c| c.text.as_str()), Some("A"));
        assert!(t.cell(0, 1).is_none());
        assert!(t.index_cell(0, 1).is_none());
    }

    #[test]
    fn test_lines_match_plain_width() {
        let t = small();
        for line in t.to_plain().lines() {
            assert_eq!(line.width(), t.layout().total_width());
        }
    }

    #[test]
    fn test_truecolor_lines_carry_escapes() {
        let red = Color::from_rgb8(255, 0, 0);
        let styled = ResolvedCell::new(
            "x",
            CellStyle {
                bg: Some(red),
                ..CellStyle::default()
            },
        );
        let table = ResolvedTable::new(vec![cell("A")], vec![vec![styled]], 0);
        let t = StyledTable::new(table, plan(vec![1], BoxStyle::Ascii, true), &RenderOptions::default())
            .unwrap();
        let lines = t.lines(ColorMode::TrueColor);
        assert!(lines.iter().any(|l| l.contains("\x1b[")));
        assert!(!t.to_plain().contains('\x1b'));
        let mono = t.lines(ColorMode::Mono).join("\n");
        assert!(!mono.contains("48;2"));
    }

    #[test]
    fn test_title_and_caption() {
        let table = ResolvedTable::new(vec![cell("A")], vec![], 0);
        let options = RenderOptions::default()
            .with_title("T")
            .with_caption("note");
        let t = StyledTable::new(table, plan(vec![3], BoxStyle::Rounded, true), &options).unwrap();
        let plain = t.to_plain();
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines.first().map(|l| l.trim()), Some("T"));
        assert_eq!(lines.last().map(|l| l.trim()), Some("note"));
        assert_eq!(t.title(), Some("T"));
        assert_eq!(t.caption(), Some("note"));
    }

    #[test]
    fn test_minimal_without_edge() {
        let table = ResolvedTable::new(
            vec![cell("A"), cell("B")],
            vec![vec![cell("1"), cell("2")]],
            0,
        );
        let mut layout = plan(vec![1, 1], BoxStyle::Minimal, false);
        layout.padding = Padding::new(0, 0);
        let t = StyledTable::new(table, layout, &RenderOptions::default()).unwrap();
        assert_eq!(t.to_plain(), "A│B\n─┼─\n1│2");
    }

    #[test]
    fn test_truncation_with_ellipsis() {
        let table = ResolvedTable::new(vec![cell("H")], vec![vec![cell("abcdefgh")]], 0);
        let t = StyledTable::new(table, plan(vec![4], BoxStyle::Ascii, true), &RenderOptions::default())
            .unwrap();
        assert!(t.to_plain().contains("| abc… |"));
    }

    #[test]
    fn test_vertical_padding_adds_lines() {
        let table = ResolvedTable::new(vec![cell("A")], vec![vec![cell("1")]], 0);
        let mut layout = plan(vec![1], BoxStyle::Ascii, true);
        layout.padding = Padding::new(1, 1);
        let t = StyledTable::new(table, layout, &RenderOptions::default()).unwrap();
        // top, 3 header lines, rule, 3 row lines, bottom
        assert_eq!(t.to_plain().lines().count(), 9);
    }

    #[test]
    fn test_bad_border_style() {
        let table = ResolvedTable::new(vec![cell("A")], vec![], 0);
        let options = RenderOptions::default().with_border_style("shiny");
        assert!(StyledTable::new(table, plan(vec![1], BoxStyle::Rounded, true), &options).is_err());
    }
}
