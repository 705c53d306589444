//! Style source aggregation: defaults, the external style object and
//! explicit options flattened into one ordered directive list.

use crate::error::RenderError;
use crate::options::RenderOptions;
use framestyle_core::{
    ExternalStyle, Justify, Modifiers, Selector, SourceRank, StyleDirective, StyleFragment,
    TableModel, Target,
};

/// Directives in declaration order. Every pushed directive is stamped
/// with the next sequence number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectiveSet {
    directives: Vec<StyleDirective>,
}

impl DirectiveSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directive, overwriting its sequence number.
    pub fn push(&mut self, mut directive: StyleDirective) {
        directive.seq = self.directives.len() as u64;
        self.directives.push(directive);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StyleDirective> {
        self.directives.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[StyleDirective] {
        &self.directives
    }

    /// Directives of one rank, in declaration order.
    pub fn of_rank(&self, rank: SourceRank) -> impl Iterator<Item = &StyleDirective> + '_ {
        self.directives.iter().filter(move |d| d.rank == rank)
    }
}

impl Extend<StyleDirective> for DirectiveSet {
    fn extend<T: IntoIterator<Item = StyleDirective>>(&mut self, iter: T) {
        for directive in iter {
            self.push(directive);
        }
    }
}

impl<'a> IntoIterator for &'a DirectiveSet {
    type Item = &'a StyleDirective;
    type IntoIter = std::slice::Iter<'a, StyleDirective>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}

/// Collect `Default`, `ExternalStyler` and `Explicit` directives for `model`.
///
/// # Errors
///
/// Fails on malformed style strings or CSS colors, and on explicit options
/// naming columns or rows the model does not have.
pub fn aggregate(
    model: &TableModel,
    options: &RenderOptions,
    external: Option<&ExternalStyle>,
) -> Result<DirectiveSet, RenderError> {
    let mut set = DirectiveSet::new();
    push_defaults(&mut set, model);
    let defaults = set.len();

    if let Some(external) = external {
        push_external(&mut set, model, external)?;
    }
    let externals = set.len() - defaults;

    push_explicit(&mut set, model, options)?;

    tracing::debug!(
        defaults,
        externals,
        explicit = set.len() - defaults - externals,
        "style sources aggregated"
    );
    Ok(set)
}

fn push_defaults(set: &mut DirectiveSet, model: &TableModel) {
    let bold = StyleFragment::new().with_modifiers(Modifiers::BOLD);
    set.push(StyleDirective::new(
        Selector::Header(None),
        bold,
        SourceRank::Default,
    ));
    set.push(StyleDirective::new(
        Selector::IndexHeader(None),
        bold,
        SourceRank::Default,
    ));

    for column in 0..model.n_cols() {
        let justify = if model.is_numeric_column(column) {
            Justify::Right
        } else {
            Justify::Left
        };
        let fragment = StyleFragment::new().with_justify(justify);
        set.push(StyleDirective::new(
            Selector::Column(column),
            fragment,
            SourceRank::Default,
        ));
        set.push(StyleDirective::new(
            Selector::Header(Some(column)),
            fragment,
            SourceRank::Default,
        ));
    }

    set.push(StyleDirective::new(
        Selector::Index {
            row: None,
            level: None,
        },
        StyleFragment::new().with_justify(Justify::Left),
        SourceRank::Default,
    ));
}

/// Selectors for an external target. Absent labels select nothing.
fn external_selectors(model: &TableModel, target: &Target) -> Vec<Selector> {
    let index = model.index();
    match target {
        Target::All => vec![Selector::All],
        Target::Column(name) => model
            .column_position(name)
            .map(Selector::Column)
            .into_iter()
            .collect(),
        Target::Header(name) => model
            .column_position(name)
            .map(|c| Selector::Header(Some(c)))
            .into_iter()
            .collect(),
        Target::Row(label) => index
            .positions_of(label)
            .into_iter()
            .map(Selector::Row)
            .collect(),
        Target::Index(label) => index
            .positions_of(label)
            .into_iter()
            .map(|row| Selector::Index {
                row: Some(row),
                level: None,
            })
            .collect(),
        Target::Cell { row, column } => match model.column_position(column) {
            Some(column) => index
                .positions_of(row)
                .into_iter()
                .map(|row| Selector::Cell { row, column })
                .collect(),
            None => Vec::new(),
        },
        Target::Position { row, column } => {
            if *row < model.n_rows() && *column < model.n_cols() {
                vec![Selector::Cell {
                    row: *row,
                    column: *column,
                }]
            } else {
                Vec::new()
            }
        }
    }
}

fn push_external(
    set: &mut DirectiveSet,
    model: &TableModel,
    external: &ExternalStyle,
) -> Result<(), RenderError> {
    for entry in external.entries() {
        let fragment = entry.fragment()?;
        if fragment.is_empty() {
            continue;
        }
        let selectors = external_selectors(model, &entry.target);
        if selectors.is_empty() {
            tracing::trace!(label = ?entry.target, "external style target not in table, dropped");
        }
        for selector in selectors {
            set.push(StyleDirective::new(
                selector,
                fragment,
                SourceRank::ExternalStyler,
            ));
        }
    }
    Ok(())
}

fn push_explicit(
    set: &mut DirectiveSet,
    model: &TableModel,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let fixed = [
        (&options.column_header_style, Selector::Header(None)),
        (
            &options.index_style,
            Selector::Index {
                row: None,
                level: None,
            },
        ),
        (&options.index_header_style, Selector::IndexHeader(None)),
        (&options.table_style, Selector::All),
    ];
    for (style, selector) in fixed {
        if let Some(style) = style {
            let fragment = StyleFragment::parse(style)?;
            set.push(StyleDirective::new(selector, fragment, SourceRank::Explicit));
        }
    }

    for (column, style) in &options.column_styles {
        let position = model
            .column_position(column)
            .ok_or_else(|| RenderError::UnknownColumn(column.clone()))?;
        set.push(StyleDirective::new(
            Selector::Column(position),
            StyleFragment::parse(style)?,
            SourceRank::Explicit,
        ));
    }

    for (label, style) in &options.row_styles {
        let rows = model.index().positions_of(label);
        if rows.is_empty() {
            return Err(RenderError::UnknownRow(label.clone()));
        }
        let fragment = StyleFragment::parse(style)?;
        for row in rows {
            set.push(StyleDirective::new(
                Selector::Row(row),
                fragment,
                SourceRank::Explicit,
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use framestyle_core::{Color, ExternalEntry, RowIndex, StyleError, Value};

    fn model() -> TableModel {
        TableModel::new(
            vec!["num".into(), "text".into()],
            vec![
                vec![Value::Int(1), Value::from("a")],
                vec![Value::Int(2), Value::from("b")],
            ],
        )
        .unwrap()
        .with_index(RowIndex::from_labels(["x", "y"]))
        .unwrap()
    }

    fn css(target: Target, props: &[(&str, &str)]) -> ExternalEntry {
        ExternalEntry::new(
            target,
            props
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_sequence_numbers_follow_push_order() {
        let mut set = DirectiveSet::new();
        let d = StyleDirective::new(Selector::All, StyleFragment::new(), SourceRank::Explicit);
        set.push(d);
        set.extend([d, d]);
        let seqs: Vec<u64> = set.iter().map(|d| d.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn test_defaults() {
        let set = aggregate(&model(), &RenderOptions::default(), None).unwrap();
        assert!(set.iter().all(|d| d.rank == SourceRank::Default));

        let justify_of = |column| {
            set.iter()
                .find(|d| d.selector == Selector::Column(column))
                .and_then(|d| d.fragment.justify)
        };
        assert_eq!(justify_of(0), Some(Justify::Right));
        assert_eq!(justify_of(1), Some(Justify::Left));

        let header = set
            .iter()
            .find(|d| d.selector == Selector::Header(None))
            .unwrap();
        assert_eq!(header.fragment.modifiers, Some(Modifiers::BOLD));
    }

    #[test]
    fn test_external_entries_converted() {
        let external: ExternalStyle = [
            css(Target::Column("num".into()), &[("background-color", "red")]),
            css(Target::Row("y".into()), &[("color", "#00ff00"), ("font-weight", "bold")]),
            css(
                Target::Cell {
                    row: "x".into(),
                    column: "text".into(),
                },
                &[("text-align", "center")],
            ),
        ]
        .into_iter()
        .collect();

        let set = aggregate(&model(), &RenderOptions::default(), Some(&external)).unwrap();
        let ext: Vec<_> = set.of_rank(SourceRank::ExternalStyler).collect();
        assert_eq!(ext.len(), 3);
        assert_eq!(ext[0].selector, Selector::Column(0));
        assert_eq!(ext[0].fragment.bg, Some(Color::from_rgb8(255, 0, 0)));
        assert_eq!(ext[1].selector, Selector::Row(1));
        assert_eq!(ext[2].selector, Selector::Cell { row: 0, column: 1 });
        assert_eq!(ext[2].fragment.justify, Some(Justify::Center));
    }

    #[test]
    fn test_external_absent_labels_dropped() {
        let external: ExternalStyle = [
            css(Target::Column("missing".into()), &[("color", "red")]),
            css(Target::Row("nope".into()), &[("color", "red")]),
            css(Target::Position { row: 9, column: 0 }, &[("color", "red")]),
            css(Target::All, &[("unknown-key", "x")]),
        ]
        .into_iter()
        .collect();
        let set = aggregate(&model(), &RenderOptions::default(), Some(&external)).unwrap();
        assert_eq!(set.of_rank(SourceRank::ExternalStyler).count(), 0);
    }

    #[test]
    fn test_external_malformed_color() {
        let external: ExternalStyle = [css(Target::All, &[("color", "#12")])].into_iter().collect();
        let err = aggregate(&model(), &RenderOptions::default(), Some(&external)).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Style(StyleError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_repeated_row_label_yields_directive_per_row() {
        let m = model()
            .with_index(RowIndex::from_labels(["dup", "dup"]))
            .unwrap();
        let external: ExternalStyle = [css(Target::Row("dup".into()), &[("color", "red")])]
            .into_iter()
            .collect();
        let set = aggregate(&m, &RenderOptions::default(), Some(&external)).unwrap();
        assert_eq!(set.of_rank(SourceRank::ExternalStyler).count(), 2);
    }

    #[test]
    fn test_explicit_options() {
        let options = RenderOptions::default()
            .with_column_header_style("bold magenta")
            .with_index_style("italic")
            .with_table_style("on black")
            .with_column_style("text", "underline")
            .with_row_style("x", "red");
        let set = aggregate(&model(), &options, None).unwrap();
        let explicit: Vec<_> = set.of_rank(SourceRank::Explicit).collect();
        assert_eq!(explicit.len(), 5);
        assert!(explicit.iter().any(|d| d.selector == Selector::Column(1)));
        assert!(explicit.iter().any(|d| d.selector == Selector::Row(0)));
        assert!(explicit.iter().any(|d| d.selector == Selector::All));
    }

    #[test]
    fn test_explicit_unknown_labels() {
        let err = aggregate(
            &model(),
            &RenderOptions::default().with_column_style("zzz", "bold"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::UnknownColumn(_)));

        let err = aggregate(
            &model(),
            &RenderOptions::default().with_row_style("zzz", "bold"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::UnknownRow(_)));
    }

    #[test]
    fn test_explicit_bad_style_string() {
        let err = aggregate(
            &model(),
            &RenderOptions::default().with_column_header_style("bold sparkly"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Style(StyleError::UnknownToken(_))));
    }
}
