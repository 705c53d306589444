//! Tabular data model: columns, a (possibly hierarchical) row index and a
//! dense value grid.

use crate::error::TableError;
use crate::value::Value;
use std::collections::HashSet;

/// Row index with one or more levels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowIndex {
    names: Vec<Option<String>>,
    keys: Vec<Vec<Value>>,
}

impl RowIndex {
    /// Default `0..n` index with one unnamed level.
    #[must_use]
    pub fn range(n: usize) -> Self {
        Self {
            names: vec![None],
            keys: (0..n).map(|i| vec![Value::Int(i as i64)]).collect(),
        }
    }

    /// Single-level index from labels.
    pub fn from_labels<I, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            names: vec![None],
            keys: labels.into_iter().map(|v| vec![v.into()]).collect(),
        }
    }

    /// Hierarchical index from level names and one key tuple per row.
    ///
    /// # Errors
    ///
    /// Fails when there are no levels or a key has the wrong arity.
    pub fn from_tuples(
        names: Vec<Option<String>>,
        keys: Vec<Vec<Value>>,
    ) -> Result<Self, TableError> {
        if names.is_empty() {
            return Err(TableError::NoIndexLevels);
        }
        for (row, key) in keys.iter().enumerate() {
            if key.len() != names.len() {
                return Err(TableError::IndexLevels {
                    row,
                    expected: names.len(),
                    found: key.len(),
                });
            }
        }
        Ok(Self { names, keys })
    }

    /// Name a single-level index.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        if let Some(first) = self.names.first_mut() {
            *first = Some(name.into());
        }
        self
    }

    /// Number of levels.
    #[must_use]
    pub fn levels(&self) -> usize {
        self.names.len()
    }

    /// Number of row keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when the index has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Level names as given.
    #[must_use]
    pub fn names(&self) -> &[Option<String>] {
        &self.names
    }

    /// Key tuple for a row.
    #[must_use]
    pub fn key(&self, row: usize) -> Option<&[Value]> {
        self.keys.get(row).map(Vec::as_slice)
    }

    /// Display label for a row: the key itself for a single level, the
    /// components joined with `", "` otherwise.
    #[must_use]
    pub fn label(&self, row: usize) -> Option<String> {
        self.key(row).map(|key| {
            key.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })
    }

    /// Header text for each level.
    ///
    /// A single unnamed level is `"Index"`; unnamed levels of a hierarchical
    /// index are `level_<n>`.
    #[must_use]
    pub fn header_names(&self) -> Vec<String> {
        let single = self.names.len() == 1;
        self.names
            .iter()
            .enumerate()
            .map(|(level, name)| match name {
                Some(n) => n.clone(),
                None if single => "Index".to_string(),
                None => format!("level_{level}"),
            })
            .collect()
    }

    /// Rows whose label equals `label`. For a hierarchical index a label
    /// also matches every row whose outermost component equals it.
    #[must_use]
    pub fn positions_of(&self, label: &str) -> Vec<usize> {
        let hierarchical = self.levels() > 1;
        (0..self.len())
            .filter(|&row| {
                self.label(row).is_some_and(|l| l == label)
                    || (hierarchical
                        && self
                            .key(row)
                            .and_then(<[Value]>::first)
                            .is_some_and(|outer| outer.to_string() == label))
            })
            .collect()
    }
}

/// Column identifiers, row index and values.
///
/// Every row holds exactly one value per column and column identifiers are
/// unique. Row keys may repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    columns: Vec<String>,
    index: RowIndex,
    rows: Vec<Vec<Value>>,
}

impl TableModel {
    /// Build a table from row-major values with a `0..n` index.
    ///
    /// # Errors
    ///
    /// Fails on duplicate columns or rows of the wrong length.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, TableError> {
        check_unique(&columns)?;
        for (row, values) in rows.iter().enumerate() {
            if values.len() != columns.len() {
                return Err(TableError::RaggedRow {
                    row,
                    expected: columns.len(),
                    found: values.len(),
                });
            }
        }
        let index = RowIndex::range(rows.len());
        Ok(Self {
            columns,
            index,
            rows,
        })
    }

    /// Build a table from `(name, values)` column pairs.
    ///
    /// # Errors
    ///
    /// Fails on duplicate columns or columns of unequal length.
    pub fn from_columns(columns: Vec<(String, Vec<Value>)>) -> Result<Self, TableError> {
        let n_rows = columns.first().map_or(0, |(_, v)| v.len());
        for (name, values) in &columns {
            if values.len() != n_rows {
                return Err(TableError::ColumnLength {
                    column: name.clone(),
                    expected: n_rows,
                    found: values.len(),
                });
            }
        }

        let names: Vec<String> = columns.iter().map(|(n, _)| n.clone()).collect();
        let mut rows: Vec<Vec<Value>> = (0..n_rows)
            .map(|_| Vec::with_capacity(names.len()))
            .collect();
        for (_, values) in columns {
            for (row, value) in values.into_iter().enumerate() {
                rows[row].push(value);
            }
        }
        Self::new(names, rows)
    }

    /// Single-column table, the shape of a named series. An unnamed series
    /// gets the column name `"0"`.
    #[must_use]
    pub fn from_series(name: Option<&str>, values: Vec<Value>) -> Self {
        let n = values.len();
        Self {
            columns: vec![name.unwrap_or("0").to_string()],
            index: RowIndex::range(n),
            rows: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    /// Replace the row index.
    ///
    /// # Errors
    ///
    /// Fails when the index length differs from the row count.
    pub fn with_index(mut self, index: RowIndex) -> Result<Self, TableError> {
        if index.len() != self.rows.len() {
            return Err(TableError::IndexLength {
                expected: self.rows.len(),
                found: index.len(),
            });
        }
        self.index = index;
        Ok(self)
    }

    /// Column identifiers in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The row index.
    #[must_use]
    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at `(row, column)`.
    #[must_use]
    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// All values of one row.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[Value]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Values of one column, top to bottom.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |r| r.get(column))
    }

    /// Position of a column by identifier.
    #[must_use]
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// A column is numeric when it has at least one non-missing value and
    /// every non-missing value is numeric.
    #[must_use]
    pub fn is_numeric_column(&self, column: usize) -> bool {
        let mut seen = false;
        for value in self.column_values(column) {
            if value.is_missing() {
                continue;
            }
            if !value.is_numeric() {
                return false;
            }
            seen = true;
        }
        seen
    }
}

fn check_unique(columns: &[String]) -> Result<(), TableError> {
    let mut seen = HashSet::with_capacity(columns.len());
    for c in columns {
        if !seen.insert(c.as_str()) {
            return Err(TableError::DuplicateColumn(c.clone()));
        }
    }
    Ok(())
}
