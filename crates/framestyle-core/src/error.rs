//! Error types for framestyle-core.

use thiserror::Error;

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Invalid hex characters
    #[error("invalid hex characters")]
    InvalidHex,
    /// Invalid string length
    #[error("invalid hex string length (expected 3, 6 or 8)")]
    InvalidLength,
    /// Not a known color name
    #[error("unknown color name")]
    UnknownName,
    /// Malformed `rgb(r, g, b)` triplet
    #[error("invalid rgb triplet (expected rgb(r, g, b) with components 0-255)")]
    InvalidRgb,
}

/// A style fragment or color could not be converted to its internal form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// A color string could not be parsed.
    #[error("invalid color '{input}': {source}")]
    InvalidColor {
        input: String,
        #[source]
        source: ColorParseError,
    },

    /// A style string contained a token that is neither a color, an
    /// emphasis flag, nor a justification.
    #[error("unknown style token '{0}'")]
    UnknownToken(String),

    /// `on` was the last token of a style string.
    #[error("'on' must be followed by a background color in '{0}'")]
    MissingBackground(String),

    /// A `text-align` value was not recognized.
    #[error("invalid text alignment '{0}'")]
    InvalidJustify(String),
}

/// A table model violated one of its structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A row has a different number of values than there are columns.
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A column's value vector differs in length from the first column.
    #[error("column '{column}' has {found} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Two columns share the same identifier.
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    /// The index has a different number of keys than the table has rows.
    #[error("index has {found} keys, table has {expected} rows")]
    IndexLength { expected: usize, found: usize },

    /// A hierarchical key has the wrong number of components.
    #[error("index key {row} has {found} levels, expected {expected}")]
    IndexLevels {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// An index must have at least one level.
    #[error("index must have at least one level")]
    NoIndexLevels,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse_error_display() {
        assert_eq!(
            ColorParseError::InvalidHex.to_string(),
            "invalid hex characters"
        );
        assert!(ColorParseError::InvalidLength.to_string().contains("3, 6 or 8"));
    }

    #[test]
    fn test_style_error_carries_source() {
        let err = StyleError::InvalidColor {
            input: "#zzz".to_string(),
            source: ColorParseError::InvalidHex,
        };
        let msg = err.to_string();
        assert!(msg.contains("#zzz"));
        assert!(msg.contains("invalid hex characters"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_table_error_ragged_row() {
        let err = TableError::RaggedRow {
            row: 2,
            expected: 3,
            found: 1,
        };
        assert_eq!(err.to_string(), "row 2 has 1 values, expected 3");
    }

    #[test]
    fn test_table_error_duplicate_column() {
        let err = TableError::DuplicateColumn("A".to_string());
        assert!(err.to_string().contains("'A'"));
    }
}
