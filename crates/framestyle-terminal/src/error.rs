//! Error types for framestyle-terminal.

use framestyle_core::{StyleError, TableError};
use thiserror::Error;

/// Errors that abort a render call. No partial table is returned.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An explicit or external style could not be converted.
    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    /// The table model is malformed.
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// The layout cannot satisfy the width constraints.
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// A gradient named a colormap that does not exist.
    #[error("Unknown colormap '{name}' (available: {available})")]
    UnknownColormap { name: String, available: String },

    /// An explicit option named a column the table does not have.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// An explicit option named a row label the table does not have.
    #[error("Unknown row '{0}'")]
    UnknownRow(String),

    /// A cell format string could not be parsed.
    #[error("Invalid format '{format}': {reason}")]
    InvalidFormat { format: String, reason: String },

    /// Render options could not be loaded.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Layout failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Even with every column at its minimum width the table is too wide.
    #[error("table needs {required} columns but only {available} are available")]
    CannotFit { required: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use framestyle_core::ColorParseError;

    #[test]
    fn test_render_error_from_style() {
        let style = StyleError::InvalidColor {
            input: "#zz".into(),
            source: ColorParseError::InvalidHex,
        };
        let err: RenderError = style.into();
        assert!(matches!(err, RenderError::Style(_)));
        assert!(err.to_string().contains("Style error"));
        assert!(err.to_string().contains("#zz"));
    }

    #[test]
    fn test_render_error_from_layout() {
        let err: RenderError = LayoutError::CannotFit {
            required: 120,
            available: 40,
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("Layout error"));
        assert!(msg.contains("120"));
        assert!(msg.contains("40"));
    }

    #[test]
    fn test_render_error_from_table() {
        let err: RenderError = TableError::DuplicateColumn("A".into()).into();
        assert!(matches!(err, RenderError::Table(_)));
    }

    #[test]
    fn test_unknown_colormap_lists_available() {
        let err = RenderError::UnknownColormap {
            name: "viridiss".into(),
            available: "viridis, plasma".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("viridiss"));
        assert!(msg.contains("plasma"));
    }

    #[test]
    fn test_invalid_format_display() {
        let err = RenderError::InvalidFormat {
            format: "{:.x}".into(),
            reason: "bad precision".into(),
        };
        assert_eq!(err.to_string(), "Invalid format '{:.x}': bad precision");
    }
}
