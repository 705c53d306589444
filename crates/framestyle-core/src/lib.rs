//! Core types for framestyle.
//!
//! This crate provides the data model consumed by the styling pipeline:
//! - Color representation: [`Color`], [`ColorSpec`] and a named-color table
//! - Tabular data: [`TableModel`], [`RowIndex`], [`Value`]
//! - Style fragments: [`StyleFragment`], [`Modifiers`], [`Justify`]
//! - Directives: [`StyleDirective`], [`Selector`], [`SourceRank`]
//! - The external style object: [`ExternalStyle`]

mod color;
mod directive;
mod error;
pub mod named;
mod style;
mod table;
mod value;

pub use color::{Color, ColorSpec};
pub use directive::{
    CellRef, CssProperty, ExternalEntry, ExternalStyle, Selector, SourceRank, StyleDirective,
    Target,
};
pub use error::{ColorParseError, StyleError, TableError};
pub use style::{Justify, Modifiers, StyleFragment};
pub use table::{RowIndex, TableModel};
pub use value::Value;
