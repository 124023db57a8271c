//! Core data structures of the preprocessing pipeline.
//!
//! - [`schema`]: column name mappings of the two input tables
//!   ([`ExpressionColumns`], [`MetadataColumns`]) and the fixed names of the
//!   generated columns.
//! - [`rows`]: typed rows the row-level stages operate on: [`MergedRow`]
//!   extracted from the merged `DataFrame`, [`GeneAggregateRow`] and
//!   [`NormalizedRow`].
//! - [`typedef`]: the binary [`Label`] type and its parsing rules.

pub mod rows;
pub mod schema;
pub mod typedef;

pub use rows::{
    GeneAggregateRow,
    MergedRow,
    NormalizedRow,
};
pub use schema::{
    ExpressionColumns,
    CLASH_SUFFIX,
    MetadataColumns,
    NORMALIZED_VALUE_COL,
};
pub use typedef::{
    parse_label,
    Label,
};
