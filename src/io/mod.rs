//! Delimited text input and output.
//!
//! Whole tables are loaded with the polars CSV reader, every column as a
//! string so that key columns keep their exact spelling; typed columns are
//! cast later by the stages that need them. [`ChunkedCsvReader`] yields the
//! same string frames in fixed-size chunks for the streaming merge.

mod chunked;
mod write;

use std::path::Path;

use polars::prelude::*;

pub use chunked::{
    records_to_frame,
    ChunkedCsvReader,
};
pub use write::write_table;

use crate::error::{
    PrepError,
    PrepResult,
};

pub fn ensure_exists(path: &Path) -> PrepResult<()> {
    if path.is_file() {
        Ok(())
    }
    else {
        Err(PrepError::MissingInput {
            path: path.to_path_buf(),
        })
    }
}

/// Reads a delimited file with a header row into a `DataFrame` of string
/// columns. Empty cells are read as nulls, quoted (`""`) or not.
pub fn read_table(
    path: &Path,
    separator: u8,
) -> PrepResult<DataFrame> {
    ensure_exists(path)?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(separator)
                .with_missing_is_null(true),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    empty_as_null(df)
}

/// Replaces empty strings with nulls in every string column.
///
/// The polars reader keeps a quoted `""` as an empty string, while the
/// chunked reader sees no difference between quoted and bare empty cells.
pub fn empty_as_null(df: DataFrame) -> PrepResult<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| -> PrepResult<Column> {
            if column.dtype() != &DataType::String {
                return Ok(column.clone());
            }
            let values: StringChunked = column
                .str()?
                .into_iter()
                .map(|cell| cell.filter(|cell| !cell.is_empty()))
                .collect();
            Ok(values.with_name(column.name().clone()).into_column())
        })
        .collect::<PrepResult<Vec<Column>>>()?;
    Ok(DataFrame::new(columns)?)
}
