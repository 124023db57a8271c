use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

use crate::data_structs::Label;
use crate::merge::KeyReport;

pub type PrepResult<T> = Result<T, PrepError>;

/// Every failure a pipeline run can end with. All of them are terminal: the
/// run stops and nothing further is written.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("input file not found: {}", .path.display())]
    MissingInput { path: PathBuf },

    #[error("required column '{column}' is missing from the {table} table")]
    MissingColumn {
        column: String,
        table:  &'static str,
    },

    #[error("merge produced no rows; {}", .report.describe(10))]
    EmptyMerge { report: KeyReport },

    #[error(
        "cannot normalize {n_values} values: population std is {std} (mean {mean})"
    )]
    DegenerateStatistics {
        n_values: usize,
        mean:     f64,
        std:      f64,
    },

    #[error(
        "stratified split needs two label classes, found {}: {:?}",
        .found.len(),
        .found
    )]
    InsufficientLabelDiversity { found: Vec<Label> },

    #[error(
        "label class {label} has only {count} member(s); every class needs at least {required}"
    )]
    ClassTooSmall {
        label:    Label,
        count:    usize,
        required: usize,
    },

    #[error("gene '{gene}' spans rows with different labels {labels:?}")]
    HeterogeneousLabel { gene: String, labels: Vec<Label> },

    #[error("label value '{value}' is not binary (expected 0 or 1)")]
    InvalidLabel { value: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("expression reader stopped unexpectedly: {0}")]
    ReaderDisconnected(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PrepError {
    pub(crate) fn missing_column(
        column: &str,
        table: &'static str,
    ) -> Self {
        PrepError::MissingColumn {
            column: column.to_string(),
            table,
        }
    }
}
