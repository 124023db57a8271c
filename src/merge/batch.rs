use std::path::Path;

use log::info;
use polars::prelude::*;

use super::key::canonicalize_column;
use super::metadata::MetadataTable;
use super::report::KeyCollector;
use super::{
    join_frame,
    MergeOutcome,
    Merger,
};
use crate::data_structs::ExpressionColumns;
use crate::error::PrepResult;
use crate::io::read_table;

/// Loads the complete expression table into memory and joins it at once.
#[derive(Debug, Clone)]
pub struct BatchMerger {
    columns:   ExpressionColumns,
    separator: u8,
}

impl Default for BatchMerger {
    fn default() -> Self {
        Self::new(ExpressionColumns::default(), b',')
    }
}

impl BatchMerger {
    pub fn new(
        columns: ExpressionColumns,
        separator: u8,
    ) -> Self {
        Self { columns, separator }
    }

    /// Joins an already loaded expression table.
    pub fn merge_frame(
        &self,
        mut expression: DataFrame,
        metadata: &MetadataTable,
    ) -> PrepResult<MergeOutcome> {
        self.columns.check_frame(&expression)?;
        canonicalize_column(&mut expression, &self.columns.sample)?;

        let mut collector = KeyCollector::default();
        collector.observe(expression.column(&self.columns.sample)?.str()?);
        let report = collector.finish(metadata);
        report.log();

        let n_input_rows = expression.height();
        let joined = join_frame(&expression, &self.columns.sample, metadata)?;
        MergeOutcome::try_new(joined, report, n_input_rows, 1)
    }
}

impl Merger for BatchMerger {
    fn merge(
        &self,
        expression: &Path,
        metadata: &MetadataTable,
    ) -> PrepResult<MergeOutcome> {
        let frame = read_table(expression, self.separator)?;
        info!(
            "Loaded expression table {} ({} rows)",
            expression.display(),
            frame.height()
        );
        self.merge_frame(frame, metadata)
    }

    fn name(&self) -> &'static str {
        "batch"
    }
}
