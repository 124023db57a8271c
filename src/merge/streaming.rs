use std::path::Path;

use log::{
    debug,
    info,
};
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
use crate::error::{
    PrepError,
    PrepResult,
};
use crate::io::ChunkedCsvReader;
use crate::with_field_fn;

/// Joins the expression table chunk by chunk.
///
/// Chunks of `chunk_size` rows are parsed on a background thread and handed
/// over through a channel holding at most `queue_len` chunks. Joined chunks
/// are concatenated in read order, so the result equals the one of
/// [`super::BatchMerger`].
#[derive(Debug, Clone)]
pub struct StreamingMerger {
    columns:    ExpressionColumns,
    separator:  u8,
    chunk_size: usize,
    queue_len:  usize,
}

impl Default for StreamingMerger {
    fn default() -> Self {
        Self {
            columns:    ExpressionColumns::default(),
            separator:  b',',
            chunk_size: 10_000,
            queue_len:  16,
        }
    }
}

impl StreamingMerger {
    with_field_fn!(columns, ExpressionColumns);
    with_field_fn!(separator, u8);
    with_field_fn!(chunk_size, usize);
    with_field_fn!(queue_len, usize);

    pub fn new(
        columns: ExpressionColumns,
        separator: u8,
        chunk_size: usize,
    ) -> Self {
        Self {
            columns,
            separator,
            chunk_size,
            ..Default::default()
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Merger for StreamingMerger {
    fn merge(
        &self,
        expression: &Path,
        metadata: &MetadataTable,
    ) -> PrepResult<MergeOutcome> {
        if self.chunk_size == 0 || self.queue_len == 0 {
            return Err(PrepError::InvalidConfig(
                "streaming merge needs chunk size and queue length >= 1".into(),
            ));
        }

        let reader = ChunkedCsvReader::try_new(
            expression,
            self.separator,
            self.chunk_size,
            self.queue_len,
        )?;
        self.columns.check_header(reader.header())?;
        info!(
            "Streaming expression table {} in chunks of {} rows",
            expression.display(),
            self.chunk_size
        );

        let mut collector = KeyCollector::default();
        let mut merged: Option<DataFrame> = None;
        let mut n_input_rows = 0;
        let mut n_chunks = 0;

        for chunk in reader {
            let mut chunk = chunk?;
            n_input_rows += chunk.height();
            n_chunks += 1;

            canonicalize_column(&mut chunk, &self.columns.sample)?;
            collector.observe(chunk.column(&self.columns.sample)?.str()?);

            let joined = join_frame(&chunk, &self.columns.sample, metadata)?;
            debug!(
                "Chunk {}: {} rows in, {} rows joined",
                n_chunks,
                chunk.height(),
                joined.height()
            );
            match merged.as_mut() {
                Some(acc) => {
                    acc.vstack_mut(&joined)?;
                },
                None => merged = Some(joined),
            }
        }

        let report = collector.finish(metadata);
        report.log();

        let frame = merged.unwrap_or_else(DataFrame::empty);
        MergeOutcome::try_new(frame, report, n_input_rows, n_chunks)
    }

    fn name(&self) -> &'static str {
        "streaming"
    }
}
