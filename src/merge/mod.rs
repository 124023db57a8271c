//! Joining expression rows to sample metadata.
//!
//! Sample keys of both tables are first brought to canonical form
//! ([`canonical_key`]); then every expression row is paired with every
//! metadata row carrying the same key (inner join). Rows keep the order of
//! the expression table, and for duplicated accessions the order of the
//! metadata table.
//!
//! Two strategies implement [`Merger`]:
//!
//! * [`BatchMerger`] loads the whole expression table with polars and joins
//!   it at once.
//! * [`StreamingMerger`] reads the expression table in fixed-size chunks on a
//!   background thread and joins each chunk as it arrives, so only a bounded
//!   number of raw chunks is held in memory at a time.
//!
//! Both produce the same `DataFrame` for the same inputs. An empty result is
//! reported as [`PrepError::EmptyMerge`] together with the [`KeyReport`].

mod batch;
mod key;
mod metadata;
mod report;
mod streaming;

use std::path::Path;

use log::{
    debug,
    info,
};
use polars::prelude::*;
use rayon::prelude::*;

pub use batch::BatchMerger;
pub use key::{
    canonical_key,
    canonicalize_column,
    canonicalize_opt,
};
pub use metadata::MetadataTable;
pub use report::KeyReport;
pub use streaming::StreamingMerger;

use crate::data_structs::CLASH_SUFFIX;
use crate::error::{
    PrepError,
    PrepResult,
};
use crate::utils::THREAD_POOL;

/// Shared contract of the merge strategies.
pub trait Merger {
    /// Joins the expression table at `expression` against `metadata`.
    fn merge(
        &self,
        expression: &Path,
        metadata: &MetadataTable,
    ) -> PrepResult<MergeOutcome>;

    fn name(&self) -> &'static str;
}

/// Result of a successful merge.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Joined rows: all expression columns followed by all metadata columns.
    pub frame:        DataFrame,
    pub report:       KeyReport,
    /// Expression rows read before joining.
    pub n_input_rows: usize,
    pub n_chunks:     usize,
}

impl MergeOutcome {
    /// Fails with [`PrepError::EmptyMerge`] when no row survived the join.
    pub(crate) fn try_new(
        frame: DataFrame,
        report: KeyReport,
        n_input_rows: usize,
        n_chunks: usize,
    ) -> PrepResult<Self> {
        if frame.height() == 0 {
            return Err(PrepError::EmptyMerge { report });
        }
        info!(
            "Merged {} expression rows into {} rows ({} columns)",
            n_input_rows,
            frame.height(),
            frame.width()
        );
        Ok(Self {
            frame,
            report,
            n_input_rows,
            n_chunks,
        })
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }
}

/// Inner-joins `left` (with canonical keys in `key_column`) against
/// `metadata`. Output rows follow the order of `left`; a left row matching
/// several metadata rows is repeated once per match, in metadata order.
/// Metadata columns whose name already exists in `left` get
/// [`CLASH_SUFFIX`] appended.
pub fn join_frame(
    left: &DataFrame,
    key_column: &str,
    metadata: &MetadataTable,
) -> PrepResult<DataFrame> {
    let keys: Vec<Option<&str>> = left.column(key_column)?.str()?.into_iter().collect();

    let (left_idx, right_idx): (Vec<IdxSize>, Vec<IdxSize>) = THREAD_POOL.install(|| {
        keys.par_iter()
            .enumerate()
            .flat_map_iter(|(row, key)| {
                let matches: &[IdxSize] = (*key)
                    .and_then(|key| metadata.rows_for(key))
                    .unwrap_or(&[]);
                matches
                    .iter()
                    .map(move |&meta_row| (row as IdxSize, meta_row))
            })
            .unzip()
    });

    let joined_left = left.take(&IdxCa::from_vec("left_idx".into(), left_idx))?;
    let joined_right = metadata
        .frame()
        .take(&IdxCa::from_vec("right_idx".into(), right_idx))?;

    let right_columns: Vec<Column> = joined_right
        .get_columns()
        .iter()
        .map(|column| {
            let mut column = column.clone();
            if left.get_column_index(column.name()).is_some() {
                let suffixed = format!("{}{}", column.name(), CLASH_SUFFIX);
                debug!(
                    "Column '{}' exists in both tables, metadata copy renamed to '{}'",
                    column.name(),
                    suffixed
                );
                column.rename(suffixed.into());
            }
            column
        })
        .collect();

    Ok(joined_left.hstack(&right_columns)?)
}
