use std::path::Path;

use hashbrown::HashMap;
use log::{
    info,
    warn,
};
use polars::prelude::*;

use super::key::canonicalize_column;
use crate::data_structs::MetadataColumns;
use crate::error::PrepResult;
use crate::io::read_table;

/// The fully loaded sample metadata table with canonical accession keys and
/// a key → row lookup used by both merge strategies.
#[derive(Debug, Clone)]
pub struct MetadataTable {
    frame:       DataFrame,
    columns:     MetadataColumns,
    index:       HashMap<String, Vec<IdxSize>>,
    n_null_keys: usize,
}

impl MetadataTable {
    pub fn read(
        path: &Path,
        columns: &MetadataColumns,
        separator: u8,
    ) -> PrepResult<Self> {
        let frame = read_table(path, separator)?;
        info!(
            "Loaded metadata table {} ({} rows)",
            path.display(),
            frame.height()
        );
        Self::try_from_frame(frame, columns)
    }

    pub fn try_from_frame(
        mut frame: DataFrame,
        columns: &MetadataColumns,
    ) -> PrepResult<Self> {
        columns.check_frame(&frame)?;
        canonicalize_column(&mut frame, &columns.accession)?;

        let mut index: HashMap<String, Vec<IdxSize>> = HashMap::new();
        let mut n_null_keys = 0;
        for (row, key) in frame
            .column(&columns.accession)?
            .str()?
            .into_iter()
            .enumerate()
        {
            match key {
                Some(key) => {
                    index
                        .entry(key.to_string())
                        .or_default()
                        .push(row as IdxSize)
                },
                None => n_null_keys += 1,
            }
        }

        let n_duplicated = index.values().filter(|rows| rows.len() > 1).count();
        if n_duplicated > 0 {
            warn!(
                "{} accession(s) occur more than once in metadata; each \
                 occurrence yields its own merged row",
                n_duplicated
            );
        }
        if n_null_keys > 0 {
            warn!("{} metadata row(s) have no accession and never match", n_null_keys);
        }

        Ok(Self {
            frame,
            columns: columns.clone(),
            index,
            n_null_keys,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn columns(&self) -> &MetadataColumns {
        &self.columns
    }

    /// Metadata rows carrying `key`, in table order.
    pub fn rows_for(
        &self,
        key: &str,
    ) -> Option<&[IdxSize]> {
        self.index.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(
        &self,
        key: &str,
    ) -> bool {
        self.index.contains_key(key)
    }

    /// Distinct canonical accessions.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.index.keys()
    }

    pub fn n_keys(&self) -> usize {
        self.index.len()
    }

    pub fn n_null_keys(&self) -> usize {
        self.n_null_keys
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }
}
