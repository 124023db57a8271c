use std::collections::BTreeSet;

use hashbrown::HashSet;
use log::{
    info,
    warn,
};
use polars::prelude::*;

use super::metadata::MetadataTable;
use crate::utils::preview;

const LOG_PREVIEW: usize = 10;

/// Sample keys that did not find a partner on the other side of the join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyReport {
    /// Keys present in the expression table but absent from metadata.
    pub missing_in_metadata:   BTreeSet<String>,
    /// Keys present in metadata but absent from the expression table.
    pub missing_in_expression: BTreeSet<String>,
    pub n_expression_keys:     usize,
    pub n_metadata_keys:       usize,
    /// Expression rows whose sample key is missing.
    pub n_null_keys:           usize,
}

impl KeyReport {
    pub fn matched_keys(&self) -> usize {
        self.n_expression_keys - self.missing_in_metadata.len()
    }

    /// Both tables describe exactly the same samples.
    pub fn is_complete(&self) -> bool {
        self.missing_in_metadata.is_empty() && self.missing_in_expression.is_empty()
    }

    pub fn describe(
        &self,
        limit: usize,
    ) -> String {
        format!(
            "{} of {} expression keys matched {} metadata keys; missing in \
             metadata: {}; missing in expression: {}",
            self.matched_keys(),
            self.n_expression_keys,
            self.n_metadata_keys,
            preview(&self.missing_in_metadata, limit),
            preview(&self.missing_in_expression, limit),
        )
    }

    pub fn log(&self) {
        info!(
            "Sample keys: {} expression, {} metadata, {} matched",
            self.n_expression_keys,
            self.n_metadata_keys,
            self.matched_keys()
        );
        if !self.missing_in_metadata.is_empty() {
            warn!(
                "Samples in expression data but missing in metadata ({}): {}",
                self.missing_in_metadata.len(),
                preview(&self.missing_in_metadata, LOG_PREVIEW)
            );
        }
        if !self.missing_in_expression.is_empty() {
            warn!(
                "Samples in metadata but missing in expression data ({}): {}",
                self.missing_in_expression.len(),
                preview(&self.missing_in_expression, LOG_PREVIEW)
            );
        }
        if self.n_null_keys > 0 {
            warn!(
                "{} expression row(s) have no sample key and were dropped",
                self.n_null_keys
            );
        }
    }
}

/// Accumulates the distinct expression keys seen across one or many chunks.
#[derive(Debug, Default)]
pub(crate) struct KeyCollector {
    keys:        HashSet<String>,
    n_null_keys: usize,
}

impl KeyCollector {
    pub(crate) fn observe(
        &mut self,
        keys: &StringChunked,
    ) {
        for key in keys.into_iter() {
            match key {
                Some(key) if !self.keys.contains(key) => {
                    self.keys.insert(key.to_string());
                },
                Some(_) => {},
                None => self.n_null_keys += 1,
            }
        }
    }

    pub(crate) fn finish(
        self,
        metadata: &MetadataTable,
    ) -> KeyReport {
        let missing_in_metadata = self
            .keys
            .iter()
            .filter(|k| !metadata.contains_key(k))
            .cloned()
            .collect();
        let missing_in_expression = metadata
            .keys()
            .filter(|k| !self.keys.contains(k.as_str()))
            .cloned()
            .collect();

        KeyReport {
            missing_in_metadata,
            missing_in_expression,
            n_expression_keys: self.keys.len(),
            n_metadata_keys: metadata.n_keys(),
            n_null_keys: self.n_null_keys,
        }
    }
}
