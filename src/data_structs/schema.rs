use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    PrepError,
    PrepResult,
};
use crate::with_field_fn;

/// Name of the z-scored feature column in the gene table and feature files.
pub const NORMALIZED_VALUE_COL: &str = "NormalizedValue";

/// Appended to a metadata column name that the merged table already uses for
/// an expression column.
pub const CLASH_SUFFIX: &str = "_right";

/// Column names of the enriched expression table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionColumns {
    pub value:       String,
    pub sample:      String,
    pub gene_symbol: String,
    pub gene_title:  String,
    pub entrez_id:   String,
    pub probe_id:    String,
}

impl Default for ExpressionColumns {
    fn default() -> Self {
        Self {
            value:       "Value".into(),
            sample:      "Sample".into(),
            gene_symbol: "Gene Symbol".into(),
            gene_title:  "Gene Title".into(),
            entrez_id:   "ENTREZ_GENE_ID".into(),
            probe_id:    "ID_REF".into(),
        }
    }
}

impl ExpressionColumns {
    pub const TABLE: &'static str = "expression";

    with_field_fn!(value, String);
    with_field_fn!(sample, String);
    with_field_fn!(gene_symbol, String);
    with_field_fn!(gene_title, String);
    with_field_fn!(entrez_id, String);
    with_field_fn!(probe_id, String);

    /// Columns without which the pipeline cannot run.
    pub fn required(&self) -> [&str; 3] {
        [
            self.value.as_str(),
            self.sample.as_str(),
            self.gene_symbol.as_str(),
        ]
    }

    pub fn check_frame(
        &self,
        df: &DataFrame,
    ) -> PrepResult<()> {
        check_columns(df, &self.required(), Self::TABLE)
    }

    pub fn check_header(
        &self,
        header: &[String],
    ) -> PrepResult<()> {
        for column in self.required() {
            if !header.iter().any(|h| h == column) {
                return Err(PrepError::missing_column(column, Self::TABLE));
            }
        }
        Ok(())
    }
}

/// Column names of the sample metadata table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataColumns {
    pub accession: String,
    pub label:     String,
}

impl Default for MetadataColumns {
    fn default() -> Self {
        Self {
            accession: "geo_accession".into(),
            label:     "Label".into(),
        }
    }
}

impl MetadataColumns {
    pub const TABLE: &'static str = "metadata";

    with_field_fn!(accession, String);
    with_field_fn!(label, String);

    pub fn required(&self) -> [&str; 2] {
        [self.accession.as_str(), self.label.as_str()]
    }

    /// Name of the label column in a merged frame: suffixed with
    /// [`CLASH_SUFFIX`] when the expression table has a column of the same
    /// name.
    pub fn merged_label(
        &self,
        df: &DataFrame,
    ) -> String {
        let suffixed = format!("{}{}", self.label, CLASH_SUFFIX);
        if df.get_column_index(&suffixed).is_some() {
            suffixed
        }
        else {
            self.label.clone()
        }
    }

    pub fn check_frame(
        &self,
        df: &DataFrame,
    ) -> PrepResult<()> {
        check_columns(df, &self.required(), Self::TABLE)
    }
}

pub(crate) fn check_columns(
    df: &DataFrame,
    columns: &[&str],
    table: &'static str,
) -> PrepResult<()> {
    for column in columns {
        if df.get_column_index(column).is_none() {
            return Err(PrepError::missing_column(column, table));
        }
    }
    Ok(())
}
