use polars::prelude::*;

use super::schema::{
    ExpressionColumns,
    MetadataColumns,
    NORMALIZED_VALUE_COL,
};
use super::typedef::{
    parse_label,
    Label,
};
use crate::error::{
    PrepError,
    PrepResult,
};

/// One merged probe measurement: the expression fields plus the sample
/// label. Every field may be missing at this point; the filter decides what
/// survives.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedRow {
    pub probe_id:    Option<String>,
    pub sample:      Option<String>,
    pub value:       Option<f64>,
    pub gene_symbol: Option<String>,
    pub gene_title:  Option<String>,
    pub entrez_id:   Option<String>,
    pub label:       Option<Label>,
}

impl MergedRow {
    /// Extracts typed rows from a merged `DataFrame`.
    ///
    /// `Value` is cast to `f64` (unparseable cells become missing). `Label`
    /// is parsed with [`parse_label`] from the metadata label column, which
    /// carries the join suffix when the expression table has its own.
    /// `Gene Title`, `ENTREZ_GENE_ID` and the probe id column are optional
    /// and read as missing when absent.
    pub fn from_frame(
        df: &DataFrame,
        expression: &ExpressionColumns,
        metadata: &MetadataColumns,
    ) -> PrepResult<Vec<MergedRow>> {
        let values = df
            .column(&expression.value)
            .map_err(|_| {
                PrepError::missing_column(&expression.value, "merged")
            })?
            .cast(&DataType::Float64)?;
        let values = values.f64()?;

        let samples = required_strings(df, &expression.sample)?;
        let symbols = required_strings(df, &expression.gene_symbol)?;
        let labels = required_strings(df, &metadata.merged_label(df))?;
        let titles = optional_strings(df, &expression.gene_title)?;
        let entrez = optional_strings(df, &expression.entrez_id)?;
        let probes = optional_strings(df, &expression.probe_id)?;

        let mut rows = Vec::with_capacity(df.height());
        for (idx, value) in values.into_iter().enumerate() {
            let label = match labels[idx].as_deref() {
                Some(raw) => parse_label(raw)?,
                None => None,
            };
            rows.push(MergedRow {
                probe_id: probes[idx].clone(),
                sample: samples[idx].clone(),
                value: value.filter(|v| !v.is_nan()),
                gene_symbol: symbols[idx].clone(),
                gene_title: titles[idx].clone(),
                entrez_id: entrez[idx].clone(),
                label,
            });
        }
        Ok(rows)
    }
}

fn required_strings(
    df: &DataFrame,
    name: &str,
) -> PrepResult<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| PrepError::missing_column(name, "merged"))?
        .cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn optional_strings(
    df: &DataFrame,
    name: &str,
) -> PrepResult<Vec<Option<String>>> {
    if df.get_column_index(name).is_some() {
        required_strings(df, name)
    }
    else {
        Ok(vec![None; df.height()])
    }
}

/// One row per gene after probe aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneAggregateRow {
    pub gene_symbol: String,
    pub mean_value:  f64,
    pub gene_title:  Option<String>,
    pub entrez_id:   Option<String>,
    pub label:       Label,
}

/// A gene row together with its z-scored mean value.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub gene:             GeneAggregateRow,
    pub normalized_value: f64,
}

impl NormalizedRow {
    pub fn label(&self) -> Label {
        self.gene.label
    }

    /// Builds the gene table: the aggregate fields under the input column
    /// names plus [`NORMALIZED_VALUE_COL`].
    pub fn to_frame(
        rows: &[NormalizedRow],
        expression: &ExpressionColumns,
        metadata: &MetadataColumns,
    ) -> PrepResult<DataFrame> {
        let symbols: StringChunked = rows
            .iter()
            .map(|r| Some(r.gene.gene_symbol.as_str()))
            .collect();
        let titles: StringChunked =
            rows.iter().map(|r| r.gene.gene_title.as_deref()).collect();
        let entrez: StringChunked =
            rows.iter().map(|r| r.gene.entrez_id.as_deref()).collect();
        let means: Vec<f64> = rows.iter().map(|r| r.gene.mean_value).collect();
        let labels: Vec<i32> = rows.iter().map(|r| r.gene.label as i32).collect();
        let normalized: Vec<f64> =
            rows.iter().map(|r| r.normalized_value).collect();

        let df = DataFrame::new(vec![
            symbols
                .with_name(expression.gene_symbol.as_str().into())
                .into_column(),
            Column::new(expression.value.as_str().into(), means),
            titles
                .with_name(expression.gene_title.as_str().into())
                .into_column(),
            entrez
                .with_name(expression.entrez_id.as_str().into())
                .into_column(),
            Column::new(metadata.label.as_str().into(), labels),
            Column::new(NORMALIZED_VALUE_COL.into(), normalized),
        ])?;
        Ok(df)
    }
}
