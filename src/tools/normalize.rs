use log::info;
use statrs::statistics::Statistics;

use crate::data_structs::{
    GeneAggregateRow,
    NormalizedRow,
};
use crate::error::{
    PrepError,
    PrepResult,
};

/// Population z-score fitted on a set of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScore {
    pub mean: f64,
    pub std:  f64,
}

impl ZScore {
    /// Fits the population mean and standard deviation of `values`.
    ///
    /// Fails with [`PrepError::DegenerateStatistics`] on an empty input or
    /// when the standard deviation is zero or not finite.
    pub fn fit(values: &[f64]) -> PrepResult<Self> {
        let mean = values.iter().mean();
        let std = values.iter().population_std_dev();
        if values.is_empty() || !std.is_finite() || std <= 0.0 {
            return Err(PrepError::DegenerateStatistics {
                n_values: values.len(),
                mean,
                std,
            });
        }
        Ok(Self { mean, std })
    }

    pub fn transform(
        &self,
        value: f64,
    ) -> f64 {
        (value - self.mean) / self.std
    }
}

/// Adds the z-scored `MeanValue` to every gene row.
pub fn normalize(rows: Vec<GeneAggregateRow>) -> PrepResult<(Vec<NormalizedRow>, ZScore)> {
    let values: Vec<f64> = rows.iter().map(|r| r.mean_value).collect();
    let scaler = ZScore::fit(&values)?;
    info!(
        "Normalizing {} genes (mean {:.4}, std {:.4})",
        rows.len(),
        scaler.mean,
        scaler.std
    );

    let normalized = rows
        .into_iter()
        .map(|gene| {
            NormalizedRow {
                normalized_value: scaler.transform(gene.mean_value),
                gene,
            }
        })
        .collect();
    Ok((normalized, scaler))
}
