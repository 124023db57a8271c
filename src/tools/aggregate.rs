use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use log::{
    info,
    warn,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::{
    GeneAggregateRow,
    Label,
    MergedRow,
};
use crate::error::{
    PrepError,
    PrepResult,
};
use crate::utils::preview;

/// How the label of a gene is chosen when its probe rows disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelPolicy {
    /// Take the label of the first row of the gene in table order. Genes
    /// with conflicting labels are counted and reported as a warning.
    #[default]
    FirstWins,
    /// Fail with [`PrepError::HeterogeneousLabel`] as soon as a gene carries
    /// both labels.
    RequireHomogeneous,
}

impl FromStr for LabelPolicy {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first-wins" | "first" => Ok(LabelPolicy::FirstWins),
            "require-homogeneous" | "homogeneous" => {
                Ok(LabelPolicy::RequireHomogeneous)
            },
            other => {
                Err(PrepError::InvalidConfig(format!(
                    "unknown label policy '{}'",
                    other
                )))
            },
        }
    }
}

impl Display for LabelPolicy {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let str = match self {
            LabelPolicy::FirstWins => "first-wins",
            LabelPolicy::RequireHomogeneous => "require-homogeneous",
        };
        write!(f, "{}", str)
    }
}

/// Counts describing one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    pub n_input:          usize,
    pub n_genes:          usize,
    /// Rows without a gene symbol; they belong to no group.
    pub n_missing_symbol: usize,
    /// Rows without value or label, ignored by the mean.
    pub n_skipped:        usize,
    /// Genes whose rows carry both labels, sorted.
    pub heterogeneous:    Vec<String>,
}

#[derive(Debug, Default)]
struct GeneAccumulator {
    sum:         f64,
    count:       usize,
    gene_title:  Option<String>,
    entrez_id:   Option<String>,
    label:       Option<Label>,
    labels_seen: [bool; 2],
}

impl GeneAccumulator {
    fn push(
        &mut self,
        row: &MergedRow,
        value: f64,
        label: Label,
    ) {
        self.sum += value;
        self.count += 1;
        if self.gene_title.is_none() {
            self.gene_title = row.gene_title.clone();
        }
        if self.entrez_id.is_none() {
            self.entrez_id = row.entrez_id.clone();
        }
        if self.label.is_none() {
            self.label = Some(label);
        }
        self.labels_seen[label as usize] = true;
    }

    fn is_heterogeneous(&self) -> bool {
        self.labels_seen[0] && self.labels_seen[1]
    }
}

/// Collapses probe rows into one row per gene symbol.
///
/// `MeanValue` is the arithmetic mean over the gene's rows. Title and Entrez
/// id are the first non-missing values in table order, the label follows the
/// configured [`LabelPolicy`]. Output rows are sorted by gene symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneAggregator {
    policy: LabelPolicy,
}

impl GeneAggregator {
    pub fn new(policy: LabelPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> LabelPolicy {
        self.policy
    }

    pub fn aggregate(
        &self,
        rows: &[MergedRow],
    ) -> PrepResult<(Vec<GeneAggregateRow>, AggregateReport)> {
        let mut groups: BTreeMap<&str, GeneAccumulator> = BTreeMap::new();
        let mut report = AggregateReport {
            n_input: rows.len(),
            ..Default::default()
        };

        for row in rows {
            let Some(symbol) = row.gene_symbol.as_deref()
            else {
                report.n_missing_symbol += 1;
                continue;
            };
            let (Some(value), Some(label)) = (row.value, row.label)
            else {
                report.n_skipped += 1;
                continue;
            };
            groups.entry(symbol).or_default().push(row, value, label);
        }

        report.heterogeneous = groups
            .iter()
            .filter(|(_, acc)| acc.is_heterogeneous())
            .map(|(symbol, _)| symbol.to_string())
            .collect();

        if let Some(gene) = report.heterogeneous.first() {
            match self.policy {
                LabelPolicy::RequireHomogeneous => {
                    return Err(PrepError::HeterogeneousLabel {
                        gene:   gene.clone(),
                        labels: vec![0, 1],
                    });
                },
                LabelPolicy::FirstWins => {
                    warn!(
                        "{} gene(s) span rows with both labels, keeping the \
                         first label: {}",
                        report.heterogeneous.len(),
                        preview(&report.heterogeneous, 10)
                    );
                },
            }
        }
        if report.n_missing_symbol > 0 {
            warn!(
                "{} row(s) without gene symbol excluded from aggregation",
                report.n_missing_symbol
            );
        }

        let aggregated: Vec<GeneAggregateRow> = groups
            .into_iter()
            .filter_map(|(symbol, acc)| {
                Some(GeneAggregateRow {
                    gene_symbol: symbol.to_string(),
                    mean_value:  acc.sum / acc.count as f64,
                    label:       acc.label?,
                    gene_title:  acc.gene_title,
                    entrez_id:   acc.entrez_id,
                })
            })
            .collect();
        report.n_genes = aggregated.len();

        info!(
            "Aggregated {} rows into {} genes",
            report.n_input, report.n_genes
        );
        Ok((aggregated, report))
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    use super::*;

    fn row(
        sample: &str,
        symbol: Option<&str>,
        value: f64,
        label: Label,
    ) -> MergedRow {
        MergedRow {
            sample: Some(sample.into()),
            gene_symbol: symbol.map(str::to_string),
            value: Some(value),
            label: Some(label),
            ..Default::default()
        }
    }

    #[test]
    fn first_row_label_wins_for_mixed_gene() -> anyhow::Result<()> {
        let rows = vec![row("GSM1", Some("A"), 10.0, 0), row("GSM2", Some("A"), 20.0, 1)];
        let (genes, report) = GeneAggregator::new(LabelPolicy::FirstWins).aggregate(&rows)?;

        assert_eq!(genes.len(), 1);
        assert_eq!(genes[0].gene_symbol, "A");
        assert_approx_eq!(genes[0].mean_value, 15.0);
        assert_eq!(genes[0].label, 0);
        assert_eq!(report.heterogeneous, vec!["A".to_string()]);
        Ok(())
    }

    #[test]
    fn homogeneous_policy_rejects_mixed_gene() {
        let rows = vec![
            row("GSM1", Some("B"), 1.0, 1),
            row("GSM1", Some("A"), 10.0, 0),
            row("GSM2", Some("A"), 20.0, 1),
        ];
        let err = GeneAggregator::new(LabelPolicy::RequireHomogeneous)
            .aggregate(&rows)
            .unwrap_err();
        match err {
            PrepError::HeterogeneousLabel { gene, labels } => {
                assert_eq!(gene, "A");
                assert_eq!(labels, vec![0, 1]);
            },
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn homogeneous_policy_accepts_consistent_genes() -> anyhow::Result<()> {
        let rows = vec![
            row("GSM1", Some("A"), 1.0, 1),
            row("GSM2", Some("A"), 3.0, 1),
            row("GSM3", Some("B"), 5.0, 0),
        ];
        let (genes, report) =
            GeneAggregator::new(LabelPolicy::RequireHomogeneous).aggregate(&rows)?;
        assert_eq!(genes.len(), 2);
        assert!(report.heterogeneous.is_empty());
        assert_approx_eq!(genes[0].mean_value, 2.0);
        Ok(())
    }

    #[test]
    fn output_is_sorted_and_unique() -> anyhow::Result<()> {
        let rows = vec![
            row("GSM1", Some("TP53"), 1.0, 0),
            row("GSM1", Some("ACTB"), 2.0, 0),
            row("GSM2", Some("TP53"), 3.0, 0),
            row("GSM2", Some("GAPDH"), 4.0, 0),
            row("GSM3", Some("ACTB"), 6.0, 0),
        ];
        let (genes, report) = GeneAggregator::default().aggregate(&rows)?;
        let symbols: Vec<&str> = genes.iter().map(|g| g.gene_symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ACTB", "GAPDH", "TP53"]);
        assert_eq!(report.n_genes, 3);
        assert_approx_eq!(genes[0].mean_value, 4.0);
        assert_approx_eq!(genes[2].mean_value, 2.0);
        Ok(())
    }

    #[test]
    fn first_non_missing_title_and_entrez() -> anyhow::Result<()> {
        let mut first = row("GSM1", Some("A"), 1.0, 0);
        first.entrez_id = Some("7157".into());
        let mut second = row("GSM2", Some("A"), 2.0, 0);
        second.gene_title = Some("tumor protein p53".into());
        second.entrez_id = Some("9999".into());

        let (genes, _) = GeneAggregator::default().aggregate(&[first, second])?;
        assert_eq!(genes[0].gene_title.as_deref(), Some("tumor protein p53"));
        assert_eq!(genes[0].entrez_id.as_deref(), Some("7157"));
        Ok(())
    }

    #[test]
    fn rows_without_symbol_are_excluded() -> anyhow::Result<()> {
        let rows = vec![row("GSM1", None, 100.0, 1), row("GSM1", Some("A"), 1.0, 1)];
        let (genes, report) = GeneAggregator::default().aggregate(&rows)?;
        assert_eq!(genes.len(), 1);
        assert_eq!(report.n_missing_symbol, 1);
        assert_approx_eq!(genes[0].mean_value, 1.0);
        Ok(())
    }

    #[rstest]
    #[case("first-wins", LabelPolicy::FirstWins)]
    #[case("First", LabelPolicy::FirstWins)]
    #[case("require-homogeneous", LabelPolicy::RequireHomogeneous)]
    fn parses_policy_names(
        #[case] name: &str,
        #[case] expected: LabelPolicy,
    ) {
        assert_eq!(name.parse::<LabelPolicy>().unwrap(), expected);
        assert_eq!(
            expected.to_string().parse::<LabelPolicy>().unwrap(),
            expected
        );
    }
}
