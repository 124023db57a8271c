use std::fmt::Display;
use std::fs;
use std::path::{
    Path,
    PathBuf,
};
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::{
    ExpressionColumns,
    MetadataColumns,
};
use crate::error::{
    PrepError,
    PrepResult,
};
use crate::merge::{
    BatchMerger,
    Merger,
    StreamingMerger,
};
use crate::tools::aggregate::LabelPolicy;
use crate::tools::split::StratifiedSplitter;
use crate::with_field_fn;

/// Which [`Merger`] implementation a pipeline run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategyKind {
    #[default]
    Batch,
    Streaming,
}

impl FromStr for MergeStrategyKind {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "batch" => Ok(MergeStrategyKind::Batch),
            "streaming" | "stream" => Ok(MergeStrategyKind::Streaming),
            other => {
                Err(PrepError::InvalidConfig(format!(
                    "unknown merge strategy '{}'",
                    other
                )))
            },
        }
    }
}

impl MergeStrategyKind {
    /// `chunk_size` and `queue_len` only matter for the streaming merge.
    pub fn merger(
        &self,
        columns: ExpressionColumns,
        separator: u8,
        chunk_size: usize,
        queue_len: usize,
    ) -> Box<dyn Merger> {
        match self {
            MergeStrategyKind::Batch => Box::new(BatchMerger::new(columns, separator)),
            MergeStrategyKind::Streaming => {
                Box::new(
                    StreamingMerger::new(columns, separator, chunk_size)
                        .with_queue_len(queue_len),
                )
            },
        }
    }
}

impl Display for MergeStrategyKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let str = match self {
            MergeStrategyKind::Batch => "batch",
            MergeStrategyKind::Streaming => "streaming",
        };
        write!(f, "{}", str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Share of rows assigned to the training side, in `(0, 1)`.
    pub train_ratio: f64,
    pub seed:        u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_ratio: 0.8,
            seed:        42,
        }
    }
}

impl SplitConfig {
    with_field_fn!(train_ratio, f64);
    with_field_fn!(seed, u64);

    pub fn splitter(&self) -> StratifiedSplitter {
        StratifiedSplitter::new(self.train_ratio)
    }
}

/// Settings of one pipeline run.
///
/// Every field has a default, so a JSON config file only needs to name the
/// fields it changes:
///
/// ```json
/// {
///   "expression_path": "GSE121239_enriched_expression_data.csv",
///   "metadata_path": "GSE121239_sample_metadata_with_labels.csv",
///   "prefix": "GSE121239",
///   "strategy": "streaming",
///   "split": { "seed": 7 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub expression_path:    PathBuf,
    pub metadata_path:      PathBuf,
    pub output_dir:         PathBuf,
    /// Dataset identifier prepended to every output file name.
    pub prefix:             String,
    pub strategy:           MergeStrategyKind,
    /// Expression rows per chunk of the streaming merge.
    pub chunk_size:         usize,
    /// Parsed chunks the streaming reader may hold ahead of the join.
    pub queue_len:          usize,
    pub split:              SplitConfig,
    pub label_policy:       LabelPolicy,
    pub expression_columns: ExpressionColumns,
    pub metadata_columns:   MetadataColumns,
    /// Field delimiter of every input and output table, as a byte.
    pub separator:          u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            expression_path:    PathBuf::from("enriched_expression_data.csv"),
            metadata_path:      PathBuf::from("sample_metadata_with_labels.csv"),
            output_dir:         PathBuf::from("."),
            prefix:             String::from("dataset"),
            strategy:           MergeStrategyKind::default(),
            chunk_size:         10_000,
            queue_len:          16,
            split:              SplitConfig::default(),
            label_policy:       LabelPolicy::default(),
            expression_columns: ExpressionColumns::default(),
            metadata_columns:   MetadataColumns::default(),
            separator:          b',',
        }
    }
}

impl PipelineConfig {
    with_field_fn!(expression_path, PathBuf);
    with_field_fn!(metadata_path, PathBuf);
    with_field_fn!(output_dir, PathBuf);
    with_field_fn!(prefix, String);
    with_field_fn!(strategy, MergeStrategyKind);
    with_field_fn!(chunk_size, usize);
    with_field_fn!(queue_len, usize);
    with_field_fn!(split, SplitConfig);
    with_field_fn!(label_policy, LabelPolicy);
    with_field_fn!(expression_columns, ExpressionColumns);
    with_field_fn!(metadata_columns, MetadataColumns);
    with_field_fn!(separator, u8);

    /// Reads a config from a JSON file and validates it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PrepResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> PrepResult<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> PrepResult<()> {
        if self.chunk_size == 0 {
            return Err(PrepError::InvalidConfig(
                "chunk size must be positive".into(),
            ));
        }
        if self.queue_len == 0 {
            return Err(PrepError::InvalidConfig(
                "queue length must be positive".into(),
            ));
        }
        let ratio = self.split.train_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(PrepError::InvalidConfig(format!(
                "train ratio must lie in (0, 1), got {}",
                ratio
            )));
        }
        if self.prefix.is_empty() {
            return Err(PrepError::InvalidConfig("prefix must not be empty".into()));
        }
        Ok(())
    }

    /// Builds the configured merge strategy.
    pub fn merger(&self) -> Box<dyn Merger> {
        self.strategy.merger(
            self.expression_columns.clone(),
            self.separator,
            self.chunk_size,
            self.queue_len,
        )
    }

    pub fn output_path(
        &self,
        suffix: &str,
    ) -> PathBuf {
        self.output_dir.join(format!("{}_{}", self.prefix, suffix))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn partial_json_keeps_defaults() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"prefix": "GSE1", "strategy": "streaming", "split": {"seed": 7}}"#,
        )?;

        let config = PipelineConfig::from_json_file(&path)?;
        assert_eq!(config.prefix, "GSE1");
        assert_eq!(config.strategy, MergeStrategyKind::Streaming);
        assert_eq!(config.split.seed, 7);
        assert_eq!(config.split.train_ratio, 0.8);
        assert_eq!(config.chunk_size, 10_000);
        assert_eq!(config.label_policy, LabelPolicy::FirstWins);
        assert_eq!(config.expression_columns.sample, "Sample");
        Ok(())
    }

    #[test]
    fn json_file_roundtrip() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        let config = PipelineConfig::default()
            .with_prefix("GSE121239".into())
            .with_label_policy(LabelPolicy::RequireHomogeneous)
            .with_separator(b'\t');
        config.to_json_file(&path)?;
        assert_eq!(PipelineConfig::from_json_file(&path)?, config);
        Ok(())
    }

    #[rstest]
    #[case::zero_chunk(PipelineConfig::default().with_chunk_size(0))]
    #[case::zero_queue(PipelineConfig::default().with_queue_len(0))]
    #[case::ratio_one(PipelineConfig::default().with_split(SplitConfig::default().with_train_ratio(1.0)))]
    #[case::ratio_zero(PipelineConfig::default().with_split(SplitConfig::default().with_train_ratio(0.0)))]
    #[case::empty_prefix(PipelineConfig::default().with_prefix(String::new()))]
    fn rejects_invalid_settings(#[case] config: PipelineConfig) {
        assert!(matches!(
            config.validate(),
            Err(PrepError::InvalidConfig(_))
        ));
    }

    #[rstest]
    #[case(MergeStrategyKind::Batch, "batch")]
    #[case(MergeStrategyKind::Streaming, "streaming")]
    fn strategy_selects_merger(
        #[case] kind: MergeStrategyKind,
        #[case] name: &str,
    ) {
        let config = PipelineConfig::default().with_strategy(kind);
        assert_eq!(config.merger().name(), name);
        assert_eq!(kind.to_string().parse::<MergeStrategyKind>().unwrap(), kind);
    }

    #[test]
    fn output_names_carry_prefix() {
        let config = PipelineConfig::default()
            .with_prefix("GSE9".into())
            .with_output_dir("out".into());
        assert_eq!(config.output_path("X_train.csv"), PathBuf::from("out/GSE9_X_train.csv"));
    }
}
