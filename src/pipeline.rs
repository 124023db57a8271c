//! End-to-end orchestration.
//!
//! [`Pipeline::process`] runs every stage in memory and writes nothing, so a
//! failing run never leaves partial outputs behind. [`Pipeline::write`]
//! persists a finished [`PipelineOutput`], and [`Pipeline::run`] does both.

use std::fs;
use std::path::PathBuf;

use log::{
    debug,
    info,
};
use polars::prelude::DataFrame;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::PipelineConfig;
use crate::data_structs::{
    MergedRow,
    NormalizedRow,
};
use crate::error::PrepResult;
use crate::io::{
    ensure_exists,
    write_table,
};
use crate::merge::{
    KeyReport,
    MergeOutcome,
    MetadataTable,
};
use crate::tools::aggregate::{
    AggregateReport,
    GeneAggregator,
};
use crate::tools::filter::{
    filter_missing,
    FilterReport,
};
use crate::tools::normalize::{
    normalize,
    ZScore,
};
use crate::tools::split::Split;

/// Locations of the files written by [`Pipeline::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub merged:     PathBuf,
    pub gene_table: PathBuf,
    pub x_train:    PathBuf,
    pub x_test:     PathBuf,
    pub y_train:    PathBuf,
    pub y_test:     PathBuf,
}

impl OutputPaths {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            merged:     config.output_path("merged_expression_data.csv"),
            gene_table: config.output_path("gene_table.csv"),
            x_train:    config.output_path("X_train.csv"),
            x_test:     config.output_path("X_test.csv"),
            y_train:    config.output_path("y_train.csv"),
            y_test:     config.output_path("y_test.csv"),
        }
    }

    pub fn all(&self) -> [&PathBuf; 6] {
        [
            &self.merged,
            &self.gene_table,
            &self.x_train,
            &self.x_test,
            &self.y_train,
            &self.y_test,
        ]
    }

    /// Paths that already exist on disk.
    pub fn existing(&self) -> Vec<&PathBuf> {
        self.all().into_iter().filter(|p| p.exists()).collect()
    }
}

/// Everything a successful run computed, before anything is written.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub merge:     MergeOutcome,
    pub filter:    FilterReport,
    pub aggregate: AggregateReport,
    pub scaler:    ZScore,
    pub genes:     Vec<NormalizedRow>,
    pub split:     Split,
}

#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub n_merged:   usize,
    pub n_filtered: usize,
    pub n_genes:    usize,
    pub n_train:    usize,
    pub n_test:     usize,
    pub scaler:     ZScore,
    pub report:     KeyReport,
    pub paths:      OutputPaths,
}

impl PipelineSummary {
    fn new(
        output: &PipelineOutput,
        paths: OutputPaths,
    ) -> Self {
        Self {
            n_merged: output.merge.height(),
            n_filtered: output.filter.after,
            n_genes: output.genes.len(),
            n_train: output.split.train.len(),
            n_test: output.split.test.len(),
            scaler: output.scaler,
            report: output.merge.report.clone(),
            paths,
        }
    }
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths::new(&self.config)
    }

    /// Canonicalizes and joins both input tables with the configured
    /// strategy. Both inputs are checked for existence before any of them
    /// is read.
    pub fn merge(&self) -> PrepResult<MergeOutcome> {
        self.config.validate()?;
        ensure_exists(&self.config.expression_path)?;
        ensure_exists(&self.config.metadata_path)?;

        let metadata = MetadataTable::read(
            &self.config.metadata_path,
            &self.config.metadata_columns,
            self.config.separator,
        )?;
        let merger = self.config.merger();
        info!(
            "Merging {} with {} ({} merge)",
            self.config.expression_path.display(),
            self.config.metadata_path.display(),
            merger.name()
        );
        merger.merge(&self.config.expression_path, &metadata)
    }

    /// Runs every stage without touching the output directory.
    pub fn process(&self) -> PrepResult<PipelineOutput> {
        let merge = self.merge()?;

        let rows = MergedRow::from_frame(
            &merge.frame,
            &self.config.expression_columns,
            &self.config.metadata_columns,
        )?;
        let (rows, filter) = filter_missing(rows);

        let (genes, aggregate) =
            GeneAggregator::new(self.config.label_policy).aggregate(&rows)?;
        let (genes, scaler) = normalize(genes)?;

        let mut rng = StdRng::seed_from_u64(self.config.split.seed);
        let split = self.config.split.splitter().split(&genes, &mut rng)?;

        Ok(PipelineOutput {
            merge,
            filter,
            aggregate,
            scaler,
            genes,
            split,
        })
    }

    /// Writes the merged table alone. Used by the merge-only command.
    pub fn write_merged(
        &self,
        merge: &mut MergeOutcome,
    ) -> PrepResult<PathBuf> {
        fs::create_dir_all(&self.config.output_dir)?;
        let path = self.output_paths().merged;
        write_table(&mut merge.frame, &path, self.config.separator)?;
        info!("Wrote merged table to {}", path.display());
        Ok(path)
    }

    pub fn write(
        &self,
        output: &mut PipelineOutput,
    ) -> PrepResult<OutputPaths> {
        let sep = self.config.separator;
        let label_col = self.config.metadata_columns.label.as_str();
        let paths = self.output_paths();

        self.write_merged(&mut output.merge)?;

        let gene_table = NormalizedRow::to_frame(
            &output.genes,
            &self.config.expression_columns,
            &self.config.metadata_columns,
        )?;
        let mut tables: Vec<(DataFrame, &PathBuf)> = vec![
            (gene_table, &paths.gene_table),
            (output.split.train.features_frame()?, &paths.x_train),
            (output.split.test.features_frame()?, &paths.x_test),
            (output.split.train.labels_frame(label_col)?, &paths.y_train),
            (output.split.test.labels_frame(label_col)?, &paths.y_test),
        ];
        for (df, path) in tables.iter_mut() {
            write_table(df, path.as_path(), sep)?;
            debug!("Wrote {} rows to {}", df.height(), path.display());
        }
        info!(
            "Wrote gene table and partitions to {}",
            self.config.output_dir.display()
        );
        Ok(paths)
    }

    pub fn run(&self) -> PrepResult<PipelineSummary> {
        let mut output = self.process()?;
        let paths = self.write(&mut output)?;
        Ok(PipelineSummary::new(&output, paths))
    }
}
