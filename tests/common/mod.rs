//! Fixture tables written to temporary directories.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{
    Path,
    PathBuf,
};

use geoprep::prelude::*;
use rand::{
    Rng,
    SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

pub struct Workspace {
    pub dir:        TempDir,
    pub expression: PathBuf,
    pub metadata:   PathBuf,
}

impl Workspace {
    pub fn new(
        expression: &str,
        metadata: &str,
    ) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let expression_path = dir.path().join("expression.csv");
        let metadata_path = dir.path().join("metadata.csv");
        fs::write(&expression_path, expression)?;
        fs::write(&metadata_path, metadata)?;
        Ok(Self {
            dir,
            expression: expression_path,
            metadata: metadata_path,
        })
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_expression_path(self.expression.clone())
            .with_metadata_path(self.metadata.clone())
            .with_output_dir(self.output_dir())
            .with_prefix("GSE0".into())
    }
}

/// A synthetic study: `n_samples` samples, the first `n_healthy` of them
/// labeled 0, and `n_genes` genes measured by two probes each. Every gene is
/// measured in one sample only, so all probe rows of a gene share a label.
/// Sample keys in the expression table are spelled with stray punctuation.
pub fn synthetic_study(
    n_samples: usize,
    n_healthy: usize,
    n_genes: usize,
    seed: u64,
) -> (String, String) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut expression =
        String::from("ID_REF,Sample,Value,Gene Symbol,Gene Title,ENTREZ_GENE_ID\n");
    for gene in 0..n_genes {
        let sample = gene % n_samples;
        for probe in 0..2 {
            let value: f64 = rng.gen_range(0.0..1000.0);
            writeln!(
                expression,
                "{gene}_{probe}_at,' GSM{sample}',{value:.4},G{gene:05},gene {gene},{gene}"
            )
            .unwrap();
        }
    }

    let mut metadata = String::from("geo_accession,title,Label\n");
    for sample in 0..n_samples {
        let (title, label) = if sample < n_healthy {
            ("Healthy", 0)
        }
        else {
            ("SLE", 1)
        };
        writeln!(metadata, "GSM{sample},['{title} {sample}'],{label}").unwrap();
    }
    (expression, metadata)
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
