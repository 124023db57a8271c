use std::path::PathBuf;

use clap::{
    Args,
    ValueEnum,
};
use geoprep::prelude::*;

use crate::strings::input as strings;
use crate::utils::{
    parse_separator,
    validate_input,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum StrategyArg {
    Batch,
    Streaming,
}

impl From<StrategyArg> for MergeStrategyKind {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Batch => MergeStrategyKind::Batch,
            StrategyArg::Streaming => MergeStrategyKind::Streaming,
        }
    }
}

/// Input and output options shared by `run` and `merge`.
#[derive(Args, Debug, Clone)]
pub(crate) struct InputArgs {
    #[arg(short, long, help = strings::EXPRESSION)]
    pub expression: Option<PathBuf>,
    #[arg(short, long, help = strings::METADATA)]
    pub metadata:   Option<PathBuf>,
    #[arg(short, long, help = strings::OUTPUT)]
    pub output:     Option<PathBuf>,
    #[arg(short, long, help = strings::PREFIX)]
    pub prefix:     Option<String>,
    #[arg(short, long, value_enum, help = strings::STRATEGY)]
    pub strategy:   Option<StrategyArg>,
    #[arg(long, help = strings::CHUNK_SIZE)]
    pub chunk_size: Option<usize>,
    #[arg(long, help = strings::SEPARATOR)]
    pub sep:        Option<char>,
    #[arg(long, help = strings::CONFIG)]
    pub config:     Option<PathBuf>,
}

impl InputArgs {
    /// Settings from `--config` (or the defaults) with every given command
    /// line option applied on top.
    pub fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                validate_input(path)?;
                PipelineConfig::from_json_file(path)?
            },
            None => PipelineConfig::default(),
        };

        if let Some(path) = &self.expression {
            config = config.with_expression_path(path.clone());
        }
        if let Some(path) = &self.metadata {
            config = config.with_metadata_path(path.clone());
        }
        if let Some(dir) = &self.output {
            config = config.with_output_dir(dir.clone());
        }
        if let Some(prefix) = &self.prefix {
            config = config.with_prefix(prefix.clone());
        }
        if let Some(strategy) = self.strategy {
            config = config.with_strategy(strategy.into());
        }
        if let Some(chunk_size) = self.chunk_size {
            config = config.with_chunk_size(chunk_size);
        }
        if let Some(sep) = self.sep {
            config = config.with_separator(parse_separator(sep)?);
        }
        Ok(config)
    }

    pub fn check_inputs(
        &self,
        config: &PipelineConfig,
    ) -> anyhow::Result<()> {
        validate_input(&config.expression_path)?;
        validate_input(&config.metadata_path)?;
        Ok(())
    }
}
