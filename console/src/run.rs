use clap::{
    Args,
    ValueEnum,
};
use console::style;
use geoprep::prelude::*;
use geoprep::utils::n_threads;
use itertools::Itertools;
use log::info;

use crate::input::InputArgs;
use crate::strings::run as strings;
use crate::utils::{
    init_spinner,
    validate_output,
    UtilsArgs,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum LabelPolicyArg {
    FirstWins,
    RequireHomogeneous,
}

impl From<LabelPolicyArg> for LabelPolicy {
    fn from(value: LabelPolicyArg) -> Self {
        match value {
            LabelPolicyArg::FirstWins => LabelPolicy::FirstWins,
            LabelPolicyArg::RequireHomogeneous => LabelPolicy::RequireHomogeneous,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct RunArgs {
    #[clap(flatten)]
    input: InputArgs,

    #[arg(long, help_heading = "SPLIT ARGS", help = strings::TRAIN_RATIO)]
    train_ratio:  Option<f64>,
    #[arg(long, help_heading = "SPLIT ARGS", help = strings::SEED)]
    seed:         Option<u64>,
    #[arg(long, value_enum, help = strings::LABEL_POLICY)]
    label_policy: Option<LabelPolicyArg>,
}

impl RunArgs {
    fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = self.input.pipeline_config()?;
        let mut split = config.split;
        if let Some(ratio) = self.train_ratio {
            split = split.with_train_ratio(ratio);
        }
        if let Some(seed) = self.seed {
            split = split.with_seed(seed);
        }
        config = config.with_split(split);
        if let Some(policy) = self.label_policy {
            config = config.with_label_policy(policy.into());
        }
        config.validate()?;
        Ok(config)
    }

    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let config = self.pipeline_config()?;
        self.input.check_inputs(&config)?;

        let pipeline = Pipeline::new(config);
        validate_output(&pipeline.output_paths().all(), utils.force)?;

        let spinner = init_spinner(utils.progress, "Processing...")?;
        info!("Processing on {} threads", n_threads());
        let mut output = pipeline.process()?;
        spinner.set_message("Writing outputs...");
        let paths = pipeline.write(&mut output)?;
        spinner.finish_and_clear();

        println!(
            "[{}] {} merged rows, {} after filtering, {} genes",
            style("V").green(),
            style(output.merge.height()).green(),
            style(output.filter.after).green(),
            style(output.genes.len()).green(),
        );
        println!(
            "[{}] Split into {} train / {} test rows (seed {})",
            style("V").green(),
            style(output.split.train.len()).green(),
            style(output.split.test.len()).green(),
            pipeline.config().split.seed,
        );
        if !output.merge.report.is_complete() {
            println!(
                "[{}] {}",
                style("!").yellow(),
                output.merge.report.describe(5)
            );
        }
        println!(
            "Written files:\n  {}",
            paths.all().iter().map(|p| p.display()).join("\n  ")
        );
        Ok(())
    }
}
