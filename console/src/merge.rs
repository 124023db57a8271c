use clap::Args;
use console::style;
use geoprep::prelude::*;

use crate::input::InputArgs;
use crate::utils::{
    init_spinner,
    validate_output,
    UtilsArgs,
};

/// Canonicalizes and joins both tables, then writes only the merged table.
#[derive(Args, Debug, Clone)]
pub(crate) struct MergeArgs {
    #[clap(flatten)]
    input: InputArgs,
}

impl MergeArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let config = self.input.pipeline_config()?;
        config.validate()?;
        self.input.check_inputs(&config)?;

        let pipeline = Pipeline::new(config);
        validate_output(&[&pipeline.output_paths().merged], utils.force)?;

        let spinner = init_spinner(utils.progress, "Merging...")?;
        let mut outcome = pipeline.merge()?;
        let path = pipeline.write_merged(&mut outcome)?;
        spinner.finish_and_clear();

        let report = &outcome.report;
        println!(
            "[{}] {} of {} expression rows merged in {} chunk(s)",
            style("V").green(),
            style(outcome.height()).green(),
            outcome.n_input_rows,
            outcome.n_chunks,
        );
        println!(
            "Sample keys: {} expression, {} metadata, {} matched",
            report.n_expression_keys,
            report.n_metadata_keys,
            style(report.matched_keys()).green(),
        );
        if !report.is_complete() {
            println!("[{}] {}", style("!").yellow(), report.describe(20));
        }
        println!("Written file: {}", path.display());
        Ok(())
    }
}
