use std::path::PathBuf;

use clap::Args;
use console::style;
use geoprep::tools::labels::TitleLabeler;

use crate::strings::label as strings;
use crate::utils::{
    parse_separator,
    validate_input,
    validate_output,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct LabelArgs {
    #[arg(help = strings::INPUT)]
    input:     PathBuf,
    #[arg(short, long, required = true, help = strings::OUTPUT)]
    output:    PathBuf,
    #[arg(long, default_value = "title", help = strings::TITLE_COL)]
    title_col: String,
    #[arg(long, default_value = "Label", help = strings::LABEL_COL)]
    label_col: String,
    #[arg(long, default_value = "Healthy", help = strings::HEALTHY)]
    healthy:   String,
    #[arg(long, default_value_t = ',', help = crate::strings::input::SEPARATOR)]
    sep:       char,
}

impl LabelArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        validate_input(&self.input)?;
        validate_output(&[&self.output], utils.force)?;

        let labeler = TitleLabeler::default()
            .with_title_col(self.title_col.clone())
            .with_label_col(self.label_col.clone())
            .with_healthy_marker(self.healthy.clone())
            .with_separator(parse_separator(self.sep)?);
        let [healthy, other] = labeler.run(&self.input, &self.output)?;

        println!(
            "[{}] {} samples labeled 0 ({}), {} labeled 1",
            style("V").green(),
            style(healthy).green(),
            self.healthy,
            style(other).green(),
        );
        println!("Written file: {}", self.output.display());
        Ok(())
    }
}
