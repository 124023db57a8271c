use std::path::{
    Path,
    PathBuf,
};
use std::time::Duration;

use anyhow::anyhow;
use clap::Args;
use console::style;
use dialoguer::Confirm;
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use itertools::Itertools;
use log::LevelFilter;

use crate::strings::utils as strings;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(short, long, default_value_t = false, help = strings::VERBOSE)]
    pub verbose:  bool,
    #[arg(long, default_value_t = false, help = strings::PROGRESS)]
    pub progress: bool,
    #[arg(long, help = strings::THREADS)]
    pub threads:  Option<usize>,
    #[arg(long, default_value_t = false, help = strings::FORCE)]
    pub force:    bool,
}

impl UtilsArgs {
    pub fn setup(&self) -> anyhow::Result<()> {
        init_logger(self.verbose)?;
        if let Some(threads) = self.threads {
            init_threads(threads)?;
        }
        Ok(())
    }
}

pub(crate) fn init_logger(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    }
    else {
        LevelFilter::Info
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_default_env()
        .try_init()?;
    Ok(())
}

/// Must run before the first table is read: both the rayon pool and the
/// polars pool read their size once.
pub(crate) fn init_threads(threads: usize) -> anyhow::Result<()> {
    if threads == 0 {
        return Err(anyhow!("--threads must be at least 1"));
    }
    std::env::set_var("GEOPREP_NUM_THREADS", threads.to_string());
    std::env::set_var("POLARS_MAX_THREADS", threads.to_string());
    Ok(())
}

pub(crate) fn init_spinner(
    enabled: bool,
    message: &'static str,
) -> anyhow::Result<ProgressBar> {
    if !enabled {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    Ok(spinner)
}

pub(crate) fn validate_input(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!("Path {} does not exist.", style(path.display()).red());
        return Err(anyhow!("missing input {}", path.display()));
    }
    if !path.is_file() {
        eprintln!("Path {} is not a file.", style(path.display()).red());
        return Err(anyhow!("input {} is not a file", path.display()));
    }
    Ok(())
}

/// Asks before existing outputs get replaced, unless `force` is set.
pub(crate) fn validate_output(
    paths: &[&PathBuf],
    force: bool,
) -> anyhow::Result<()> {
    let existing = paths.iter().filter(|p| p.exists()).collect_vec();
    if existing.is_empty() || force {
        return Ok(());
    }
    let prompt = format!(
        "The following files already exist and will be overwritten:\n\n  {}\n\nProceed?",
        existing.iter().map(|p| p.display()).join("\n  ")
    );
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false);
    if !confirmed {
        println!("{}", style("Process aborted by the user.").red());
        return Err(anyhow!("User aborted the process."));
    }
    Ok(())
}

pub(crate) fn parse_separator(sep: char) -> anyhow::Result<u8> {
    if sep.is_ascii() {
        Ok(sep as u8)
    }
    else {
        Err(anyhow!("separator '{}' is not a single byte character", sep))
    }
}
