mod input;
mod label;
mod merge;
mod run;
mod strings;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use label::LabelArgs;
use merge::MergeArgs;
use run::RunArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Merge, clean, aggregate, normalize and split.
    Run {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  RunArgs,
    },

    /// Merge expression data with sample metadata and write the merged
    /// table only.
    Merge {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  MergeArgs,
    },

    /// Derive the binary Label column of a metadata table from sample
    /// titles.
    Label {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  LabelArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Run { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Merge { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Label { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_options() {
        let cli = Cli::try_parse_from([
            "geoprep",
            "run",
            "--expression",
            "expr.csv",
            "--metadata",
            "meta.csv",
            "-o",
            "out",
            "--strategy",
            "streaming",
            "--chunk-size",
            "500",
            "--label-policy",
            "require-homogeneous",
            "--force",
        ])
        .unwrap();
        assert!(matches!(cli.command, MainMenu::Run { ref utils, .. } if utils.force));
    }
}
