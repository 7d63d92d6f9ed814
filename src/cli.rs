use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "concordance")]
#[command(about = "Inter-rater reliability for multi-coder annotation studies", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two or more raters' coding results
    Compare {
        /// One results directory per rater
        #[arg(required = true, num_args = 2..)]
        rater_dirs: Vec<PathBuf>,

        /// Rater names, in directory order (defaults to directory names)
        #[arg(short, long = "name")]
        names: Vec<String>,

        /// Directory for the summary, report and CSV exports
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format printed to stdout
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Configuration file (defaults to the nearest .concordance.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Disable colors
        #[arg(long)]
        plain: bool,

        /// Analyze variables sequentially
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Increase verbosity (-v info, -vv debug, -vvv trace)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,

        /// Only print errors
        #[arg(short, long, conflicts_with = "verbosity")]
        quiet: bool,
    },

    /// Write a default .concordance.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}
