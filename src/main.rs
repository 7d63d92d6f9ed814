use anyhow::Result;
use clap::Parser;
use concordance::cli::{Cli, Commands};
use concordance::commands::{compare, init};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn default_log_level(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

// RUST_LOG wins over -v/-q; logs go to stderr so stdout stays a clean report
fn init_logging(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbosity, quiet)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            rater_dirs,
            names,
            output,
            format,
            config,
            plain,
            no_parallel,
            verbosity,
            quiet,
        } => {
            init_logging(verbosity, quiet);
            compare::run_compare(compare::CompareConfig {
                rater_dirs,
                names,
                output,
                format: format.map(Into::into),
                config,
                plain,
                no_parallel,
                quiet,
            })
        }
        Commands::Init { force } => {
            init_logging(0, false);
            init::init_config(force)
        }
    }
}
