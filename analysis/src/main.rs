use clap::{Args, Parser, Subcommand};
use repart_analysis::{AnalysisConfig, AnalysisError, Pipeline, Variant};
use std::{path::PathBuf, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Aggregate repart-kv benchmark results over their repetitions
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// yaml file with defaults for all options below
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// abort on the first malformed result file instead of skipping it
    #[arg(long, global = true)]
    strict: bool,

    /// glob for the result file names
    #[arg(long, global = true)]
    pattern: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// mean ops/second per configuration, one file per workload and engine
    Throughput(Dirs),
    /// mean ops/second and makespan per configuration, in `throughput/` and `makespan/`
    Metrics(Dirs),
    /// throughput over time per workload, engine and workers
    Timeline(Dirs),
}

#[derive(Args, Debug)]
struct Dirs {
    /// directory with the per run result files [default: .]
    input_dir: Option<PathBuf>,
    /// directory for the aggregated files
    output_dir: Option<PathBuf>,
}


/// Merge the config file and the command line, the command line wins
fn resolve(cli: Cli) -> Result<(Variant, AnalysisConfig), AnalysisError> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    let (variant, dirs) = match cli.command {
        Command::Throughput(dirs) => (Variant::Throughput, dirs),
        Command::Metrics(dirs) => (Variant::Metrics, dirs),
        Command::Timeline(dirs) => (Variant::Timeline, dirs),
    };

    if dirs.input_dir.is_some() {
        config.input_dir = dirs.input_dir;
    }
    if dirs.output_dir.is_some() {
        config.output_dir = dirs.output_dir;
    }
    if let Some(pattern) = cli.pattern {
        config.pattern = pattern;
    }
    config.strict |= cli.strict;

    Ok((variant, config))
}

fn run(cli: Cli) -> Result<(), AnalysisError> {
    let (variant, config) = resolve(cli)?;
    let settings = config.settings(variant)?;
    info!(
        input_dir = ?settings.input_dir,
        output_dir = ?settings.output_dir,
        "Aggregating {variant:?}"
    );

    let report = Pipeline::new(settings, variant).run()?;
    info!(
        configurations = report.configurations,
        "Aggregated {} of {} result files",
        report.used,
        report.collected
    );

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match std::error::Error::source(&error) {
                Some(source) => error!("{error}: {source}"),
                None => error!("{error}"),
            }

            ExitCode::FAILURE
        }
    }
}
