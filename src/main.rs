mod report;

use agrofuzzy::{
    ConfigError, DatasetError, GrowthModel, InferenceError, ModelConfig, ScanError, load_dataset, select_best,
};
use clap::{Args, Parser, Subcommand};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Fuzzy crop-growth suitability over monthly climate records
#[derive(Parser, Debug)]
#[command(name = "agrofuzzy")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every month of a dataset and pick the best one
    Scan {
        /// Dataset JSON (`{"meses": [...]}` or a bare array of records)
        dataset: PathBuf,

        /// Override the rainfall scale factor
        #[arg(long)]
        scale: Option<f64>,

        #[command(flatten)]
        common: Common,
    },

    /// Evaluate a single scenario
    Eval {
        /// Rainfall, already in rainfall-universe units
        #[arg(long, allow_negative_numbers = true)]
        rainfall: f64,

        /// Mean temperature
        #[arg(long, allow_negative_numbers = true)]
        temperature: f64,

        #[command(flatten)]
        common: Common,
    },

    /// Print the built-in model configuration as JSON
    Config,
}

#[derive(Args, Debug)]
struct Common {
    /// Model configuration file (defaults to the built-in soybean model)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chart the input terms and the aggregated output set
    #[arg(long)]
    plot: bool,

    /// Force ANSI colour
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI colour
    #[arg(long)]
    no_color: bool,
}

impl Common {
    fn color(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            io::stdout().is_terminal()
        }
    }

    fn model_config(&self) -> Result<ModelConfig, ConfigError> {
        match &self.config {
            Some(path) => ModelConfig::from_path(path),
            None => Ok(ModelConfig::default()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) => 2,
            CliError::Dataset(_) | CliError::Scan(_) | CliError::Inference(_) => 1,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AGROFUZZY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Scan { dataset, scale, common } => {
            let mut config = common.model_config()?;
            if let Some(scale) = scale {
                config.rainfall_scale_factor = scale;
            }
            let model = config.build()?;
            let records = load_dataset(&dataset)?;

            let start = Instant::now();
            let report = select_best(&model, &records)?;
            report::print_scan(&report, &model, start.elapsed(), common.plot, common.color());
        }
        Command::Eval { rainfall, temperature, common } => {
            let model: GrowthModel = common.model_config()?.build()?;
            let trace = model.evaluate_verbose(rainfall, temperature)?;
            report::print_eval(&trace, &model, (rainfall, temperature), common.plot, common.color());
        }
        Command::Config => {
            println!("{}", ModelConfig::default().to_json_pretty()?);
        }
    }
    Ok(())
}
