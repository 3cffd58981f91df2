use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use deinit_analysis::app::{run_fit, run_generate, run_plot, run_split_fit};
use deinit_analysis::config::{FitConfig, FitOptions, SplitFitConfig};
use deinit_analysis::data::{GenerateConfig, ParamRange, RangeFilter, ValidationPolicy};
use deinit_analysis::error::Result;
use deinit_analysis::output::visualization::ChartKind;
use deinit_analysis::regression::{BasisTerm, PhaseKind};
use deinit_analysis::report::CoefficientStyle;

/// Fit polynomial cost models to deinitialization benchmark measurements.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fit a file of `values objects scheduling total` rows
    Fit {
        /// Measurement file
        dataset: PathBuf,

        /// Fail on samples whose total is below their scheduling time
        #[arg(long)]
        reject_negative: bool,

        #[command(flatten)]
        fit: FitArgs,
    },

    /// Fit an inputs file against a separate outputs file
    ///
    /// The outputs file holds `scheduling total` rows, one per inputs row.
    FitSplit {
        /// File of `values objects` rows
        inputs: PathBuf,

        /// File of `scheduling total` rows
        dataset: PathBuf,

        /// Outputs of a baseline run, subtracted row by row before fitting
        #[arg(long = "diff", value_name = "BASELINE")]
        baseline: Option<PathBuf>,

        #[command(flatten)]
        fit: FitArgs,
    },

    /// Draw a scatter chart of one or more measurement files
    Plot {
        /// Figure to draw
        #[arg(long, default_value_t = ChartKind::VersusObjects)]
        kind: ChartKind,

        /// Output image, `.svg` for SVG, anything else for PNG
        #[arg(short, long)]
        output: PathBuf,

        /// Measurement files, one series each
        #[arg(required = true)]
        datasets: Vec<PathBuf>,
    },

    /// Print random `values objects` points for the benchmark harness
    GenPoints {
        /// Range of task-local values
        #[arg(long, value_name = "MIN:MAX", default_value = "0:200")]
        values: ParamRange,

        /// Range of objects
        #[arg(long, value_name = "MIN:MAX", default_value = "1:5000")]
        objects: ParamRange,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Number of points
        #[arg(default_value_t = 5000)]
        points: usize,
    },
}

/// Options common to both fit subcommands
#[derive(Args, Debug)]
struct FitArgs {
    /// Comma-separated basis terms out of 1, o, o2, v, vo, vo2 [default: all six, highest order first]
    #[arg(short, long, value_name = "TERMS")]
    params: Option<String>,

    /// Comma-separated phases out of S, E, T
    #[arg(short = 'y', long)]
    phases: Option<String>,

    #[arg(long)]
    min_values: Option<u64>,

    #[arg(long)]
    max_values: Option<u64>,

    #[arg(long)]
    min_objects: Option<u64>,

    #[arg(long)]
    max_objects: Option<u64>,

    /// Coefficient printing: integer or full
    #[arg(long)]
    coefficients: Option<CoefficientStyle>,

    /// Add MAE and RMSE columns to the report
    #[arg(long)]
    errors: bool,

    /// Write observed and fitted values as TSV
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Draw the relative error of each phase
    #[arg(long, value_name = "PATH")]
    residuals: Option<PathBuf>,
}

impl FitArgs {
    /// Override `defaults` with whatever was given on the command line
    fn apply(self, defaults: &mut FitOptions) -> Result<()> {
        if let Some(params) = &self.params {
            defaults.terms = BasisTerm::parse_list(params)?;
        }
        if let Some(phases) = &self.phases {
            defaults.phases = PhaseKind::parse_list(phases)?;
        }
        defaults.filter = RangeFilter {
            min_values: self.min_values,
            max_values: self.max_values,
            min_objects: self.min_objects,
            max_objects: self.max_objects,
        };
        if let Some(style) = self.coefficients {
            defaults.report.coefficients = style;
        }
        defaults.report.show_errors = self.errors;
        defaults.export = self.export;
        defaults.residuals = self.residuals;
        Ok(())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Diagnostics go to stderr; the report owns stdout. RUST_LOG overrides -v.
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn fit_config(dataset: PathBuf, reject_negative: bool, fit: FitArgs) -> Result<FitConfig> {
    let mut config = FitConfig::new(dataset);
    if reject_negative {
        config.validation = ValidationPolicy::Reject;
    }
    fit.apply(&mut config.options)?;
    Ok(config)
}

fn split_fit_config(
    inputs: PathBuf,
    dataset: PathBuf,
    baseline: Option<PathBuf>,
    fit: FitArgs,
) -> Result<SplitFitConfig> {
    let mut config = SplitFitConfig::new(inputs, dataset);
    config.baseline = baseline;
    fit.apply(&mut config.options)?;
    Ok(config)
}

fn run(command: Commands) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Fit {
            dataset,
            reject_negative,
            fit,
        } => {
            let config = fit_config(dataset, reject_negative, fit)?;
            run_fit(&config, &mut out)?;
        }
        Commands::FitSplit {
            inputs,
            dataset,
            baseline,
            fit,
        } => {
            let config = split_fit_config(inputs, dataset, baseline, fit)?;
            run_split_fit(&config, &mut out)?;
        }
        Commands::Plot {
            kind,
            output,
            datasets,
        } => run_plot(&datasets, &output, kind)?,
        Commands::GenPoints {
            values,
            objects,
            seed,
            points,
        } => {
            let config = GenerateConfig {
                values,
                objects,
                points,
                seed,
            };
            let command_line = std::env::args().collect::<Vec<_>>().join(" ");
            run_generate(&config, &command_line, &mut out)?;
        }
    }

    out.flush()
        .map_err(|e| deinit_analysis::error::AnalysisError::io("<stdout>", e))
}

// =================================================================================================
// Tests
// =================================================================================================
