use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::fs;
use std::path::PathBuf;

use etc_stats::analysis::{self, LoggingRegime};
use etc_stats::config::{AnalysisConfig, TimestampPolicy};
use etc_stats::config_loader;
use etc_stats::sink::{self, CsvSink, OutputPaths};

/// Duty cycle and reliability statistics for ETC experiment logs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ETC log file to be parsed and analyzed
    logfile: PathBuf,

    /// The log comes from a testbed experiment instead of Cooja
    #[arg(short, long)]
    testbed: bool,

    /// Optional YAML analysis configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the CSV tables (defaults to the log file's directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the full report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Skip lines with unparsable timestamps instead of aborting
    #[arg(long)]
    lenient: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    analysis::validate_input(&args.logfile)?;

    let mut config = match args.config {
        Some(ref path) => config_loader::load_config(path)?,
        None => AnalysisConfig::default(),
    };
    if args.output.is_some() {
        config.output_dir = args.output.clone();
    }
    if args.lenient {
        config.timestamp_policy = TimestampPolicy::Lenient;
    }

    let regime = if args.testbed {
        LoggingRegime::RealWorld
    } else {
        LoggingRegime::Simulated
    };

    if let Some(ref dir) = config.output_dir {
        fs::create_dir_all(dir)
            .wrap_err_with(|| format!("Failed to create output directory '{}'", dir.display()))?;
    }

    let paths = OutputPaths::for_log(&args.logfile, config.output_dir.as_deref());
    let report = {
        let mut csv_sink = CsvSink::create(paths.clone())?;
        analysis::run_analysis(&args.logfile, regime, &config, &mut csv_sink)
            .wrap_err_with(|| format!("Failed to analyze '{}'", args.logfile.display()))?
    };
    info!("Samples written to {}", paths.samples.display());
    info!("Events written to {}", paths.events.display());

    sink::write_duty_cycle_csv(&paths.duty_cycle, &report.duty_cycle.per_node)?;
    info!("Duty cycle table written to {}", paths.duty_cycle.display());

    analysis::print_summary(&report);

    if let Some(ref json_path) = args.json {
        analysis::generate_json_report(&report, json_path)?;
    }

    Ok(())
}
