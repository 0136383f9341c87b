//! # etc-stats - Duty cycle and reliability analysis for ETC experiment logs
//!
//! This library parses the logs of event-triggered collection and actuation
//! experiments, either Cooja simulations or testbed runs, and computes:
//!
//! - **Radio duty cycle** per node from periodic Energest reports
//! - **Reliability**: events detected vs. collection rounds completed,
//!   collection PDR, and per-actuator command delivery ratios
//!
//! ## Architecture
//!
//! - `analysis::regime`: logging regimes and timestamp normalization
//! - `analysis::log_parser`: priority-ordered line classification
//! - `analysis::emitter`: classified records to sample/event row streams
//! - `analysis::duty_cycle`, `analysis::reliability`: the two analyzers
//! - `analysis::pipeline`: single-pass driver
//! - `analysis::report`: console and JSON reports
//! - `sink`: CSV tables
//! - `config`, `config_loader`: YAML analysis configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use etc_stats::analysis::{self, LoggingRegime};
//! use etc_stats::config::AnalysisConfig;
//! use etc_stats::sink::{CsvSink, OutputPaths};
//!
//! let log = Path::new("loglistener.txt");
//! let config = AnalysisConfig::default();
//! let mut sink = CsvSink::create(OutputPaths::for_log(log, None))?;
//! let report = analysis::run_analysis(log, LoggingRegime::Simulated, &config, &mut sink)?;
//! analysis::print_summary(&report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`error::AnalysisError`]; the binary reports
//! errors through `color_eyre`.

pub mod analysis;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod sink;
