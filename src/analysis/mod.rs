//! Experiment log analysis.
//!
//! This module turns Cooja or testbed logs of the event-triggered
//! collection and actuation protocol into row streams, and computes radio
//! duty cycle and end-to-end reliability from them.

pub mod types;
pub mod regime;
pub mod log_parser;
pub mod emitter;
pub mod duty_cycle;
pub mod reliability;
pub mod pipeline;
pub mod report;

pub use types::*;
pub use regime::{LoggingRegime, Regime};
pub use duty_cycle::analyze_duty_cycle;
pub use reliability::analyze_reliability;
pub use pipeline::{analyze_streams, parse_log_file, run_analysis, validate_input};
pub use report::{generate_json_report, print_summary, render_text_report};
