//! Report generation for experiment analysis.
//!
//! Renders the console report and exports the full report as JSON.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use super::types::*;

fn pdr(value: Option<f64>, undefined: &str) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => undefined.to_string(),
    }
}

/// Duty cycle statistics block
pub fn render_duty_cycle(report: &DutyCycleReport) -> Vec<String> {
    let mut lines = vec!["----- Duty Cycle Stats -----".to_string(), String::new()];
    match report.stats {
        Some(ref s) => {
            lines.push(format!("AVERAGE DUTY CYCLE: {:.3}%", s.mean));
            lines.push(format!("STANDARD DEVIATION: {:.3}", s.std_dev));
            lines.push(format!("MINIMUM: {:.3}%", s.min));
            lines.push(format!("MAXIMUM: {:.3}%", s.max));
        }
        None => {
            lines.push("AVERAGE DUTY CYCLE: nan".to_string());
            lines.push("STANDARD DEVIATION: nan".to_string());
            lines.push("MINIMUM: nan".to_string());
            lines.push("MAXIMUM: nan".to_string());
        }
    }
    lines
}

/// Reliability block, metrics in their fixed order
pub fn render_reliability(report: &ReliabilityReport) -> Vec<String> {
    let mut lines = vec!["----- Reliability Stats -----".to_string(), String::new()];

    lines.push(format!("# EVENTS AT CONTROLLER: {}", report.event_count));
    lines.push(format!("# COLLECT ROUNDS AT CONTROLLER: {}", report.collect_count));
    lines.push(format!("# FAILED EVENTS: {}", report.failed_events));
    lines.push(String::new());

    lines.push(format!(
        "COLLECT PDR: {}",
        pdr(report.collect_pdr, "undefined (no collect rounds)")
    ));
    lines.push(String::new());

    lines.push(format!("# COMMANDS GENERATED BY THE CONTROLLER: {}", report.command_count));
    lines.push(format!("# COMMANDS RECEIVED BY ACTUATORS: {}", report.actuation_count));
    lines.push(format!(
        "AVERAGE ACTUATION PDR: {}",
        pdr(report.average_actuation_pdr, "no commands")
    ));
    lines.push(String::new());

    for subject in &report.per_subject {
        match subject.actuation_pdr {
            Some(v) => lines.push(format!("SENSOR {} -- ACTUATION PDR: {:.4}", subject.subject, v)),
            None => lines.push(format!("SENSOR {} -- no commands generated.", subject.subject)),
        }
    }

    lines
}

/// Full console report
pub fn render_text_report(report: &AnalysisReport) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("Logfile: {}", report.metadata.log_file));
    lines.push(report.metadata.regime.clone());
    lines.push(format!("Nodes booted: {}", report.metadata.known_nodes.len()));
    lines.push(String::new());
    lines.extend(render_duty_cycle(&report.duty_cycle));
    lines.push(String::new());
    lines.extend(render_reliability(&report.reliability));
    lines.join("\n")
}

/// Print the report to stdout
pub fn print_summary(report: &AnalysisReport) {
    println!("\n{}\n", render_text_report(report));
}

/// Generate JSON report
pub fn generate_json_report(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}
