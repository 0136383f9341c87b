//! Single-pass driver: read, classify, emit, then analyze.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::duty_cycle::analyze_duty_cycle;
use super::emitter::{EmittedStreams, RecordEmitter};
use super::regime::LoggingRegime;
use super::reliability::analyze_reliability;
use super::types::*;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::sink::RecordSink;

/// Fail early if the log path is missing or not a regular file
pub fn validate_input(path: &Path) -> Result<(), AnalysisError> {
    if !path.exists() {
        return Err(AnalysisError::InputNotFound { path: path.to_path_buf() });
    }
    if !path.is_file() {
        return Err(AnalysisError::InputNotAFile { path: path.to_path_buf() });
    }
    Ok(())
}

/// Parse a log file into row streams, pushing every row into `sink`.
///
/// The sink is closed once the whole file is consumed. Lines that match no
/// pattern, or cannot be read as UTF-8, are skipped.
pub fn parse_log_file(
    path: &Path,
    regime: LoggingRegime,
    config: &AnalysisConfig,
    sink: &mut dyn RecordSink,
) -> Result<EmittedStreams, AnalysisError> {
    validate_input(path)?;

    let file = File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::with_capacity(64 * 1024, file);

    let strategy = regime.strategy();
    let patterns = strategy.patterns();
    let mut emitter = RecordEmitter::new(strategy, config.timestamp_policy, sink);
    let mut unmatched = 0usize;

    for (idx, line_result) in reader.lines().enumerate() {
        let line = match line_result {
            Ok(l) => l,
            Err(e) => {
                log::debug!("Skipping unreadable line {}: {}", idx + 1, e);
                continue;
            }
        };

        match patterns.classify(&line) {
            Some(record) => emitter.emit(idx + 1, record)?,
            None => unmatched += 1,
        }
    }

    let streams = emitter.finish()?;
    log::info!(
        "Parsed {}: {} booted nodes, {} Energest samples, {} experiment events ({} lines ignored)",
        path.display(),
        streams.known_nodes.len(),
        streams.samples.len(),
        streams.events.len(),
        unmatched
    );

    Ok(streams)
}

/// Run both analyzers over closed streams
pub fn analyze_streams(
    streams: &EmittedStreams,
    config: &AnalysisConfig,
) -> (DutyCycleReport, ReliabilityReport) {
    log::info!("Computing node duty cycles...");
    let duty_cycle = analyze_duty_cycle(&streams.samples, config.warmup_reports);

    log::info!("Computing reliability metrics...");
    let reliability = analyze_reliability(&streams.events, config.num_sensors);

    (duty_cycle, reliability)
}

/// Parse `path` and analyze it in one go
pub fn run_analysis(
    path: &Path,
    regime: LoggingRegime,
    config: &AnalysisConfig,
    sink: &mut dyn RecordSink,
) -> Result<AnalysisReport, AnalysisError> {
    log::info!("Logfile: {}", path.display());
    log::info!("{}", regime);

    let streams = parse_log_file(path, regime, config, sink)?;
    let (duty_cycle, reliability) = analyze_streams(&streams, config);

    Ok(AnalysisReport {
        metadata: AnalysisMetadata {
            analysis_timestamp: chrono::Utc::now().to_rfc3339(),
            log_file: path.display().to_string(),
            regime: regime.to_string(),
            known_nodes: streams.known_nodes.iter().copied().collect(),
            sample_rows: streams.samples.len(),
            event_rows: streams.events.len(),
            skipped_timestamps: streams.skipped_timestamps,
        },
        duty_cycle,
        reliability,
    })
}
