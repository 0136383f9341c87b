//! Turns classified records into output rows.

use std::collections::BTreeSet;

use super::regime::Regime;
use super::types::*;
use crate::config::TimestampPolicy;
use crate::error::AnalysisError;
use crate::sink::RecordSink;

/// Everything the emitter produced once the log is consumed
#[derive(Debug, Clone, Default)]
pub struct EmittedStreams {
    /// Nodes that logged a boot line
    pub known_nodes: BTreeSet<u32>,
    pub samples: Vec<DutyCycleSampleRow>,
    pub events: Vec<ExperimentEventRow>,
    /// Matched lines dropped under the lenient timestamp policy
    pub skipped_timestamps: usize,
}

/// Normalizes timestamps and appends rows to a sink.
///
/// Rows are also kept in memory so the analyzers can run on the closed
/// streams without re-reading the tables.
pub struct RecordEmitter<'a> {
    regime: &'static dyn Regime,
    policy: TimestampPolicy,
    sink: &'a mut dyn RecordSink,
    streams: EmittedStreams,
}

impl<'a> RecordEmitter<'a> {
    pub fn new(
        regime: &'static dyn Regime,
        policy: TimestampPolicy,
        sink: &'a mut dyn RecordSink,
    ) -> Self {
        Self {
            regime,
            policy,
            sink,
            streams: EmittedStreams::default(),
        }
    }

    /// Emit one record found on line `line_no` (1-based).
    pub fn emit(&mut self, line_no: usize, record: ClassifiedRecord) -> Result<(), AnalysisError> {
        let ClassifiedRecord { time_token, node_id, body } = record;

        // Boot lines only register the node, their timestamp is never used
        if let RecordBody::NodeBoot { .. } = body {
            if self.streams.known_nodes.insert(node_id) {
                log::debug!("Node {} booted", node_id);
            }
            return Ok(());
        }

        let timestamp = match self.regime.normalize(&time_token) {
            Ok(ts) => ts,
            Err(source) => match self.policy {
                TimestampPolicy::Strict => {
                    return Err(AnalysisError::UnparsableTimestamp { line: line_no, source });
                }
                TimestampPolicy::Lenient => {
                    log::debug!("Skipping line {}: {}", line_no, source);
                    self.streams.skipped_timestamps += 1;
                    return Ok(());
                }
            },
        };

        match body {
            RecordBody::NodeBoot { .. } => {}
            RecordBody::EnergestSample {
                report_count,
                cpu_ticks,
                lpm_ticks,
                tx_ticks,
                rx_ticks,
            } => {
                let row = DutyCycleSampleRow {
                    timestamp,
                    node_id,
                    report_count,
                    cpu_ticks,
                    lpm_ticks,
                    tx_ticks,
                    rx_ticks,
                };
                self.sink.push_sample(&row)?;
                self.streams.samples.push(row);
            }
            RecordBody::ExperimentEvent {
                kind,
                event_source,
                event_seqn,
                subject,
            } => {
                let row = ExperimentEventRow {
                    timestamp,
                    node_id,
                    kind,
                    event_source,
                    event_seqn,
                    subject,
                };
                self.sink.push_event(&row)?;
                self.streams.events.push(row);
            }
        }

        Ok(())
    }

    /// Close the sink and hand back the completed streams
    pub fn finish(self) -> Result<EmittedStreams, AnalysisError> {
        self.sink.close()?;
        if self.streams.skipped_timestamps > 0 {
            log::warn!(
                "Skipped {} lines with unparsable timestamps",
                self.streams.skipped_timestamps
            );
        }
        Ok(self.streams)
    }
}
