//! Core data types for experiment log analysis.

use serde::{Deserialize, Serialize};

/// Normalized timestamp. Virtual milliseconds for Cooja logs, seconds since
/// the Unix epoch for testbed logs.
pub type LogTime = f64;

/// Two-byte link-layer address as printed by the nodes, e.g. `"01:00"`.
pub type Address = String;

/// Write a timestamp the way `Display` renders it, so `1000.0` becomes `1000`
fn serialize_time<S: serde::Serializer>(value: &LogTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Kind of an experiment event line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    /// Event detected and announced by a sensor, logged at the controller
    Event,
    /// Sensor reading collected by the controller
    Collect,
    /// Actuation command sent by the controller
    Command,
    /// Command received by the destination actuator
    Actuation,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Event => "EVENT",
            EventKind::Collect => "COLLECT",
            EventKind::Command => "COMMAND",
            EventKind::Actuation => "ACTUATION",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a classified log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordBody {
    /// Rime stack started/configured with the given address
    NodeBoot { addr_hi: u32, addr_lo: u32 },
    /// Periodic Energest report (tick deltas since the previous report)
    EnergestSample {
        report_count: u64,
        cpu_ticks: u64,
        lpm_ticks: u64,
        tx_ticks: u64,
        rx_ticks: u64,
    },
    /// EVENT / COLLECT / COMMAND / ACTUATION line
    ExperimentEvent {
        kind: EventKind,
        event_source: Address,
        event_seqn: u32,
        subject: Address,
    },
}

/// A log line recognized by the classifier, timestamp still raw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRecord {
    pub time_token: String,
    pub node_id: u32,
    pub body: RecordBody,
}

/// One row of the `-energest.csv` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyCycleSampleRow {
    #[serde(rename = "time", serialize_with = "serialize_time")]
    pub timestamp: LogTime,
    #[serde(rename = "node")]
    pub node_id: u32,
    #[serde(rename = "cnt")]
    pub report_count: u64,
    #[serde(rename = "cpu")]
    pub cpu_ticks: u64,
    #[serde(rename = "lpm")]
    pub lpm_ticks: u64,
    #[serde(rename = "tx")]
    pub tx_ticks: u64,
    #[serde(rename = "rx")]
    pub rx_ticks: u64,
}

/// One row of the `-exp.csv` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentEventRow {
    #[serde(rename = "time", serialize_with = "serialize_time")]
    pub timestamp: LogTime,
    #[serde(rename = "node")]
    pub node_id: u32,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub event_source: Address,
    pub event_seqn: u32,
    #[serde(rename = "sensor")]
    pub subject: Address,
}

impl ExperimentEventRow {
    /// Row fields rendered exactly as they appear in the CSV table.
    ///
    /// Reliability metrics compare rows on this representation so that the
    /// in-memory stream and a re-read CSV dedupe identically.
    pub fn text_fields(&self) -> [String; 6] {
        [
            self.timestamp.to_string(),
            self.node_id.to_string(),
            self.kind.as_str().to_string(),
            self.event_source.clone(),
            self.event_seqn.to_string(),
            self.subject.clone(),
        ]
    }
}

/// Radio duty cycle of a single node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDutyCycle {
    pub node_id: u32,
    /// Percentage; NaN when the node accumulated no CPU+LPM time
    pub duty_cycle_percent: f64,
}

/// Aggregates across the finite per-node duty cycles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyCycleStats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Output of the duty cycle analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyCycleReport {
    pub per_node: Vec<NodeDutyCycle>,
    /// `None` when no node has a finite duty cycle
    pub stats: Option<DutyCycleStats>,
}

/// Command/actuation breakdown for one subject address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectReliability {
    pub subject: Address,
    pub command_count: usize,
    pub actuation_count: usize,
    /// `None` when no command was generated for this subject
    pub actuation_pdr: Option<f64>,
}

/// Output of the reliability analyzer, fields in reporting order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityReport {
    pub event_count: usize,
    pub collect_count: usize,
    pub failed_events: i64,
    /// `None` when no COLLECT row was observed
    pub collect_pdr: Option<f64>,
    pub command_count: usize,
    pub actuation_count: usize,
    /// `None` when no command was generated
    pub average_actuation_pdr: Option<f64>,
    pub per_subject: Vec<SubjectReliability>,
}

/// Run metadata included in exported reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub analysis_timestamp: String,
    pub log_file: String,
    pub regime: String,
    pub known_nodes: Vec<u32>,
    pub sample_rows: usize,
    pub event_rows: usize,
    pub skipped_timestamps: usize,
}

/// Complete analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: AnalysisMetadata,
    pub duty_cycle: DutyCycleReport,
    pub reliability: ReliabilityReport,
}
