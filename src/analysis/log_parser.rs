//! Line classification for experiment logs.
//!
//! Every line is matched against an ordered pattern table; the first match
//! wins and lines that match nothing are dropped. Each pattern needs a
//! distinct marker token, so at most one pattern can match a given line.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::regime::{RealWorld, Regime, Simulated};
use super::types::*;

/// `[<source>, <seqn>]` event identifier
const EVENT_ID: &str = r"\[(?P<event_source>[0-9a-fA-F]{2}:[0-9a-fA-F]{2}), (?P<event_seqn>\d+)\]";

/// Trailing subject address (collecting sensor or command destination)
const SUBJECT: &str = r"(?P<subject>[0-9a-fA-F]{2}:[0-9a-fA-F]{2})";

/// Tag telling the extractor which record shape a pattern captures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    NodeBoot,
    Energest,
    Experiment(EventKind),
}

impl PatternKind {
    /// Classification priority
    pub const ORDER: [PatternKind; 6] = [
        PatternKind::NodeBoot,
        PatternKind::Energest,
        PatternKind::Experiment(EventKind::Event),
        PatternKind::Experiment(EventKind::Collect),
        PatternKind::Experiment(EventKind::Command),
        PatternKind::Experiment(EventKind::Actuation),
    ];

    /// Full anchored regex for this record shape under `regime`
    fn pattern(self, regime: &dyn Regime) -> String {
        let header = regime.record_header();
        match self {
            PatternKind::NodeBoot => format!("{header}{}", regime.boot_marker()),
            PatternKind::Energest => format!("{header}{}", regime.energest_marker()),
            PatternKind::Experiment(EventKind::Event) => format!("{header}EVENT {EVENT_ID}"),
            PatternKind::Experiment(kind) => {
                format!("{header}{} {EVENT_ID} {SUBJECT}", kind.as_str())
            }
        }
    }

    /// Pull the typed body out of a successful match.
    ///
    /// Returns `None` when a numeric capture does not fit its type, which
    /// the caller treats the same as a failed match.
    fn extract(self, caps: &Captures<'_>) -> Option<RecordBody> {
        match self {
            PatternKind::NodeBoot => Some(RecordBody::NodeBoot {
                addr_hi: number(caps, "hi")?,
                addr_lo: number(caps, "lo")?,
            }),
            PatternKind::Energest => Some(RecordBody::EnergestSample {
                report_count: number(caps, "cnt")?,
                cpu_ticks: number(caps, "cpu")?,
                lpm_ticks: number(caps, "lpm")?,
                tx_ticks: number(caps, "tx")?,
                rx_ticks: number(caps, "rx")?,
            }),
            PatternKind::Experiment(kind) => {
                let event_source = caps.name("event_source")?.as_str().to_string();
                // EVENT lines carry no subject; the source stands in for it
                let subject = match caps.name("subject") {
                    Some(m) => m.as_str().to_string(),
                    None => event_source.clone(),
                };
                Some(RecordBody::ExperimentEvent {
                    kind,
                    event_source,
                    event_seqn: number(caps, "event_seqn")?,
                    subject,
                })
            }
        }
    }
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, name: &str) -> Option<T> {
    caps.name(name)?.as_str().parse().ok()
}

/// A compiled entry of the pattern table
pub struct LogPattern {
    pub kind: PatternKind,
    pub regex: Regex,
}

/// Compiled, priority-ordered pattern table for one regime
pub struct LogPatterns {
    pub entries: Vec<LogPattern>,
}

impl LogPatterns {
    pub fn new(regime: &dyn Regime) -> Self {
        let entries = PatternKind::ORDER
            .iter()
            .map(|&kind| LogPattern {
                kind,
                regex: Regex::new(&kind.pattern(regime)).expect("Invalid record regex"),
            })
            .collect();
        Self { entries }
    }

    /// Classify one raw line.
    ///
    /// Tries each pattern in priority order and returns the first that both
    /// matches and extracts cleanly.
    pub fn classify(&self, line: &str) -> Option<ClassifiedRecord> {
        self.entries.iter().find_map(|entry| {
            let caps = entry.regex.captures(line)?;
            let body = entry.kind.extract(&caps)?;
            Some(ClassifiedRecord {
                time_token: caps.name("time")?.as_str().to_string(),
                node_id: number(&caps, "self_id")?,
                body,
            })
        })
    }
}

/// Cooja pattern table
pub static SIMULATED_PATTERNS: LazyLock<LogPatterns> =
    LazyLock::new(|| LogPatterns::new(&Simulated));

/// Testbed pattern table
pub static TESTBED_PATTERNS: LazyLock<LogPatterns> =
    LazyLock::new(|| LogPatterns::new(&RealWorld));
