//! Event delivery and actuation reliability.
//!
//! A logical event is identified by `(event_source, event_seqn)`. The
//! controller logs EVENT when it hears about one, COLLECT for every sensor
//! reading it gathers in the resulting collection round, and COMMAND for
//! every actuation it sends; actuators log ACTUATION on reception.
//!
//! Rows are compared on their CSV text so that results are the same
//! whether the stream comes straight from the parser or from a re-read
//! table.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::types::*;

type EventId = (String, String);
type Delivery = (String, String, String);

/// Round to 4 decimals, ties to even on the exact binary value
fn round4(value: f64) -> f64 {
    format!("{value:.4}").parse().unwrap_or(value)
}

/// Compute every reliability metric over a closed event stream.
pub fn analyze_reliability(events: &[ExperimentEventRow], num_sensors: usize) -> ReliabilityReport {
    let mut event_rows: HashSet<[String; 6]> = HashSet::new();
    let mut collect_groups: BTreeMap<EventId, usize> = BTreeMap::new();
    let mut collect_rows: HashSet<[String; 6]> = HashSet::new();
    let mut duplicate_collects = 0usize;
    let mut commands: BTreeSet<Delivery> = BTreeSet::new();
    let mut actuations: BTreeSet<Delivery> = BTreeSet::new();
    let mut subjects: BTreeSet<String> = BTreeSet::new();

    for row in events {
        let fields = row.text_fields();
        let [_, _, _, source, seqn, subject] = fields.clone();
        subjects.insert(subject.clone());

        match row.kind {
            EventKind::Event => {
                event_rows.insert(fields);
            }
            EventKind::Collect => {
                *collect_groups.entry((source, seqn)).or_default() += 1;
                if !collect_rows.insert(fields) {
                    duplicate_collects += 1;
                }
            }
            EventKind::Command => {
                commands.insert((source, seqn, subject));
            }
            EventKind::Actuation => {
                actuations.insert((source, seqn, subject));
            }
        }
    }

    // Identical COLLECT rows still count towards their round's size
    if duplicate_collects > 0 {
        log::warn!(
            "{} COLLECT rows are exact duplicates; they are counted in the collect PDR",
            duplicate_collects
        );
    }

    let event_count = event_rows.len();
    let collect_count = collect_groups.len();

    let collect_pdr = if collect_groups.is_empty() || num_sensors == 0 {
        None
    } else {
        let received: usize = collect_groups.values().sum();
        let mean_round = received as f64 / collect_groups.len() as f64;
        Some(round4(mean_round / num_sensors as f64))
    };

    let command_count = commands.len();
    let actuation_count = actuations.len();
    let average_actuation_pdr =
        (command_count > 0).then(|| round4(actuation_count as f64 / command_count as f64));

    let per_subject = subjects
        .into_iter()
        .map(|subject| {
            let command_count = commands.iter().filter(|(_, _, s)| *s == subject).count();
            let actuation_count = actuations.iter().filter(|(_, _, s)| *s == subject).count();
            SubjectReliability {
                actuation_pdr: (command_count > 0)
                    .then(|| round4(actuation_count as f64 / command_count as f64)),
                subject,
                command_count,
                actuation_count,
            }
        })
        .collect();

    ReliabilityReport {
        event_count,
        collect_count,
        failed_events: event_count as i64 - collect_count as i64,
        collect_pdr,
        command_count,
        actuation_count,
        average_actuation_pdr,
        per_subject,
    }
}
