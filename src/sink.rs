//! Output tables.
//!
//! The pipeline appends rows through [`RecordSink`]; [`CsvSink`] writes the
//! `-energest.csv` and `-exp.csv` tables, [`MemorySink`] just keeps them.
//! The duty-cycle table is written separately once the analysis is done.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::analysis::types::{DutyCycleSampleRow, ExperimentEventRow, NodeDutyCycle};
use crate::error::AnalysisError;

/// Append-only destination for the two row streams
pub trait RecordSink {
    fn push_sample(&mut self, row: &DutyCycleSampleRow) -> Result<(), AnalysisError>;
    fn push_event(&mut self, row: &ExperimentEventRow) -> Result<(), AnalysisError>;
    /// Flush everything; called once after the last row.
    fn close(&mut self) -> Result<(), AnalysisError>;
}

/// Sink that keeps rows in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub samples: Vec<DutyCycleSampleRow>,
    pub events: Vec<ExperimentEventRow>,
    pub closed: bool,
}

impl RecordSink for MemorySink {
    fn push_sample(&mut self, row: &DutyCycleSampleRow) -> Result<(), AnalysisError> {
        self.samples.push(row.clone());
        Ok(())
    }

    fn push_event(&mut self, row: &ExperimentEventRow) -> Result<(), AnalysisError> {
        self.events.push(row.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), AnalysisError> {
        self.closed = true;
        Ok(())
    }
}

/// Paths of the three tables produced for one log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub samples: PathBuf,
    pub events: PathBuf,
    pub duty_cycle: PathBuf,
}

impl OutputPaths {
    /// `<dir>/<stem>-energest.csv`, `<dir>/<stem>-exp.csv`, `<dir>/<stem>-dc.csv`,
    /// where `<dir>` defaults to the log file's directory.
    pub fn for_log(log_file: &Path, output_dir: Option<&Path>) -> Self {
        let dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| log_file.parent().map(Path::to_path_buf).unwrap_or_default());
        let stem = log_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "log".to_string());

        Self {
            samples: dir.join(format!("{stem}-energest.csv")),
            events: dir.join(format!("{stem}-exp.csv")),
            duty_cycle: dir.join(format!("{stem}-dc.csv")),
        }
    }
}

fn csv_err(path: &Path) -> impl FnOnce(csv::Error) -> AnalysisError + '_ {
    move |source| AnalysisError::Csv { path: path.to_path_buf(), source }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> AnalysisError + '_ {
    move |source| AnalysisError::Io { path: path.to_path_buf(), source }
}

/// Header rows of the two streamed tables
pub const SAMPLES_HEADER: [&str; 7] = ["time", "node", "cnt", "cpu", "lpm", "tx", "rx"];
pub const EVENTS_HEADER: [&str; 6] =
    ["time", "node", "type", "event_source", "event_seqn", "sensor"];

/// Writer with an explicit header row, written even if no row follows
fn create_writer<const N: usize>(
    path: &Path,
    header: [&str; N],
) -> Result<csv::Writer<File>, AnalysisError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err(path))?;
    writer.write_record(header).map_err(csv_err(path))?;
    Ok(writer)
}

/// Sink writing the samples and events tables.
///
/// Both writers are owned by the sink, so the files are flushed and closed
/// when it is dropped, whether or not the run succeeded.
pub struct CsvSink {
    paths: OutputPaths,
    samples: csv::Writer<File>,
    events: csv::Writer<File>,
}

impl CsvSink {
    pub fn create(paths: OutputPaths) -> Result<Self, AnalysisError> {
        let samples = create_writer(&paths.samples, SAMPLES_HEADER)?;
        let events = create_writer(&paths.events, EVENTS_HEADER)?;
        Ok(Self { paths, samples, events })
    }
}

impl RecordSink for CsvSink {
    fn push_sample(&mut self, row: &DutyCycleSampleRow) -> Result<(), AnalysisError> {
        self.samples.serialize(row).map_err(csv_err(&self.paths.samples))
    }

    fn push_event(&mut self, row: &ExperimentEventRow) -> Result<(), AnalysisError> {
        self.events.serialize(row).map_err(csv_err(&self.paths.events))
    }

    fn close(&mut self) -> Result<(), AnalysisError> {
        self.samples.flush().map_err(io_err(&self.paths.samples))?;
        self.events.flush().map_err(io_err(&self.paths.events))?;
        Ok(())
    }
}

/// Render a duty cycle the way the `-dc.csv` table stores it
pub fn format_duty_cycle(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value:.3}")
    }
}

/// Write the `node,dc` table
pub fn write_duty_cycle_csv(path: &Path, per_node: &[NodeDutyCycle]) -> Result<(), AnalysisError> {
    let mut writer = create_writer(path, ["node", "dc"])?;
    for node in per_node {
        writer
            .write_record([node.node_id.to_string(), format_duty_cycle(node.duty_cycle_percent)])
            .map_err(csv_err(path))?;
    }
    writer.flush().map_err(io_err(path))?;
    log::debug!("Duty cycle table written to {}", path.display());
    Ok(())
}

/// Read a `-energest.csv` table back
pub fn read_samples_csv(path: &Path) -> Result<Vec<DutyCycleSampleRow>, AnalysisError> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_err(path))?;
    reader
        .deserialize()
        .collect::<Result<Vec<_>, csv::Error>>()
        .map_err(csv_err(path))
}

/// Read a `-exp.csv` table back
pub fn read_events_csv(path: &Path) -> Result<Vec<ExperimentEventRow>, AnalysisError> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_err(path))?;
    reader
        .deserialize()
        .collect::<Result<Vec<_>, csv::Error>>()
        .map_err(csv_err(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::EventKind;
    use tempfile::tempdir;

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::for_log(Path::new("/data/run1/etc.log"), None);
        assert_eq!(paths.samples, PathBuf::from("/data/run1/etc-energest.csv"));
        assert_eq!(paths.events, PathBuf::from("/data/run1/etc-exp.csv"));
        assert_eq!(paths.duty_cycle, PathBuf::from("/data/run1/etc-dc.csv"));

        let paths = OutputPaths::for_log(Path::new("/data/run1/etc.log"), Some(Path::new("/out")));
        assert_eq!(paths.samples, PathBuf::from("/out/etc-energest.csv"));
    }

    #[test]
    fn test_csv_sink_headers_and_rows() {
        let dir = tempdir().unwrap();
        let paths = OutputPaths::for_log(&dir.path().join("run.log"), None);
        let mut sink = CsvSink::create(paths.clone()).unwrap();

        sink.push_sample(&DutyCycleSampleRow {
            timestamp: 2000.0,
            node_id: 3,
            report_count: 2,
            cpu_ticks: 50,
            lpm_ticks: 50,
            tx_ticks: 0,
            rx_ticks: 0,
        })
        .unwrap();
        sink.push_event(&ExperimentEventRow {
            timestamp: 3000.0,
            node_id: 1,
            kind: EventKind::Command,
            event_source: "02:00".into(),
            event_seqn: 1,
            subject: "0a:00".into(),
        })
        .unwrap();
        sink.close().unwrap();

        let samples = std::fs::read_to_string(&paths.samples).unwrap();
        let mut lines = samples.lines();
        assert_eq!(lines.next(), Some("time,node,cnt,cpu,lpm,tx,rx"));
        assert_eq!(lines.next(), Some("2000,3,2,50,50,0,0"));

        let events = std::fs::read_to_string(&paths.events).unwrap();
        let mut lines = events.lines();
        assert_eq!(lines.next(), Some("time,node,type,event_source,event_seqn,sensor"));
        assert_eq!(lines.next(), Some("3000,1,COMMAND,02:00,1,0a:00"));

        let samples = read_samples_csv(&paths.samples).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].timestamp, 2000.0);
        let events = read_events_csv(&paths.events).unwrap();
        assert_eq!(events[0].kind, EventKind::Command);
        assert_eq!(events[0].timestamp, 3000.0);
    }

    #[test]
    fn test_duty_cycle_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run-dc.csv");
        write_duty_cycle_csv(
            &path,
            &[
                NodeDutyCycle { node_id: 1, duty_cycle_percent: 2.0 / 3.0 },
                NodeDutyCycle { node_id: 2, duty_cycle_percent: f64::NAN },
            ],
        )
        .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "node,dc\n1,0.667\n2,nan\n");
    }
}
