//! Library error type.

use std::path::PathBuf;

use crate::analysis::regime::TimestampError;

/// Errors that can stop an analysis run
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("The logfile argument {} does not exist", path.display())]
    InputNotFound { path: PathBuf },

    #[error("The logfile argument {} is not a file", path.display())]
    InputNotAFile { path: PathBuf },

    #[error("line {line}: {source}")]
    UnparsableTimestamp {
        line: usize,
        #[source]
        source: TimestampError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
