//! Error type for statgraph.
//!
//! Every failure is fatal: errors bubble up to `main`, which logs them and
//! exits. The variants only describe what went wrong, nothing is retried.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors raised while building a report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error on {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with {status}")]
    ToolFailed { tool: String, status: ExitStatus },

    #[error("capture ended before {0}")]
    TruncatedCapture(&'static str),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for statgraph.
pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    /// Wrap an I/O error with the path it happened on.
    pub fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ReportError::File {
            path: path.into(),
            source,
        }
    }
}
