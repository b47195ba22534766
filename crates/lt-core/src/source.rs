//! Retrieval of raw journal text.
//!
//! Fetching is the only side effect of a run. It happens once, before any
//! line is classified, and either yields the complete text or an error.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while retrieving log text.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The log query program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The log query program exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    /// The output was not valid UTF-8.
    #[error("{origin} produced invalid UTF-8")]
    InvalidUtf8 {
        origin: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
    /// A log file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A provider of raw journal text, one entry per line.
pub trait LogSource {
    /// Returns the full log text for this run.
    fn fetch(&self) -> Result<String, FetchError>;

    /// Human-readable origin of the text, for logs and errors.
    fn describe(&self) -> String;
}
