//! Journal retrieval backends.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use lt_core::{FetchError, LogSource};

/// Queries the systemd journal of one unit over the last few days.
#[derive(Debug, Clone)]
pub struct JournalctlSource {
    program: PathBuf,
    unit: String,
    days: u32,
}

impl JournalctlSource {
    pub fn new(program: impl Into<PathBuf>, unit: impl Into<String>, days: u32) -> Self {
        Self {
            program: program.into(),
            unit: unit.into(),
            days,
        }
    }

    /// Arguments passed to journalctl.
    pub fn args(&self) -> Vec<String> {
        vec![
            "--since".to_string(),
            format!("{} days ago", self.days),
            "-u".to_string(),
            self.unit.clone(),
            "--no-pager".to_string(),
            "-o".to_string(),
            "short-iso".to_string(),
        ]
    }
}

impl LogSource for JournalctlSource {
    fn fetch(&self) -> Result<String, FetchError> {
        let program = self.program.display().to_string();
        let output = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| FetchError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(FetchError::Exit {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::debug!(bytes = output.stdout.len(), "journalctl finished");
        String::from_utf8(output.stdout).map_err(|source| FetchError::InvalidUtf8 {
            origin: program,
            source,
        })
    }

    fn describe(&self) -> String {
        format!("{} {}", self.program.display(), self.args().join(" "))
    }
}

/// Reads previously exported journal text from a file, or stdin for `-`.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_stdin(&self) -> bool {
        self.path == Path::new("-")
    }
}

impl LogSource for FileSource {
    fn fetch(&self) -> Result<String, FetchError> {
        let read_error = |source| FetchError::Read {
            path: self.path.clone(),
            source,
        };

        let bytes = if self.is_stdin() {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).map_err(read_error)?;
            buf
        } else {
            std::fs::read(&self.path).map_err(read_error)?
        };

        String::from_utf8(bytes).map_err(|source| FetchError::InvalidUtf8 {
            origin: self.describe(),
            source,
        })
    }

    fn describe(&self) -> String {
        if self.is_stdin() {
            "stdin".to_string()
        } else {
            self.path.display().to_string()
        }
    }
}
