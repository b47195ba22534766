//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Attendance report from systemd-logind events.
///
/// Reads lid, suspend and login events from the journal, finds the first
/// session start and last session end of each day and reports worked hours
/// against a standard working day.
#[derive(Debug, Parser)]
#[command(name = "lt", version, about, long_about = None)]
pub struct Cli {
    /// Number of days of history to report.
    pub days: u32,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Login name whose sessions start the day (defaults to $USER).
    #[arg(short, long)]
    pub user: Option<String>,

    /// Read journal text from a file, or `-` for stdin, instead of journalctl.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Also list the raw events of each day.
    #[arg(long)]
    pub events: bool,

    /// When to color the output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

/// Color output modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal.
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        use std::io::IsTerminal;
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }
}
