//! Core settings types.
//! - Settings holds the persisted values plus runtime tuning, with defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::{DEFAULT_READY_ATTEMPTS, DEFAULT_READY_INTERVAL, DEFAULT_THEME};
use crate::organizer::ReadinessProber;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Activity lines and lifecycle messages (default)
    #[default]
    Normal,
    /// Per-event diagnostics
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Settings loaded at startup and written back after relevant changes.
///
/// `theme`, `show_tips` and `run_on_startup` belong to the shell around the
/// organizer; they are carried through untouched so a save never loses them.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Last folder the user selected for watching
    pub watched_folder: Option<PathBuf>,
    /// Display theme name
    pub theme: String,
    /// Show the tip dialog at startup
    pub show_tips: bool,
    /// Register the program to run at login
    pub run_on_startup: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// How many times the readiness probe tries to open a new file
    pub ready_attempts: u32,
    /// Delay between readiness attempts
    pub ready_interval: Duration,
    /// Run a bulk pass right after a watch session starts
    pub organize_on_start: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            watched_folder: None,
            theme: DEFAULT_THEME.to_string(),
            show_tips: true,
            run_on_startup: true,
            log_level: LogLevel::Normal,
            log_file: None,
            ready_attempts: DEFAULT_READY_ATTEMPTS,
            ready_interval: DEFAULT_READY_INTERVAL,
            organize_on_start: false,
        }
    }
}

impl Settings {
    /// Readiness prober tuned by these settings.
    pub fn prober(&self) -> ReadinessProber {
        ReadinessProber::new(self.ready_attempts, self.ready_interval)
    }
}
