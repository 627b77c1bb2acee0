//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - Logging flags override the stored settings for this run only.
//! - `--folder` and `--organize-on-start` change the stored settings.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::{LogLevel, Settings};

/// Watch a screenshots folder and file new images into per-day subfolders.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Sort new screenshots into YYYY-MM-DD folders as they appear"
)]
pub struct Args {
    /// Folder to watch; becomes the stored folder.
    #[arg(long, short = 'f', value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub folder: Option<PathBuf>,

    /// Move the images already in the folder, then continue.
    #[arg(long, help = "Organize the images already present in the folder")]
    pub organize: bool,

    /// Exit instead of watching for new files.
    #[arg(long, help = "Do not watch; exit after the requested actions")]
    pub no_watch: bool,

    /// Remember to run a bulk pass each time watching starts.
    #[arg(long, help = "Organize existing images whenever watching starts (saved)")]
    pub organize_on_start: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print the settings file location (or SCREENSHOT_ORGANIZER_CONFIG if set), then exit.
    #[arg(long, help = "Print the settings file location and exit")]
    pub print_config: bool,
}

impl Args {
    /// `--folder` with shell quoting mistakes removed.
    pub fn resolved_folder(&self) -> Option<PathBuf> {
        self.folder
            .as_deref()
            .map(|p| sanitize_str(&p.to_string_lossy()))
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use stored setting).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply the run-only logging overrides to loaded settings. No-ops for unset flags.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(level) = self.effective_log_level() {
            settings.log_level = level;
        }
        if let Some(file) = &self.log_file {
            settings.log_file = Some(file.clone());
        }
    }
}

// Trim surrounding quotes left behind by PowerShell/CMD quoting, plus one trailing separator.
fn sanitize_str(s: &str) -> PathBuf {
    let trimmed = s.trim();
    let quoted = trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')));
    let mut inner = if quoted {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.trim_matches(|c| c == '\'' || c == '"').to_string()
    };

    if (inner.ends_with('\\') || inner.ends_with('/')) && inner.len() > 1 {
        inner.pop();
    }
    PathBuf::from(inner)
}

pub fn parse() -> Args {
    Args::parse()
}
