//! XML settings store.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Saves the full settings document atomically after each relevant change.
//!
//! Notes:
//! - Loading never fails the caller: a missing file yields defaults, a malformed
//!   or unknown-field document is reported with a warning and defaults are used.
//! - A saved watched folder that no longer exists is dropped on load.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use quick_xml::se::to_string as to_xml_string;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::paths::{default_config_path, path_has_symlink_ancestor};
use super::types::{LogLevel, Settings};
use crate::platform::write_file_atomic_private;

/// Struct mirroring the XML document for (de)serialization.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    watched_folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    show_tips: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    run_on_startup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    log_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    log_file: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_u64_trimmed_opt"
    )]
    ready_attempts: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_u64_trimmed_opt"
    )]
    ready_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    organize_on_start: Option<bool>,
}

// Custom deserializer that trims surrounding whitespace for optional u64
fn de_u64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| s.trim().parse::<u64>().ok()))
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

impl From<XmlSettings> for Settings {
    fn from(parsed: XmlSettings) -> Self {
        let mut s = Settings::default();

        if let Some(folder) = non_empty(parsed.watched_folder.as_deref()) {
            let folder = PathBuf::from(folder);
            if folder.is_dir() {
                s.watched_folder = Some(folder);
            } else {
                debug!(folder = %folder.display(), "saved watched folder no longer exists; ignoring");
            }
        }
        if let Some(theme) = non_empty(parsed.theme.as_deref()) {
            s.theme = theme.to_string();
        }
        if let Some(v) = parsed.show_tips {
            s.show_tips = v;
        }
        if let Some(v) = parsed.run_on_startup {
            s.run_on_startup = v;
        }
        if let Some(level) = parsed.log_level.as_deref().and_then(LogLevel::parse) {
            s.log_level = level;
        }
        s.log_file = non_empty(parsed.log_file.as_deref()).map(PathBuf::from);
        if let Some(n) = parsed.ready_attempts.filter(|n| *n > 0) {
            s.ready_attempts = u32::try_from(n).unwrap_or(u32::MAX);
        }
        if let Some(ms) = parsed.ready_interval_ms {
            s.ready_interval = Duration::from_millis(ms);
        }
        if let Some(v) = parsed.organize_on_start {
            s.organize_on_start = v;
        }
        s
    }
}

impl From<&Settings> for XmlSettings {
    fn from(s: &Settings) -> Self {
        Self {
            watched_folder: s
                .watched_folder
                .as_ref()
                .map(|p| p.display().to_string()),
            theme: Some(s.theme.clone()),
            show_tips: Some(s.show_tips),
            run_on_startup: Some(s.run_on_startup),
            log_level: Some(s.log_level.to_string()),
            log_file: s.log_file.as_ref().map(|p| p.display().to_string()),
            ready_attempts: Some(u64::from(s.ready_attempts)),
            ready_interval_ms: Some(u64::try_from(s.ready_interval.as_millis()).unwrap_or(u64::MAX)),
            organize_on_start: Some(s.organize_on_start),
        }
    }
}

/// Reads and writes the settings document at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `$SCREENSHOT_ORGANIZER_CONFIG` or the OS default location.
    pub fn at_default_location() -> Option<Self> {
        default_config_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict load: errors on unreadable or malformed documents.
    pub fn try_load(&self) -> Result<Option<Settings>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("read settings '{}'", self.path.display()))?;
        let parsed: XmlSettings = from_xml_str(&contents)
            .with_context(|| format!("parse settings '{}'", self.path.display()))?;
        Ok(Some(parsed.into()))
    }

    /// Tolerant load used at startup; never fails.
    pub fn load(&self) -> Settings {
        match self.try_load() {
            Ok(Some(s)) => {
                debug!(path = %self.path.display(), "settings loaded");
                s
            }
            Ok(None) => {
                debug!(path = %self.path.display(), "no settings file; using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "settings unreadable; using defaults");
                Settings::default()
            }
        }
    }

    /// Persist the whole settings document (atomic replace).
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if path_has_symlink_ancestor(&self.path)? {
            anyhow::bail!(
                "Refusing to write settings: ancestor of {} is a symlink",
                self.path.display()
            );
        }
        let body = to_xml_string(&XmlSettings::from(settings))
            .with_context(|| format!("serialize settings for '{}'", self.path.display()))?;
        let document = format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n{body}\n");
        write_file_atomic_private(&self.path, document.as_bytes())?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
