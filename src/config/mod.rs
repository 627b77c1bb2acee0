//! Settings module.
//! Provides the settings types, default paths, and the XML-backed settings store.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{LogLevel, Settings};
pub use xml::SettingsStore;

/// Environment variable that points the settings store at an explicit file.
pub const CONFIG_ENV_VAR: &str = "SCREENSHOT_ORGANIZER_CONFIG";

/// Directory name used under the platform config/data dirs.
pub const APP_DIR_NAME: &str = "screenshot_organizer";

pub const DEFAULT_THEME: &str = "Dark";
pub const DEFAULT_READY_ATTEMPTS: u32 = 10;
pub const DEFAULT_READY_INTERVAL: std::time::Duration = std::time::Duration::from_millis(500);
