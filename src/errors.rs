//! Typed error definitions for screenshot_organizer.
//! Provides the small set of well-known failure modes surfaced to the user and to logs.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrganizerError {
    /// Folder empty or missing when a watch session is requested.
    #[error("{}", invalid_folder_message(.0))]
    InvalidFolder(PathBuf),

    /// Folder empty or missing when a bulk organize pass is requested.
    #[error("Please select a valid screenshots folder first.")]
    NoFolderSelected,

    #[error("Failed to start watching {folder}: {reason}")]
    WatchCreationFailed { folder: PathBuf, reason: String },

    #[error("File {0} was not ready after multiple attempts")]
    NotReady(PathBuf),

    #[error("Failed to move {path}: {reason}")]
    RelocationFailed { path: PathBuf, reason: String },

    #[error("Settings error: {0}")]
    Settings(String),
}

fn invalid_folder_message(folder: &Path) -> String {
    if folder.as_os_str().is_empty() {
        "Please select a screenshots folder first.".to_string()
    } else {
        format!(
            "The selected folder does not exist anymore. Please choose a valid folder. ({})",
            folder.display()
        )
    }
}

impl OrganizerError {
    /// Stable numeric code used in structured log fields and exit statuses.
    pub fn code(&self) -> i32 {
        match self {
            OrganizerError::InvalidFolder(_) => 10,
            OrganizerError::NoFolderSelected => 11,
            OrganizerError::WatchCreationFailed { .. } => 20,
            OrganizerError::NotReady(_) => 30,
            OrganizerError::RelocationFailed { .. } => 31,
            OrganizerError::Settings(_) => 40,
        }
    }
}
