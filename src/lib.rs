//! Core library for `screenshot_organizer`.
//!
//! Watches a folder for new image files and moves each into a `YYYY-MM-DD`
//! subfolder named after its creation date. The relocation engine is shared by
//! the folder watch and the bulk "organize now" pass, and is safe to run from
//! many threads at once.
//!
//! Typical use goes through [`Organizer`]:
//!
//! ```no_run
//! use screenshot_organizer::{Organizer, SettingsStore};
//!
//! let store = SettingsStore::at_default_location().expect("config dir");
//! let organizer = Organizer::from_store(store);
//! organizer.select_folder("/home/me/Pictures/Screenshots".as_ref())?;
//! organizer.start_watching()?;
//! println!("{}", organizer.status_text());
//! organizer.shutdown();
//! # Ok::<(), screenshot_organizer::OrganizerError>(())
//! ```

pub mod activity;
pub mod cli;
pub mod config;
pub mod controller;
pub mod errors;
pub mod organizer;
pub mod output;
pub mod platform;
pub mod shutdown;
pub mod watch;

pub use activity::{ActivityLog, FilesMovedCounter, MAX_LOG_ENTRIES, OrganizerState};
pub use config::{
    LogLevel, Settings, SettingsStore, default_config_path, default_log_path,
    path_has_symlink_ancestor,
};
pub use controller::Organizer;
pub use errors::OrganizerError;
pub use organizer::{
    Readiness, ReadinessProber, RelocationOutcome, RelocationRequest, Relocator, RequestOrigin,
    SkipReason, is_image_file, organize_existing, resolve_destination,
};
pub use watch::WatchCoordinator;
