//! The organizer as seen by the surrounding shell.
//!
//! `Organizer` bundles the shared state, the relocation engine, the watch
//! coordinator and the settings store behind the small set of user actions a
//! front end needs: select a folder, start/stop watching, organize now, clear the
//! log, reset the counter, and change the pass-through preferences. Status values
//! are re-derived on every query.
//!
//! Settings failures are written to the activity log and never returned.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::activity::{ActivityLog, OrganizerState};
use crate::config::{Settings, SettingsStore};
use crate::errors::OrganizerError;
use crate::organizer::{Relocator, organize_existing};
use crate::watch::WatchCoordinator;

#[derive(Debug)]
pub struct Organizer {
    state: Arc<OrganizerState>,
    relocator: Arc<Relocator>,
    watcher: WatchCoordinator,
    settings: Mutex<Settings>,
    store: Option<SettingsStore>,
    /// Held across snapshot and write so the newest settings always land last.
    save_lock: Mutex<()>,
}

impl Organizer {
    /// Build an organizer from already-loaded settings. Without a store nothing is persisted.
    pub fn new(settings: Settings, store: Option<SettingsStore>) -> Self {
        let state = Arc::new(OrganizerState::new());
        let relocator = Arc::new(Relocator::new(settings.prober(), Arc::clone(&state)));
        let watcher = WatchCoordinator::new(Arc::clone(&relocator));
        Self {
            state,
            relocator,
            watcher,
            settings: Mutex::new(settings),
            store,
            save_lock: Mutex::new(()),
        }
    }

    /// Load settings from `store` (tolerantly) and build an organizer around them.
    pub fn from_store(store: SettingsStore) -> Self {
        let settings = store.load();
        Self::new(settings, Some(store))
    }

    fn settings_lock(&self) -> MutexGuard<'_, Settings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> Settings {
        self.settings_lock().clone()
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.state.log
    }

    pub fn state(&self) -> &Arc<OrganizerState> {
        &self.state
    }

    pub fn files_moved(&self) -> u64 {
        self.state.files_moved.get()
    }

    fn watched_folder(&self) -> Option<PathBuf> {
        self.settings_lock().watched_folder.clone()
    }

    fn save_current(&self, store: &SettingsStore) -> anyhow::Result<()> {
        let _serialized = self.save_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.settings();
        store.save(&snapshot)
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = self.save_current(store) {
            let err = OrganizerError::Settings(format!("{e:#}"));
            warn!(code = err.code(), path = %store.path().display(), "{err}");
            self.state.log.push(format!("Failed to save settings: {e:#}"));
        }
    }

    /// Remember `folder` as the watched folder and persist it.
    ///
    /// An active session keeps running on its original folder.
    pub fn select_folder(&self, folder: &Path) -> Result<PathBuf, OrganizerError> {
        if folder.as_os_str().is_empty() || !folder.is_dir() {
            return Err(OrganizerError::InvalidFolder(folder.to_path_buf()));
        }
        let folder = dunce::canonicalize(folder).unwrap_or_else(|_| folder.to_path_buf());
        self.settings_lock().watched_folder = Some(folder.clone());
        self.persist();
        self.state
            .log
            .push(format!("Selected folder: {}", folder.display()));
        Ok(folder)
    }

    /// Start watching the selected folder, then run the start-up pass when enabled.
    pub fn start_watching(&self) -> Result<PathBuf, OrganizerError> {
        let folder = self.watched_folder().unwrap_or_default();
        let root = self.watcher.start(&folder)?;
        if self.settings_lock().organize_on_start {
            debug!(folder = %root.display(), "organizing existing files on start");
            self.organize_now()?;
        }
        Ok(root)
    }

    /// Returns whether a session was stopped.
    pub fn stop_watching(&self) -> bool {
        self.watcher.stop()
    }

    /// Stop when watching, start otherwise. Returns the new watching state.
    pub fn toggle_watching(&self) -> Result<bool, OrganizerError> {
        if self.watcher.is_watching() {
            self.watcher.stop();
            Ok(false)
        } else {
            self.start_watching().map(|_| true)
        }
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_watching()
    }

    /// Bulk pass over the selected folder; logs the summary line.
    pub fn organize_now(&self) -> Result<usize, OrganizerError> {
        let folder = self.watched_folder().unwrap_or_default();
        let count = organize_existing(&self.relocator, &folder)?;
        self.state
            .log
            .push(format!("Organized {count} existing file(s)."));
        Ok(count)
    }

    pub fn clear_log(&self) {
        self.state.log.clear();
        self.state.log.push("Log cleared.");
    }

    pub fn reset_counter(&self) {
        self.state.files_moved.reset();
        self.state.log.push("File counters reset.");
    }

    pub fn set_theme(&self, theme: &str) {
        self.settings_lock().theme = theme.to_string();
        self.persist();
    }

    pub fn set_show_tips(&self, show: bool) {
        self.settings_lock().show_tips = show;
        self.persist();
    }

    pub fn set_organize_on_start(&self, enabled: bool) {
        self.settings_lock().organize_on_start = enabled;
        self.persist();
    }

    /// Persist the run-at-startup preference. Registration with the OS is left
    /// to the shell; a failure to record the flag is reported in the log.
    pub fn set_run_on_startup(&self, enabled: bool) {
        self.settings_lock().run_on_startup = enabled;
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = self.save_current(store) {
            warn!(path = %store.path().display(), error = %format!("{e:#}"), "startup setting not saved");
            self.state
                .log
                .push(format!("Failed to update startup setting: {e:#}"));
        }
    }

    /// `Watching: <folder>` or `Not watching. Folder: <folder|(no folder selected)>`.
    pub fn status_text(&self) -> String {
        if let Some(root) = self.watcher.watched_folder() {
            return format!("Watching: {}", root.display());
        }
        match self.watched_folder() {
            Some(folder) => format!("Not watching. Folder: {}", folder.display()),
            None => "Not watching. Folder: (no folder selected)".to_string(),
        }
    }

    pub fn stats_text(&self) -> String {
        format!("Files moved: {}", self.files_moved())
    }

    /// Stop any active watch, then flush settings.
    pub fn shutdown(&self) {
        self.watcher.stop();
        self.persist();
    }
}
