//! Shared organizer state: the moved-files counter and the activity log.
//!
//! One `OrganizerState` is created per organizer and handed (via `Arc`) to every
//! relocation worker. Both members tolerate concurrent use:
//! - the counter is a single atomic, so increments are never lost;
//! - the log is a bounded, newest-first ring guarded by a mutex that is held only
//!   for the push itself.

use chrono::Local;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

use crate::organizer::{RelocationOutcome, RelocationRequest, SkipReason};

/// Maximum number of activity lines retained.
pub const MAX_LOG_ENTRIES: usize = 600;

/// Process-wide count of successful moves; reset only on explicit request.
#[derive(Debug, Default)]
pub struct FilesMovedCounter(AtomicU64);

impl FilesMovedCounter {
    /// Increment and return the new total.
    pub fn increment(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Release);
    }
}

/// Bounded activity log; newest line first, oldest evicted past capacity.
#[derive(Debug)]
pub struct ActivityLog {
    entries: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(MAX_LOG_ENTRIES)
    }
}

impl ActivityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stamp `message` with the local time (`HH:MM:SS  message`), insert it at
    /// the front and return the stored line.
    pub fn push(&self, message: impl AsRef<str>) -> String {
        let message = message.as_ref();
        let line = format!("{}  {}", Local::now().format("%H:%M:%S"), message);
        info!(target: "activity", "{message}");
        let mut entries = self.lock();
        entries.push_front(line.clone());
        while entries.len() > self.capacity {
            entries.pop_back();
        }
        line
    }

    /// Snapshot, newest first.
    pub fn entries(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// State shared by the watch coordinator, the bulk organizer and every worker.
#[derive(Debug, Default)]
pub struct OrganizerState {
    pub files_moved: FilesMovedCounter,
    pub log: ActivityLog,
}

impl OrganizerState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Render one relocation outcome as an activity message (without timestamp).
pub fn describe_outcome(request: &RelocationRequest, outcome: &RelocationOutcome) -> String {
    let name = request.file_name();
    match outcome {
        RelocationOutcome::Moved(dest) => {
            let folder = dest
                .parent()
                .and_then(|p| p.file_name())
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            let new_name = dest
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            if new_name == name {
                format!("Moved \"{name}\" → \"{folder}\"")
            } else {
                format!("Moved \"{name}\" → \"{folder}\" as \"{new_name}\"")
            }
        }
        RelocationOutcome::Skipped(SkipReason::NotReady) => {
            format!("Skipped \"{name}\" because it was never ready to be read.")
        }
        RelocationOutcome::Skipped(SkipReason::AlreadyHandled) => {
            format!("Skipped \"{name}\" because it was already moved.")
        }
        RelocationOutcome::Failed(reason) => format!("Error moving \"{name}\": {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organizer::RequestOrigin;
    use std::path::PathBuf;

    fn request() -> RelocationRequest {
        RelocationRequest::new("/shots/shot.png", "/shots", RequestOrigin::Watch)
    }

    #[test]
    fn moved_line_names_the_date_folder() {
        let out = RelocationOutcome::Moved(PathBuf::from("/shots/2024-03-05/shot.png"));
        assert_eq!(describe_outcome(&request(), &out), "Moved \"shot.png\" → \"2024-03-05\"");
    }

    #[test]
    fn renamed_move_mentions_the_new_name() {
        let out = RelocationOutcome::Moved(PathBuf::from("/shots/2024-03-05/shot_1.png"));
        assert_eq!(
            describe_outcome(&request(), &out),
            "Moved \"shot.png\" → \"2024-03-05\" as \"shot_1.png\""
        );
    }

    #[test]
    fn skip_and_failure_lines() {
        assert_eq!(
            describe_outcome(&request(), &RelocationOutcome::Skipped(SkipReason::NotReady)),
            "Skipped \"shot.png\" because it was never ready to be read."
        );
        assert_eq!(
            describe_outcome(&request(), &RelocationOutcome::Failed("disk full".into())),
            "Error moving \"shot.png\": disk full"
        );
    }

    #[test]
    fn counter_reset_returns_to_zero() {
        let c = FilesMovedCounter::default();
        assert_eq!(c.increment(), 1);
        assert_eq!(c.increment(), 2);
        c.reset();
        assert_eq!(c.get(), 0);
    }
}
