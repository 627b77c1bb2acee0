//! Readiness probing for freshly created files.
//!
//! A screenshot tool may still hold the file open when the create notification
//! arrives. The prober repeatedly tries to open the file exclusively and reports
//! `Ready` as soon as that succeeds. Intermediate failures (locked, transient
//! permission errors) are expected and only the final exhaustion is reported.
//!
//! Notes:
//! - Blocks the calling thread between attempts; never call it on the
//!   notification-delivery thread.
//! - A file that disappears while probing is reported as `Gone` so callers can
//!   treat it as already handled instead of waiting out the budget.

use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::trace;

use crate::config::{DEFAULT_READY_ATTEMPTS, DEFAULT_READY_INTERVAL};
use crate::platform::try_open_exclusive;
use crate::shutdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Opened exclusively and released; safe to move.
    Ready,
    /// Still unavailable after the final attempt.
    TimedOut,
    /// The file no longer exists.
    Gone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessProber {
    attempts: u32,
    interval: Duration,
}

impl Default for ReadinessProber {
    fn default() -> Self {
        Self::new(DEFAULT_READY_ATTEMPTS, DEFAULT_READY_INTERVAL)
    }
}

impl ReadinessProber {
    /// `attempts` is clamped to at least one.
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            interval,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Worst-case time spent before reporting `TimedOut`.
    pub fn budget(&self) -> Duration {
        self.interval * self.attempts.saturating_sub(1)
    }

    pub fn await_readiness(&self, path: &Path) -> Readiness {
        for attempt in 1..=self.attempts {
            match try_open_exclusive(path) {
                Ok(()) => {
                    trace!(path = %path.display(), attempt, "file ready");
                    return Readiness::Ready;
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    trace!(path = %path.display(), attempt, "file vanished while probing");
                    return Readiness::Gone;
                }
                Err(e) => {
                    trace!(path = %path.display(), attempt, error = %e, "file not ready");
                }
            }
            if attempt == self.attempts || shutdown::is_requested() {
                break;
            }
            thread::sleep(self.interval);
        }
        Readiness::TimedOut
    }
}
