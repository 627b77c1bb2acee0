//! Cooperative stop signal for the whole process.
//!
//! Set once from the Ctrl-C handler. The CLI's watch loop blocks on it and the
//! readiness prober stops retrying once it is raised. Never cleared outside tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

static STOP: AtomicBool = AtomicBool::new(false);

/// Raise the stop signal. Safe to call from a signal handler; idempotent.
pub fn request() {
    STOP.store(true, Ordering::Relaxed);
}

pub fn is_requested() -> bool {
    STOP.load(Ordering::Relaxed)
}

/// Block the calling thread until a stop is requested, checking every `poll`.
pub fn wait(poll: Duration) {
    while !is_requested() {
        thread::sleep(poll);
    }
}

#[cfg(test)]
pub fn reset() {
    STOP.store(false, Ordering::Relaxed);
}
