//! Relocation engine: one image file from the watched root into its date folder.
//!
//! Steps:
//! 1) Probe readiness (bounded retries); a timeout skips the file, a vanished
//!    source counts as already handled.
//! 2) Read the creation date, falling back to today.
//! 3) Resolve a free destination and move with a no-clobber rename. When another
//!    mover wins the race for the same name, the destination is recomputed.
//!
//! The engine returns a structured outcome. `relocate_and_record` is the caller-side
//! helper that renders the outcome into the shared activity log.

use chrono::{DateTime, Local, NaiveDate};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::destination::resolve_destination;
use super::hints::describe_io_error;
use super::readiness::{Readiness, ReadinessProber};
use crate::activity::{OrganizerState, describe_outcome};
use crate::errors::OrganizerError;
use crate::platform::rename_no_clobber;

/// Upper bound on destination recomputation when concurrent movers collide.
const MAX_PLACEMENT_ATTEMPTS: u32 = 64;

/// Which producer discovered the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    Watch,
    Bulk,
}

/// One candidate file, consumed exactly once by the engine.
#[derive(Debug, Clone)]
pub struct RelocationRequest {
    source: PathBuf,
    root: PathBuf,
    discovered_at: DateTime<Local>,
    origin: RequestOrigin,
}

impl RelocationRequest {
    pub fn new(source: impl Into<PathBuf>, root: impl Into<PathBuf>, origin: RequestOrigin) -> Self {
        Self {
            source: source.into(),
            root: root.into(),
            discovered_at: Local::now(),
            origin,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn discovered_at(&self) -> DateTime<Local> {
        self.discovered_at
    }

    pub fn origin(&self) -> RequestOrigin {
        self.origin
    }

    /// Display name of the source file (lossy).
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Still locked by another process after every readiness attempt.
    NotReady,
    /// The source no longer exists; another event or pass moved it.
    AlreadyHandled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocationOutcome {
    Moved(PathBuf),
    Skipped(SkipReason),
    Failed(String),
}

impl RelocationOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, RelocationOutcome::Moved(_))
    }

    /// Typed error for outcomes that represent a failure mode worth reporting.
    pub fn to_error(&self, source: &Path) -> Option<OrganizerError> {
        match self {
            RelocationOutcome::Skipped(SkipReason::NotReady) => {
                Some(OrganizerError::NotReady(source.to_path_buf()))
            }
            RelocationOutcome::Failed(reason) => Some(OrganizerError::RelocationFailed {
                path: source.to_path_buf(),
                reason: reason.clone(),
            }),
            _ => None,
        }
    }
}

/// Creation date of `path` in local time; today when the platform cannot tell.
pub fn file_creation_date(path: &Path) -> NaiveDate {
    fs::metadata(path)
        .and_then(|m| m.created())
        .map(|t| DateTime::<Local>::from(t).date_naive())
        .unwrap_or_else(|e| {
            debug!(path = %path.display(), error = %e, "creation time unavailable; using today");
            Local::now().date_naive()
        })
}

/// Shared, reentrant relocation core. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct Relocator {
    prober: ReadinessProber,
    state: Arc<OrganizerState>,
}

impl Relocator {
    pub fn new(prober: ReadinessProber, state: Arc<OrganizerState>) -> Self {
        Self { prober, state }
    }

    pub fn state(&self) -> &Arc<OrganizerState> {
        &self.state
    }

    /// Process one request. Never panics on I/O failures; every failure is an outcome.
    pub fn relocate(&self, request: &RelocationRequest) -> RelocationOutcome {
        let source = request.source();
        let Some(name) = source.file_name() else {
            return RelocationOutcome::Failed(format!(
                "'{}' does not name a file",
                source.display()
            ));
        };

        match self.prober.await_readiness(source) {
            Readiness::Ready => {}
            Readiness::TimedOut => return RelocationOutcome::Skipped(SkipReason::NotReady),
            Readiness::Gone => return RelocationOutcome::Skipped(SkipReason::AlreadyHandled),
        }

        let date = file_creation_date(source);
        match self.place(source, name, date, request.root()) {
            Ok(dest) => {
                let total = self.state.files_moved.increment();
                debug!(src = %source.display(), dst = %dest.display(), total, "moved");
                RelocationOutcome::Moved(dest)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound || !source.exists() => {
                debug!(src = %source.display(), error = %e, "source vanished before the move");
                RelocationOutcome::Skipped(SkipReason::AlreadyHandled)
            }
            Err(e) => RelocationOutcome::Failed(describe_io_error("move", source, &e)),
        }
    }

    /// Relocate and append the rendered outcome to the activity log.
    pub fn relocate_and_record(&self, request: &RelocationRequest) -> RelocationOutcome {
        let outcome = self.relocate(request);
        if let Some(err) = outcome.to_error(request.source()) {
            let waited_ms = (Local::now() - request.discovered_at()).num_milliseconds();
            match &err {
                OrganizerError::NotReady(_) => {
                    warn!(code = err.code(), origin = ?request.origin(), waited_ms, "{err}")
                }
                _ => error!(code = err.code(), origin = ?request.origin(), waited_ms, "{err}"),
            }
        }
        self.state.log.push(describe_outcome(request, &outcome));
        outcome
    }

    fn place(&self, source: &Path, name: &OsStr, date: NaiveDate, root: &Path) -> io::Result<PathBuf> {
        let mut attempt = 1;
        loop {
            let dest = resolve_destination(name, date, root)?;
            match rename_no_clobber(source, &dest) {
                Ok(()) => return Ok(dest),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && attempt < MAX_PLACEMENT_ATTEMPTS => {
                    debug!(dst = %dest.display(), attempt, "destination taken concurrently; recomputing");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
