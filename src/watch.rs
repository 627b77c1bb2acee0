//! Folder watch lifecycle.
//!
//! `WatchCoordinator` owns at most one `WatchSession`. A session wires the OS
//! notification callback to a queue, and a dispatcher thread fans each queued
//! request out to its own relocation worker:
//!
//!   notify callback -> filter -> unbounded channel -> dispatcher -> worker per file
//!
//! Notes:
//! - The callback never blocks: it only filters and enqueues.
//! - Dropping a session is synchronous: the watcher handle is released and the
//!   dispatcher joined before the drop returns. In-flight workers are not awaited.
//! - Late callbacks racing with teardown are silenced by the session's `active` flag.

use crossbeam_channel::{Receiver, Sender, bounded, select, unbounded};
use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

use crate::errors::OrganizerError;
use crate::organizer::{RelocationRequest, Relocator, RequestOrigin, is_image_file};

/// Owns the watch state machine (`Idle` <-> `Watching`).
#[derive(Debug)]
pub struct WatchCoordinator {
    relocator: Arc<Relocator>,
    session: Mutex<Option<WatchSession>>,
}

impl WatchCoordinator {
    pub fn new(relocator: Arc<Relocator>) -> Self {
        Self {
            relocator,
            session: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<WatchSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start watching `folder`, replacing any active session.
    ///
    /// An empty or missing folder is rejected with `InvalidFolder` and leaves the
    /// current state untouched. A watcher the OS refuses to create is reported in
    /// the activity log and leaves the coordinator idle.
    pub fn start(&self, folder: &Path) -> Result<PathBuf, OrganizerError> {
        if folder.as_os_str().is_empty() || !folder.is_dir() {
            let err = OrganizerError::InvalidFolder(folder.to_path_buf());
            warn!(code = err.code(), folder = %folder.display(), "{err}");
            return Err(err);
        }
        let root = dunce::canonicalize(folder).unwrap_or_else(|_| folder.to_path_buf());
        let log = &self.relocator.state().log;

        let mut slot = self.lock();
        if let Some(previous) = slot.take() {
            debug!(folder = %previous.root().display(), "replacing active watch session");
            drop(previous);
            log.push("Stopped watching.");
        }

        match WatchSession::open(&root, Arc::clone(&self.relocator)) {
            Ok(session) => {
                *slot = Some(session);
                info!(folder = %root.display(), "watch session started");
                log.push(format!("Started watching folder: {}", root.display()));
                Ok(root)
            }
            Err(e) => {
                let err = OrganizerError::WatchCreationFailed {
                    folder: root,
                    reason: e.to_string(),
                };
                error!(code = err.code(), "{err}");
                log.push(format!("Error starting watcher: {e}"));
                Err(err)
            }
        }
    }

    /// Stop the active session. Returns `true` when a session was actually torn down.
    pub fn stop(&self) -> bool {
        let Some(session) = self.lock().take() else {
            return false;
        };
        let root = session.root().to_path_buf();
        drop(session);
        info!(folder = %root.display(), "watch session stopped");
        self.relocator.state().log.push("Stopped watching.");
        true
    }

    pub fn is_watching(&self) -> bool {
        self.lock().is_some()
    }

    /// Root of the active session, if any.
    pub fn watched_folder(&self) -> Option<PathBuf> {
        self.lock().as_ref().map(|s| s.root().to_path_buf())
    }

    pub fn relocator(&self) -> &Arc<Relocator> {
        &self.relocator
    }
}

/// One live, non-recursive subscription on a folder.
pub struct WatchSession {
    root: PathBuf,
    active: Arc<AtomicBool>,
    watcher: Option<RecommendedWatcher>,
    stop_tx: Option<Sender<()>>,
    dispatcher: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for WatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchSession")
            .field("root", &self.root)
            .field("active", &self.active.load(Ordering::Relaxed))
            .finish()
    }
}

impl WatchSession {
    fn open(root: &Path, relocator: Arc<Relocator>) -> notify::Result<Self> {
        let active = Arc::new(AtomicBool::new(true));
        let (req_tx, req_rx) = unbounded::<RelocationRequest>();
        let (stop_tx, stop_rx) = bounded::<()>(0);

        let cb_active = Arc::clone(&active);
        let cb_root = root.to_path_buf();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            if !cb_active.load(Ordering::Acquire) {
                return;
            }
            match res {
                Ok(event) => {
                    for path in creation_paths(&event) {
                        trace!(path = %path.display(), kind = ?event.kind, "image event");
                        let request = RelocationRequest::new(path, &cb_root, RequestOrigin::Watch);
                        if req_tx.send(request).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => warn!(error = %e, "watch error"),
            }
        })?;
        watcher.watch(root, RecursiveMode::NonRecursive)?;

        let dispatcher = thread::Builder::new()
            .name("watch-dispatch".into())
            .spawn(move || dispatch_loop(req_rx, stop_rx, relocator))
            .map_err(notify::Error::io)?;

        Ok(Self {
            root: root.to_path_buf(),
            active,
            watcher: Some(watcher),
            stop_tx: Some(stop_tx),
            dispatcher: Some(dispatcher),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
        // Releasing the OS handle first stops new callbacks from arriving.
        self.watcher.take();
        self.stop_tx.take();
        if let Some(handle) = self.dispatcher.take()
            && handle.join().is_err()
        {
            error!(folder = %self.root.display(), "watch dispatcher panicked");
        }
    }
}

fn dispatch_loop(requests: Receiver<RelocationRequest>, stop: Receiver<()>, relocator: Arc<Relocator>) {
    loop {
        select! {
            recv(requests) -> msg => match msg {
                Ok(request) => spawn_relocation(request, &relocator),
                Err(_) => break,
            },
            recv(stop) -> _ => break,
        }
    }
    trace!("watch dispatcher exiting");
}

fn spawn_relocation(request: RelocationRequest, relocator: &Arc<Relocator>) {
    let worker = Arc::clone(relocator);
    let spawned = thread::Builder::new()
        .name("relocate".into())
        .spawn(move || {
            worker.relocate_and_record(&request);
        });
    if let Err(e) = spawned {
        error!(error = %e, "failed to spawn relocation worker");
    }
}

/// Image paths that appeared in the watched folder for this event.
///
/// Creations and the destination side of renames qualify. Paired rename events
/// (`RenameMode::Both`) are ignored because the platform also emits the `To` half.
fn creation_paths(event: &Event) -> Vec<PathBuf> {
    let candidates: &[PathBuf] = match event.kind {
        EventKind::Create(CreateKind::Folder) => &[],
        EventKind::Create(_) => &event.paths,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => &event.paths,
        // Some backends report both halves of a rename as `Any`; keep the half that exists.
        EventKind::Modify(ModifyKind::Name(RenameMode::Any)) => &event.paths,
        _ => &[],
    };
    let ambiguous = matches!(event.kind, EventKind::Modify(ModifyKind::Name(RenameMode::Any)));
    candidates
        .iter()
        .filter(|p| is_image_file(p) && !p.is_dir())
        .filter(|p| !ambiguous || p.exists())
        .cloned()
        .collect()
}
