//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.

use fs2::FileExt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::{open_log_file_secure_append, rename_no_clobber, write_file_atomic_private};

#[cfg(windows)]
pub use windows::{open_log_file_secure_append, rename_no_clobber, write_file_atomic_private};

/// Open `path` for reading and take (then release) an exclusive lock on it.
///
/// Succeeds only when no other handle holds a conflicting lock; on Windows the
/// open itself denies sharing, so a writer that still has the file open makes
/// it fail with a sharing violation.
pub fn try_open_exclusive(path: &Path) -> io::Result<()> {
    let file = open_unshared(path)?;
    FileExt::try_lock_exclusive(&file)?;
    FileExt::unlock(&file)?;
    Ok(())
}

#[cfg(unix)]
fn open_unshared(path: &Path) -> io::Result<File> {
    File::open(path)
}

#[cfg(windows)]
fn open_unshared(path: &Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;
    std::fs::OpenOptions::new()
        .read(true)
        .share_mode(0)
        .open(path)
}

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Hidden sibling name for atomic write-then-rename. Unique per call within a process.
pub(crate) fn tmp_sibling_name(target: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let name = format!(".screenshot_organizer.tmp.{pid}.{nanos}.{seq}");
    target
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(name)
}
