//! Unix implementations of platform helpers.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

use super::tmp_sibling_name;

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, we preserve its existing permissions.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}

/// Write `contents` to `path` through a 0600 temp sibling, fsync, rename, fsync dir.
pub fn write_file_atomic_private(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "settings path has no parent"))?;
    fs::create_dir_all(parent).with_context(|| format!("create parent '{}'", parent.display()))?;

    let tmp = tmp_sibling_name(path);
    let mut f = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(&tmp)
        .with_context(|| format!("create temp '{}'", tmp.display()))?;
    f.write_all(contents).context("write temp")?;
    f.sync_all().context("fsync temp")?;
    drop(f);

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e)
            .with_context(|| format!("rename '{}' -> '{}'", tmp.display(), path.display()));
    }

    // Best-effort: a failed directory fsync does not undo a completed rename.
    if let Ok(dir) = File::open(parent) {
        let _ = dir.sync_all();
    }
    Ok(())
}

/// Rename `src` to `dst`, failing with `AlreadyExists` instead of replacing `dst`.
#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub fn rename_no_clobber(src: &Path, dst: &Path) -> io::Result<()> {
    let c_src = to_cstring(src)?;
    let c_dst = to_cstring(dst)?;
    let rc = unsafe {
        libc::renameat2(
            libc::AT_FDCWD,
            c_src.as_ptr(),
            libc::AT_FDCWD,
            c_dst.as_ptr(),
            libc::RENAME_NOREPLACE,
        )
    };
    if rc == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        // Filesystem (or kernel) without RENAME_NOREPLACE support.
        Some(code) if code == libc::EINVAL || code == libc::ENOSYS => {
            tracing::trace!(src = %src.display(), "renameat2 unsupported; using link+unlink");
            link_then_unlink(src, dst)
        }
        _ => Err(err),
    }
}

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
pub fn rename_no_clobber(src: &Path, dst: &Path) -> io::Result<()> {
    link_then_unlink(src, dst)
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
fn to_cstring(p: &Path) -> io::Result<std::ffi::CString> {
    use std::os::unix::ffi::OsStrExt;
    std::ffi::CString::new(p.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains null byte"))
}

/// `link(2)` refuses an existing target atomically; the source name is dropped afterwards.
/// Filesystems without hard links fall back to check-then-rename.
fn link_then_unlink(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::hard_link(src, dst) {
        Ok(()) => {
            if let Err(e) = fs::remove_file(src) {
                let _ = fs::remove_file(dst);
                return Err(e);
            }
            Ok(())
        }
        Err(e)
            if matches!(
                e.raw_os_error(),
                Some(code) if code == libc::EPERM || code == libc::EXDEV || code == libc::ENOTSUP
            ) =>
        {
            if !src.exists() {
                return Err(io::Error::from(io::ErrorKind::NotFound));
            }
            if dst.exists() {
                return Err(io::Error::from(io::ErrorKind::AlreadyExists));
            }
            fs::rename(src, dst)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn preserve_existing_log_file_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, b"hello").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        let _f = open_log_file_secure_append(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640, "existing permissions should be preserved");
    }

    #[test]
    fn new_log_file_gets_0600() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new_log.txt");
        let _f = open_log_file_secure_append(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "newly created log file should be 0600");
    }

    #[test]
    fn settings_write_is_0600() {
        let dir = tempdir().unwrap();
        let cfg = dir.path().join("config.xml");
        write_file_atomic_private(&cfg, b"<config/>").unwrap();
        let mode = fs::metadata(&cfg).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn link_fallback_refuses_existing_target() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("s.png");
        let dst = dir.path().join("d.png");
        fs::write(&src, b"s").unwrap();
        fs::write(&dst, b"d").unwrap();
        let err = link_then_unlink(&src, &dst).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert!(src.exists());
    }
}
