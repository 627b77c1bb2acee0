//! Adds an actionable hint to I/O errors before they reach the activity log.

use std::io;
use std::path::Path;

/// Format "<op> '<path>': <error>" plus a platform-aware hint when one applies.
pub(crate) fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    let hint = match e.raw_os_error() {
        #[cfg(unix)]
        Some(code) if code == libc::EACCES || code == libc::EPERM => {
            Some("permission denied; check ownership and write permissions")
        }
        #[cfg(unix)]
        Some(code) if code == libc::EXDEV => Some("cross-filesystem; atomic rename not possible"),
        #[cfg(unix)]
        Some(code) if code == libc::ENOSPC => Some("insufficient space on device"),
        #[cfg(unix)]
        Some(code) if code == libc::EROFS => Some("read-only filesystem; cannot write here"),
        #[cfg(unix)]
        Some(code) if code == libc::ENAMETOOLONG => Some("filename or path too long"),
        #[cfg(windows)]
        Some(5) => Some("access denied; check permissions"),
        #[cfg(windows)]
        Some(17) => Some("not same device; cross-volume move"),
        #[cfg(windows)]
        Some(32) => Some("sharing violation; file is in use"),
        #[cfg(windows)]
        Some(112) => Some("insufficient disk space"),
        _ => match e.kind() {
            io::ErrorKind::PermissionDenied => {
                Some("permission denied; check ownership and write permissions")
            }
            io::ErrorKind::AlreadyExists => Some("destination already exists"),
            _ => None,
        },
    };
    if let Some(h) = hint {
        msg.push_str(" (");
        msg.push_str(h);
        msg.push(')');
    }
    msg
}
