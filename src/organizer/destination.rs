//! Destination naming.
//!
//! Policy:
//! - Files land in `<root>/<YYYY-MM-DD>/<name>`; the date folder is created on demand.
//! - On collision, `_1`, `_2`, ... is appended to the stem (extension preserved),
//!   checked sequentially until the name is free.
//!
//! Notes:
//! - This only picks a name from current filesystem state. The no-clobber rename
//!   performed by the relocator is the real arbiter between concurrent movers.

use chrono::NaiveDate;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Format used for date folder names.
pub const DATE_FOLDER_FORMAT: &str = "%Y-%m-%d";

pub fn date_folder_name(date: NaiveDate) -> String {
    date.format(DATE_FOLDER_FORMAT).to_string()
}

/// Create `<root>/<date>` if needed and return a currently unused path for `file_name` inside it.
pub fn resolve_destination(file_name: &OsStr, date: NaiveDate, root: &Path) -> io::Result<PathBuf> {
    let dir = root.join(date_folder_name(date));
    fs::create_dir_all(&dir)?;
    Ok(first_free_name(&dir, file_name))
}

fn first_free_name(dir: &Path, file_name: &OsStr) -> PathBuf {
    let candidate = dir.join(file_name);
    if !is_occupied(&candidate) {
        return candidate;
    }

    let base = Path::new(file_name);
    let stem: OsString = base
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| file_name.to_os_string());
    let ext: Option<&OsStr> = base.extension();

    let mut n: u64 = 1;
    loop {
        let mut name = stem.clone();
        name.push(format!("_{n}"));
        if let Some(e) = ext {
            name.push(".");
            name.push(e);
        }
        let candidate = dir.join(&name);
        if !is_occupied(&candidate) {
            trace!(dir = %dir.display(), name = ?name, collisions = n, "picked suffixed name");
            return candidate;
        }
        n = n.saturating_add(1);
    }
}

/// Any directory entry counts, including symlinks whose target is missing.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
