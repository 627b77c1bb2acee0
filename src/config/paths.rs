//! Default path helpers and symlink checks.
//! Determines OS-appropriate settings/log paths and detects symlinked ancestors for safety.

use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{APP_DIR_NAME, CONFIG_ENV_VAR};

/// Settings file path: `$SCREENSHOT_ORGANIZER_CONFIG` when set, else the OS config dir.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = env::var_os(CONFIG_ENV_VAR)
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }
    if let Some(mut base) = config_dir() {
        base.push(APP_DIR_NAME);
        base.push("config.xml");
        Some(base)
    } else {
        env::var("HOME").ok().map(|h| {
            PathBuf::from(h)
                .join(".config")
                .join(APP_DIR_NAME)
                .join("config.xml")
        })
    }
}

/// OS-appropriate default log file path (data dir).
pub fn default_log_path() -> Option<PathBuf> {
    if let Some(mut base) = data_dir() {
        base.push(APP_DIR_NAME);
        base.push("screenshot_organizer.log");
        Some(base)
    } else {
        env::var("HOME").ok().map(|h| {
            PathBuf::from(h)
                .join(".local")
                .join("share")
                .join(APP_DIR_NAME)
                .join("screenshot_organizer.log")
        })
    }
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn env_var_overrides_config_path() {
        let td = tempfile::tempdir().unwrap();
        let explicit = td.path().join("custom.xml");
        unsafe { env::set_var(CONFIG_ENV_VAR, &explicit) };
        let got = default_config_path();
        unsafe { env::remove_var(CONFIG_ENV_VAR) };
        assert_eq!(got, Some(explicit));
    }

    #[test]
    fn plain_temp_path_has_no_symlink_ancestor_below_root() {
        let td = tempfile::tempdir().unwrap();
        let real = dunce::canonicalize(td.path()).unwrap();
        let probe = real.join("a").join("b.log");
        assert!(!path_has_symlink_ancestor(&probe).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_parent_is_detected() {
        let td = tempfile::tempdir().unwrap();
        let real = dunce::canonicalize(td.path()).unwrap();
        let target = real.join("target");
        fs::create_dir_all(&target).unwrap();
        let link = real.join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();
        assert!(path_has_symlink_ancestor(&link.join("x.log")).unwrap());
    }
}
