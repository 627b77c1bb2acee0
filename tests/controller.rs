use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::{TempDir, tempdir};

use screenshot_organizer::organizer::{date_folder_name, file_creation_date};
use screenshot_organizer::{Organizer, OrganizerError, Settings, SettingsStore};

fn quick_settings() -> Settings {
    Settings {
        ready_attempts: 3,
        ready_interval: Duration::from_millis(20),
        ..Settings::default()
    }
}

fn shots_dir(td: &TempDir) -> PathBuf {
    let dir = td.path().join("shots");
    fs::create_dir_all(&dir).unwrap();
    dunce::canonicalize(dir).unwrap()
}

fn newest(org: &Organizer) -> String {
    org.activity().entries()[0][10..].to_string()
}

#[test]
fn organize_without_folder_is_rejected() {
    let org = Organizer::new(quick_settings(), None);
    let err = org.organize_now().unwrap_err();
    assert!(matches!(err, OrganizerError::NoFolderSelected));
    assert!(org.activity().is_empty());
}

#[test]
fn start_without_folder_stays_idle() {
    let org = Organizer::new(quick_settings(), None);
    let err = org.start_watching().unwrap_err();
    assert_eq!(err.to_string(), "Please select a screenshots folder first.");
    assert!(!org.is_watching());
    assert_eq!(org.status_text(), "Not watching. Folder: (no folder selected)");
}

#[test]
fn organize_now_logs_a_summary_line() {
    let td = tempdir().unwrap();
    let shots = shots_dir(&td);
    fs::write(shots.join("a.png"), b"a").unwrap();
    fs::write(shots.join("b.tiff"), b"b").unwrap();
    fs::write(shots.join("c.doc"), b"c").unwrap();

    let org = Organizer::new(quick_settings(), None);
    org.select_folder(&shots).unwrap();
    assert_eq!(newest(&org), format!("Selected folder: {}", shots.display()));

    assert_eq!(org.organize_now().unwrap(), 2);
    assert_eq!(newest(&org), "Organized 2 existing file(s).");
    assert_eq!(org.files_moved(), 2);
    assert_eq!(org.stats_text(), "Files moved: 2");
}

#[test]
fn toggle_switches_between_watching_and_idle() {
    let td = tempdir().unwrap();
    let shots = shots_dir(&td);
    let org = Organizer::new(quick_settings(), None);
    org.select_folder(&shots).unwrap();

    assert!(org.toggle_watching().unwrap());
    assert_eq!(org.status_text(), format!("Watching: {}", shots.display()));
    assert!(!org.toggle_watching().unwrap());
    assert_eq!(org.status_text(), format!("Not watching. Folder: {}", shots.display()));
    assert!(!org.stop_watching());
}

#[test]
fn selecting_another_folder_keeps_the_active_session() {
    let td = tempdir().unwrap();
    let shots = shots_dir(&td);
    let other = td.path().join("other");
    fs::create_dir_all(&other).unwrap();

    let org = Organizer::new(quick_settings(), None);
    org.select_folder(&shots).unwrap();
    org.start_watching().unwrap();
    org.select_folder(&other).unwrap();
    assert_eq!(org.status_text(), format!("Watching: {}", shots.display()));
    org.shutdown();
    assert!(!org.is_watching());
}

#[test]
fn organize_on_start_runs_a_bulk_pass() {
    let td = tempdir().unwrap();
    let shots = shots_dir(&td);
    let existing = shots.join("waiting.jpeg");
    fs::write(&existing, b"j").unwrap();
    let day = shots.join(date_folder_name(file_creation_date(&existing)));

    let settings = Settings {
        watched_folder: Some(shots.clone()),
        organize_on_start: true,
        ..quick_settings()
    };
    let org = Organizer::new(settings, None);
    org.start_watching().unwrap();

    assert!(day.join("waiting.jpeg").exists());
    assert_eq!(newest(&org), "Organized 1 existing file(s).");
    org.shutdown();
}

#[test]
fn clear_and_reset_are_logged() {
    let td = tempdir().unwrap();
    let shots = shots_dir(&td);
    fs::write(shots.join("a.png"), b"a").unwrap();
    let org = Organizer::new(quick_settings(), None);
    org.select_folder(&shots).unwrap();
    org.organize_now().unwrap();

    org.reset_counter();
    assert_eq!(org.files_moved(), 0);
    assert_eq!(newest(&org), "File counters reset.");

    org.clear_log();
    assert_eq!(org.activity().len(), 1);
    assert_eq!(newest(&org), "Log cleared.");
}

#[test]
fn preferences_and_folder_are_persisted() {
    let td = tempdir().unwrap();
    let shots = shots_dir(&td);
    let store = SettingsStore::new(td.path().join("cfg").join("config.xml"));
    let org = Organizer::from_store(store.clone());

    org.select_folder(&shots).unwrap();
    org.set_theme("Light");
    org.set_show_tips(false);
    org.set_run_on_startup(false);
    org.shutdown();

    let saved = store.try_load().unwrap().unwrap();
    assert_eq!(saved.watched_folder, Some(shots));
    assert_eq!(saved.theme, "Light");
    assert!(!saved.show_tips);
    assert!(!saved.run_on_startup);

    let reopened = Organizer::from_store(store);
    assert_eq!(reopened.settings(), saved);
}

#[test]
fn settings_failures_are_logged_not_raised() {
    let td = tempdir().unwrap();
    let blocker = td.path().join("not_a_dir");
    fs::write(&blocker, b"x").unwrap();
    let store = SettingsStore::new(blocker.join("config.xml"));
    let org = Organizer::new(quick_settings(), Some(store));

    org.set_theme("Light");
    assert!(newest(&org).starts_with("Failed to save settings:"), "{}", newest(&org));

    org.set_run_on_startup(false);
    assert!(newest(&org).starts_with("Failed to update startup setting:"));
    assert!(!org.settings().run_on_startup);
}
