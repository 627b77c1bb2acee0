use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use screenshot_organizer::organizer::{date_folder_name, file_creation_date};
use screenshot_organizer::{
    OrganizerError, OrganizerState, ReadinessProber, Relocator, organize_existing,
};

fn relocator() -> Relocator {
    Relocator::new(
        ReadinessProber::new(3, Duration::from_millis(10)),
        Arc::new(OrganizerState::new()),
    )
}

#[test]
fn three_images_and_two_others_yield_three() {
    let tmp = TempDir::new().unwrap();
    for name in ["a.png", "b.JPG", "c.webp", "notes.txt", "clip.mov"] {
        tmp.child(name).write_str(name).unwrap();
    }
    let day = date_folder_name(file_creation_date(tmp.child("a.png").path()));

    let r = relocator();
    let count = organize_existing(&r, tmp.path()).unwrap();

    assert_eq!(count, 3);
    assert_eq!(r.state().files_moved.get(), 3);
    for name in ["a.png", "b.JPG", "c.webp"] {
        tmp.child(&day).child(name).assert(name);
        assert!(!tmp.child(name).path().exists());
    }
    tmp.child("notes.txt").assert("notes.txt");
    tmp.child("clip.mov").assert("clip.mov");
}

#[test]
fn subfolders_are_not_descended() {
    let tmp = TempDir::new().unwrap();
    tmp.child("2023-01-01/old.png").write_str("old").unwrap();
    tmp.child("nested/deep.png").write_str("deep").unwrap();

    let r = relocator();
    assert_eq!(organize_existing(&r, tmp.path()).unwrap(), 0);
    tmp.child("2023-01-01/old.png").assert("old");
    tmp.child("nested/deep.png").assert("deep");
}

#[test]
fn second_pass_finds_nothing_at_top_level() {
    let tmp = TempDir::new().unwrap();
    tmp.child("fine.png").write_str("x").unwrap();
    let r = relocator();
    assert_eq!(organize_existing(&r, tmp.path()).unwrap(), 1);
    assert_eq!(organize_existing(&r, tmp.path()).unwrap(), 0);
    assert_eq!(r.state().log.len(), 1);
}

#[test]
fn missing_or_empty_folder_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let r = relocator();
    let missing = organize_existing(&r, &tmp.path().join("nope")).unwrap_err();
    assert!(matches!(missing, OrganizerError::NoFolderSelected));
    let empty = organize_existing(&r, std::path::Path::new("")).unwrap_err();
    assert_eq!(empty.to_string(), "Please select a valid screenshots folder first.");
    assert!(fs::read_dir(tmp.path()).unwrap().next().is_none());
}
