use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::{TempDir, tempdir};

use screenshot_organizer::organizer::{date_folder_name, file_creation_date};
use screenshot_organizer::{
    OrganizerError, OrganizerState, ReadinessProber, Relocator, WatchCoordinator,
};

struct Fixture {
    _td: TempDir,
    root: PathBuf,
    staging: PathBuf,
    coordinator: WatchCoordinator,
}

impl Fixture {
    fn new() -> Self {
        let td = tempdir().unwrap();
        let root = td.path().join("shots");
        let staging = td.path().join("staging");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&staging).unwrap();
        let relocator = Arc::new(Relocator::new(
            ReadinessProber::new(5, Duration::from_millis(50)),
            Arc::new(OrganizerState::new()),
        ));
        Self {
            _td: td,
            root,
            staging,
            coordinator: WatchCoordinator::new(relocator),
        }
    }

    fn state(&self) -> &OrganizerState {
        self.coordinator.relocator().state()
    }

    /// Write `name` outside the root, then rename it in (a single arrival event).
    fn drop_in(&self, name: &str) -> PathBuf {
        let staged = self.staging.join(name);
        fs::write(&staged, name).unwrap();
        let target = self.root.join(name);
        fs::rename(&staged, &target).unwrap();
        target
    }

    fn lines_matching(&self, needle: &str) -> usize {
        self.state()
            .log
            .entries()
            .iter()
            .filter(|l| l.contains(needle))
            .count()
    }
}

fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(25));
    }
    cond()
}

fn day_dir(root: &Path, sample: &Path) -> PathBuf {
    root.join(date_folder_name(file_creation_date(sample)))
}

#[test]
fn invalid_folder_is_rejected_without_state_change() {
    let fx = Fixture::new();
    let err = fx.coordinator.start(&fx.root.join("missing")).unwrap_err();
    assert!(matches!(err, OrganizerError::InvalidFolder(_)));
    assert!(matches!(
        fx.coordinator.start(Path::new("")).unwrap_err(),
        OrganizerError::InvalidFolder(_)
    ));
    assert!(!fx.coordinator.is_watching());
    assert!(fx.state().log.is_empty());
}

#[test]
fn arriving_image_is_relocated_and_other_files_are_left() {
    let fx = Fixture::new();
    fx.coordinator.start(&fx.root).unwrap();
    assert!(fx.coordinator.is_watching());

    let image = fx.drop_in("capture.PNG");
    let day = day_dir(&fx.root, &image);
    let note = fx.drop_in("notes.txt");

    assert!(
        wait_until(Duration::from_secs(5), || day.join("capture.PNG").exists()),
        "image was not relocated"
    );
    assert!(wait_until(Duration::from_secs(2), || fx.state().files_moved.get() == 1));
    thread::sleep(Duration::from_millis(300));
    assert!(note.exists(), "non-image files stay where they are");
    assert_eq!(fx.state().files_moved.get(), 1);
    assert_eq!(fx.lines_matching("Moved \"capture.PNG\""), 1);
}

#[test]
fn stopping_is_idempotent_and_logged_once() {
    let fx = Fixture::new();
    assert!(!fx.coordinator.stop(), "stopping while idle is a no-op");
    assert!(fx.state().log.is_empty());

    fx.coordinator.start(&fx.root).unwrap();
    assert!(fx.coordinator.stop());
    assert!(!fx.coordinator.stop());
    assert!(!fx.coordinator.is_watching());
    assert_eq!(fx.lines_matching("Stopped watching."), 1);
    assert_eq!(fx.lines_matching("Started watching folder:"), 1);
}

#[test]
fn stopped_session_no_longer_moves_files() {
    let fx = Fixture::new();
    fx.coordinator.start(&fx.root).unwrap();
    fx.coordinator.stop();

    let image = fx.drop_in("late.jpg");
    thread::sleep(Duration::from_millis(500));
    assert!(image.exists());
    assert_eq!(fx.state().files_moved.get(), 0);
}

#[test]
fn restarting_leaves_exactly_one_live_watch() {
    let fx = Fixture::new();
    fx.coordinator.start(&fx.root).unwrap();
    fx.coordinator.start(&fx.root).unwrap();
    fx.coordinator.start(&fx.root).unwrap();
    assert_eq!(fx.lines_matching("Stopped watching."), 2);

    let image = fx.drop_in("once.webp");
    let day = day_dir(&fx.root, &image);
    assert!(wait_until(Duration::from_secs(5), || day.join("once.webp").exists()));
    thread::sleep(Duration::from_millis(500));

    assert_eq!(fx.state().files_moved.get(), 1);
    assert_eq!(fx.lines_matching("once.webp"), 1, "{:?}", fx.state().log.entries());
    assert_eq!(
        fx.coordinator.watched_folder(),
        Some(dunce::canonicalize(&fx.root).unwrap())
    );
}

#[test]
fn several_arrivals_are_processed_concurrently() {
    let fx = Fixture::new();
    fx.coordinator.start(&fx.root).unwrap();
    let names: Vec<String> = (0..6).map(|i| format!("burst{i}.bmp")).collect();
    for name in &names {
        fx.drop_in(name);
    }
    assert!(wait_until(Duration::from_secs(5), || fx.state().files_moved.get() == 6));
    fx.coordinator.stop();
}
