//! Application orchestrator.
//! Loads settings, applies CLI overrides, initializes logging, installs the signal
//! handler, then drives the organizer: select folder, organize, watch until Ctrl-C.

use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info};

use screenshot_organizer::cli::Args;
use screenshot_organizer::config::CONFIG_ENV_VAR;
use screenshot_organizer::output as out;
use screenshot_organizer::{Organizer, OrganizerError, SettingsStore, shutdown};

use crate::logging::init_tracing;

const SHUTDOWN_POLL: Duration = Duration::from_millis(200);

fn print_config_location() {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
        out::print_info(&format!(
            "Using {CONFIG_ENV_VAR} (explicit):\n  {}",
            explicit.to_string_lossy()
        ));
        return;
    }
    match SettingsStore::at_default_location() {
        Some(store) => {
            out::print_info(&format!("Settings file:\n  {}", store.path().display()));
            if !store.path().exists() {
                out::print_info("No settings file exists there yet; it is written on first change.");
            }
        }
        None => out::print_error("Could not determine a settings location."),
    }
}

fn report(err: OrganizerError) -> anyhow::Error {
    error!(code = err.code(), "{err}");
    out::print_error(&err.to_string());
    err.into()
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    let store = SettingsStore::at_default_location();
    let settings = store.as_ref().map(SettingsStore::load).unwrap_or_default();
    // Logging overrides apply to this run only and are never written back.
    let mut run_settings = settings.clone();
    args.apply_overrides(&mut run_settings);

    let guard_opt = init_tracing(run_settings.log_level, run_settings.log_file.as_deref(), args.json)
        .inspect_err(|e| out::print_error(&format!("Failed to initialize logging: {e}")))?;

    // Dropping the guard on Ctrl-C flushes the file appender.
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; shutting down gracefully...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .expect("failed to install signal handler");
    }

    debug!(?args, "starting screenshot_organizer");
    let organizer = Organizer::new(settings, store);

    let result = drive(&args, &organizer);
    organizer.shutdown();
    out::print_status(&organizer.stats_text());

    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }
    result
}

fn drive(args: &Args, organizer: &Organizer) -> Result<()> {
    if let Some(folder) = args.resolved_folder() {
        organizer.select_folder(&folder).map_err(report)?;
    }
    if args.organize_on_start {
        organizer.set_organize_on_start(true);
    }

    if args.organize {
        let count = organizer.organize_now().map_err(report)?;
        out::print_status(&format!("Organized {count} existing file(s)."));
    }

    if args.no_watch {
        return Ok(());
    }

    organizer.start_watching().map_err(report)?;
    out::print_status(&organizer.status_text());
    info!("press Ctrl-C to stop");
    shutdown::wait(SHUTDOWN_POLL);
    Ok(())
}
