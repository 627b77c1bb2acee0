//! Console messages for the command-line shell.
//! Colors are enabled only when stdout is a TTY.

use owo_colors::OwoColorize;

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

#[derive(Clone, Copy)]
enum Tone {
    Info,
    Warn,
    Error,
}

fn emit(tone: Tone, msg: &str) {
    let label = match tone {
        Tone::Info => "info:",
        Tone::Warn => "warn:",
        Tone::Error => "error:",
    };
    let line = if is_tty() {
        let styled = match tone {
            Tone::Info => label.cyan().bold().to_string(),
            Tone::Warn => label.yellow().bold().to_string(),
            Tone::Error => label.red().bold().to_string(),
        };
        format!("{styled} {msg}")
    } else {
        format!("{label} {msg}")
    };
    match tone {
        Tone::Info => println!("{line}"),
        Tone::Warn | Tone::Error => eprintln!("{line}"),
    }
}

pub fn print_info(msg: &str) {
    emit(Tone::Info, msg);
}

pub fn print_warn(msg: &str) {
    emit(Tone::Warn, msg);
}

pub fn print_error(msg: &str) {
    emit(Tone::Error, msg);
}

/// Status lines ("Watching: ...", "Files moved: N") are printed without a prefix
/// so scripts can match them verbatim.
pub fn print_status(msg: &str) {
    if is_tty() {
        println!("{}", msg.green());
    } else {
        println!("{msg}");
    }
}
