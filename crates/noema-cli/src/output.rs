use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

/// Results always go to stdout as pretty JSON.
pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

/// Colored one-line status on stderr. Suppressed in `--json` mode.
pub fn status(ok: bool, msg: &str) {
    if is_json() {
        return;
    }
    let mut err = StandardStream::stderr(ColorChoice::Auto);
    let color = if ok { Color::Green } else { Color::Red };
    let _ = err.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(err, "{}", if ok { "ok  " } else { "FAIL" });
    let _ = err.reset();
    let _ = writeln!(err, " {msg}");
}
