#![windows_subsystem = "windows"]
use std::io::{self, BufRead, Write};
use std::panic::{self, AssertUnwindSafe};

use localizer_core::protocol;
use tracing::Level;

const LOG_ENV: &str = "LOCALIZER_LOG";

fn init_logging() {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn write_line(line: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{line}")?;
    stdout.flush()
}

fn main() {
    init_logging();

    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        if line.trim().is_empty() {
            continue;
        }

        let mut emit = |event: String| {
            if let Err(e) = write_line(&event) {
                tracing::warn!("failed to emit event: {e}");
            }
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| protocol::handle(&line, &mut emit)));

        let response = match result {
            Ok(resp) => resp,
            Err(_) => {
                tracing::error!("handler panicked");
                serde_json::json!({
                    "status": "error",
                    "message": "internal core error"
                })
                .to_string()
            }
        };

        if write_line(&response).is_err() {
            break;
        }
    }
}
