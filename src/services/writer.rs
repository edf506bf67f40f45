use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::CoreError;

/// Newline-joined lines with exactly one trailing newline; no lines render as "".
pub fn render(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Appends to `path`, creating it (and its parent) if missing.
/// An existing file (even an empty one) keeps its content and gets one blank
/// line before the new block.
pub fn write(lines: &[String], path: &Path) -> Result<(), CoreError> {
    let content = render(lines);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
        }
    }

    let existing = match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(CoreError::io(path, e)),
    };

    let mut block = String::new();
    if let Some(old) = existing.as_deref() {
        if !old.is_empty() && !old.ends_with(b"\n") {
            block.push('\n');
        }
        block.push('\n');
    }
    block.push_str(&content);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CoreError::io(path, e))?;

    file.write_all(block.as_bytes())
        .map_err(|e| CoreError::io(path, e))?;

    tracing::debug!(path = %path.display(), bytes = block.len(), "output written");

    Ok(())
}
