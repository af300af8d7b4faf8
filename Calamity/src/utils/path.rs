//! Path utilities

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Expand `~` and environment variables in a user-supplied path.
///
/// Empty input is rejected so callers get a clear pre-flight error instead of
/// silently operating on the working directory.
pub fn expand_user_path(raw: &str, what: &'static str) -> Result<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyPath(what));
    }
    let expanded = shellexpand::full(trimmed)
        .map_err(|e| Error::InvalidPath(format!("{trimmed}: {e}")))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Make a path absolute against the current working directory.
///
/// External tools are started from their own directory in some setups, so
/// every path handed to them is made absolute first.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

/// Normalize path separators to forward slashes (for log output)
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}
