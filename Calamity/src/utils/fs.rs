//! Copy-or-replace file primitives
//!
//! Both the install merger and the remap pipeline place files with the same
//! contract: the destination is always clobbered, parent directories are
//! created on demand, and errors carry the paths involved.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

/// Outcome of placing a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Nothing existed at the destination
    Created,
    /// An existing file was overwritten
    Replaced,
}

/// Copy `src` to `dst`, overwriting whatever is at `dst`.
///
/// Missing parent directories of `dst` are created.
pub fn copy_or_replace(src: &Path, dst: &Path) -> Result<Placement> {
    let placement = prepare_destination(dst)?;
    copy_file(src, dst)?;
    Ok(placement)
}

/// Move `src` to `dst`, overwriting whatever is at `dst`.
///
/// Falls back to copy + remove when a rename is not possible (for example
/// across filesystems).
pub fn move_or_replace(src: &Path, dst: &Path) -> Result<Placement> {
    if !src.is_file() {
        return Err(Error::path_io(
            "failed to move",
            src,
            std::io::Error::new(ErrorKind::NotFound, "source file not found"),
        ));
    }

    let placement = prepare_destination(dst)?;
    if fs::rename(src, dst).is_ok() {
        return Ok(placement);
    }

    copy_file(src, dst)?;
    fs::remove_file(src).map_err(|e| Error::path_io("failed to remove", src, e))?;
    Ok(placement)
}

/// Create a directory and its parents; succeeds if it already exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::path_io("failed to create directory", dir, e))
}

fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst).map_err(|source| Error::CopyFailed {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn prepare_destination(dst: &Path) -> Result<Placement> {
    if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    match fs::symlink_metadata(dst) {
        Ok(meta) if meta.is_dir() => Err(Error::path_io(
            "refusing to overwrite directory",
            dst,
            std::io::Error::new(ErrorKind::AlreadyExists, "destination is a directory"),
        )),
        Ok(meta) => {
            // Read-only files from a dump would make fs::copy fail on some platforms
            if meta.permissions().readonly() {
                fs::remove_file(dst).map_err(|e| Error::path_io("failed to remove", dst, e))?;
            }
            Ok(Placement::Replaced)
        }
        Err(_) => Ok(Placement::Created),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_creates_parents() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.bin");
        fs::write(&src, b"one").unwrap();

        let dst = temp.path().join("x").join("y").join("a.bin");
        assert_eq!(copy_or_replace(&src, &dst).unwrap(), Placement::Created);
        assert_eq!(fs::read(&dst).unwrap(), b"one");
        assert!(src.exists());
    }

    #[test]
    fn test_copy_overwrites() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.bin");
        let dst = temp.path().join("b.bin");
        fs::write(&src, b"new").unwrap();
        fs::write(&dst, b"old contents").unwrap();

        assert_eq!(copy_or_replace(&src, &dst).unwrap(), Placement::Replaced);
        assert_eq!(fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn test_move_overwrites_and_removes_source() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("tex.g1t");
        let dst = temp.path().join("out").join("tex.g1t");
        fs::write(&src, b"texture").unwrap();
        fs::create_dir_all(dst.parent().unwrap()).unwrap();
        fs::write(&dst, b"stale").unwrap();

        assert_eq!(move_or_replace(&src, &dst).unwrap(), Placement::Replaced);
        assert_eq!(fs::read(&dst).unwrap(), b"texture");
        assert!(!src.exists());
    }

    #[test]
    fn test_move_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = move_or_replace(&temp.path().join("nope.g1t"), &temp.path().join("dst.g1t"))
            .unwrap_err();
        assert!(err.to_string().contains("nope.g1t"));
        assert!(!temp.path().join("dst.g1t").exists());
    }

    #[test]
    fn test_copy_refuses_directory_destination() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.bin");
        fs::write(&src, b"x").unwrap();
        let dst = temp.path().join("dir");
        fs::create_dir(&dst).unwrap();

        assert!(copy_or_replace(&src, &dst).is_err());
    }

    #[test]
    fn test_copy_error_names_both_paths() {
        let temp = TempDir::new().unwrap();
        // A directory source passes destination checks but cannot be copied
        let src = temp.path().join("src_dir");
        fs::create_dir(&src).unwrap();
        let dst = temp.path().join("out").join("dst.g1m");

        let err = copy_or_replace(&src, &dst).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, Error::CopyFailed { .. }));
        assert!(message.contains(&src.display().to_string()));
        assert!(message.contains(&dst.display().to_string()));
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("merged").join("modelA");
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }
}
