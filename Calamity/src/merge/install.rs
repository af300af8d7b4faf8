//! Install reconciliation
//!
//! A Switch dump of Age of Calamity holds one directory per title id: the
//! base game, its update and each DLC. They all share a 12-character prefix
//! and each carries its own `romfs` root. When the base title is present,
//! the `romfs` trees are merged into one canonical root with the base game
//! applied first.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::TitleConfig;
use crate::error::{Error, Result};

use super::{MergeStats, merge_trees};

/// The install root the rest of the run should read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalRoot {
    /// No base title directory was found; the game path is used as is
    AsProvided(PathBuf),
    /// Title directories were merged into this directory
    Merged {
        /// Merge destination
        root: PathBuf,
        /// Title directories merged, in application order
        titles: Vec<PathBuf>,
        /// Merge counters
        stats: MergeStats,
    },
}

impl CanonicalRoot {
    /// Path of the canonical root
    pub fn path(&self) -> &Path {
        match self {
            Self::AsProvided(path) => path,
            Self::Merged { root, .. } => root,
        }
    }
}

/// Find title directories under `game_root` in merge order.
///
/// Returns an empty list when the base title is absent. Otherwise the base
/// title comes first, followed by every other directory sharing the prefix
/// in ascending name order.
pub fn find_title_dirs(game_root: &Path, title: &TitleConfig) -> Result<Vec<PathBuf>> {
    if !game_root.is_dir() {
        return Err(Error::GamePathNotFound {
            path: game_root.to_path_buf(),
        });
    }

    let mut candidates: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(game_root).map_err(|e| Error::path_io("failed to read", game_root, e))? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(&title.prefix) {
            candidates.push((name, entry.path()));
        }
    }

    if !candidates.iter().any(|(name, _)| *name == title.base_id) {
        return Ok(Vec::new());
    }

    candidates.sort_by(|(a, _), (b, _)| {
        (*a != title.base_id)
            .cmp(&(*b != title.base_id))
            .then_with(|| a.cmp(b))
    });

    Ok(candidates.into_iter().map(|(_, path)| path).collect())
}

/// Produce the canonical install root for `game_root`.
///
/// When versioned title directories are present, their `romfs` trees are
/// merged into `destination`. A title directory without a `romfs`
/// subdirectory is fatal.
pub fn reconcile_install(game_root: &Path, title: &TitleConfig, destination: &Path) -> Result<CanonicalRoot> {
    let titles = find_title_dirs(game_root, title)?;
    if titles.is_empty() {
        tracing::info!("No {} title directory under {}, using it as the install root", title.base_id, game_root.display());
        return Ok(CanonicalRoot::AsProvided(game_root.to_path_buf()));
    }

    let sources: Vec<PathBuf> = titles.iter().map(|dir| dir.join(&title.romfs_dir)).collect();
    tracing::info!("Merging {} title directories into {}", sources.len(), destination.display());
    let stats = merge_trees(&sources, destination)?;

    Ok(CanonicalRoot::Merged {
        root: destination.to_path_buf(),
        titles,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn title_file(root: &Path, title: &str, relative: &str, contents: &str) {
        let path = root.join(title).join("romfs").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_base_title_first() {
        let temp = TempDir::new().unwrap();
        for name in ["01002B00111A3001", "01002B00111A2800", "01002B00111A2000", "0100FFFF00000000"] {
            fs::create_dir_all(temp.path().join(name)).unwrap();
        }
        fs::write(temp.path().join("01002B00111A9999"), "not a dir").unwrap();

        let dirs = find_title_dirs(temp.path(), &TitleConfig::default()).unwrap();
        let names: Vec<String> = dirs
            .iter()
            .map(|d| d.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["01002B00111A2000", "01002B00111A2800", "01002B00111A3001"]);
    }

    #[test]
    fn test_no_base_title_means_no_merge() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("01002B00111A2800")).unwrap();
        fs::create_dir_all(temp.path().join("asset")).unwrap();

        let root = reconcile_install(temp.path(), &TitleConfig::default(), &temp.path().join("merged")).unwrap();

        assert_eq!(root, CanonicalRoot::AsProvided(temp.path().to_path_buf()));
        assert!(!temp.path().join("merged").exists());
    }

    #[test]
    fn test_update_overrides_base() {
        let temp = TempDir::new().unwrap();
        let game = temp.path().join("game");
        title_file(&game, "01002B00111A2000", "asset/file.rdb", "base");
        title_file(&game, "01002B00111A2000", "asset/only_base.rdb", "base");
        title_file(&game, "01002B00111A2800", "asset/file.rdb", "update");
        title_file(&game, "01002B00111A3001", "asset/dlc.rdb", "dlc");

        let dest = temp.path().join("romfs");
        let root = reconcile_install(&game, &TitleConfig::default(), &dest).unwrap();

        assert_eq!(root.path(), dest.as_path());
        assert_eq!(fs::read_to_string(dest.join("asset/file.rdb")).unwrap(), "update");
        assert_eq!(fs::read_to_string(dest.join("asset/only_base.rdb")).unwrap(), "base");
        assert_eq!(fs::read_to_string(dest.join("asset/dlc.rdb")).unwrap(), "dlc");
        match root {
            CanonicalRoot::Merged { titles, stats, .. } => {
                assert_eq!(titles.len(), 3);
                assert_eq!(stats.files_overwritten, 1);
            }
            CanonicalRoot::AsProvided(_) => panic!("expected a merge"),
        }
    }

    #[test]
    fn test_title_without_romfs_is_fatal() {
        let temp = TempDir::new().unwrap();
        title_file(temp.path(), "01002B00111A2000", "asset/a.rdb", "base");
        fs::create_dir_all(temp.path().join("01002B00111A2800").join("exefs")).unwrap();

        let err = reconcile_install(temp.path(), &TitleConfig::default(), &temp.path().join("out")).unwrap_err();
        assert!(matches!(err, Error::SourceDirectoryMissing { .. }));
    }

    #[test]
    fn test_missing_game_path() {
        let temp = TempDir::new().unwrap();
        let err = find_title_dirs(&temp.path().join("nope"), &TitleConfig::default()).unwrap_err();
        assert!(matches!(err, Error::GamePathNotFound { .. }));
    }
}
