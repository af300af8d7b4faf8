//! Directory tree merging
//!
//! Overlays source trees onto one destination, file by file. Sources are
//! applied in the order given and later sources overwrite files from
//! earlier ones, so callers pass the lowest priority source first.

mod install;

pub use install::{CanonicalRoot, find_title_dirs, reconcile_install};

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::utils::{Placement, copy_or_replace, ensure_dir};

/// Summary of a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Files written to the destination (including overwrites)
    pub files_copied: usize,
    /// Files that replaced a file from an earlier source
    pub files_overwritten: usize,
    /// Directories visited in the sources
    pub directories: usize,
}

/// Merge `sources` into `destination`, last writer wins.
///
/// Each source is walked pre-order; entries of a directory are visited in
/// file name order so repeated runs produce the same tree. A missing source
/// aborts the merge, as does any IO error while copying.
pub fn merge_trees<P: AsRef<Path>>(sources: &[P], destination: &Path) -> Result<MergeStats> {
    let mut stats = MergeStats::default();
    ensure_dir(destination)?;

    for source in sources {
        let source = source.as_ref();
        tracing::info!("Merging {} into {}", source.display(), destination.display());
        let source_stats = merge_tree(source, destination)?;
        stats.files_copied += source_stats.files_copied;
        stats.files_overwritten += source_stats.files_overwritten;
        stats.directories += source_stats.directories;
    }

    Ok(stats)
}

/// Overlay a single source tree onto `destination`
pub fn merge_tree(source: &Path, destination: &Path) -> Result<MergeStats> {
    if !source.is_dir() {
        return Err(Error::SourceDirectoryMissing {
            path: source.to_path_buf(),
        });
    }

    let mut stats = MergeStats::default();

    for entry in WalkDir::new(source)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        let relative = relative_to(entry.path(), source)?;
        let target = destination.join(&relative);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
            stats.directories += 1;
        } else {
            if copy_or_replace(entry.path(), &target)? == Placement::Replaced {
                tracing::debug!("Overwrote {}", relative.display());
                stats.files_overwritten += 1;
            }
            stats.files_copied += 1;
        }
    }

    Ok(stats)
}

fn relative_to(path: &Path, base: &Path) -> Result<PathBuf> {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .map_err(|_| Error::InvalidPath(path.display().to_string()))
}
