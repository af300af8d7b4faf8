//! CLI command for directory merging

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::progress::{LINK, print_done, print_step};
use crate::merge::merge_trees;

pub fn execute(sources: &[PathBuf], destination: &Path) -> anyhow::Result<()> {
    let started = Instant::now();
    print_step(
        1,
        1,
        LINK,
        &format!("Merging {} directories into {}...", sources.len(), destination.display()),
    );

    let stats = merge_trees(sources, destination)?;

    println!(
        "  {} files written ({} overwritten), {} directories",
        stats.files_copied, stats.files_overwritten, stats.directories
    );
    print_done(started.elapsed());
    Ok(())
}
