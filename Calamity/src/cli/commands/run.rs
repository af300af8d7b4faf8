//! CLI command for the full extraction pipeline

use std::path::Path;
use std::time::Instant;

use anyhow::Context;

use crate::cli::progress::{DOCUMENT, LINK, LOOKING_GLASS, PACKAGE, PICTURE, print_done, print_step};
use crate::config::Config;
use crate::export::export_archives;
use crate::merge::{CanonicalRoot, reconcile_install};
use crate::table::PathTable;
use crate::tool::ProcessRunner;
use crate::utils::expand_user_path;

use super::remap::{print_summary, remap_table};

const STEPS: usize = 5;

pub fn execute(game_path: &str, hash_list: &Path, config: &Config, progress: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let game_path = expand_user_path(game_path, "the Age of Calamity game files")
        .context("Please specify the path to your Age of Calamity game files")?;

    print_step(1, STEPS, LINK, "Merging AoC directories...");
    let root = reconcile_install(&game_path, &config.title, &config.paths.merged_root)?;
    match &root {
        CanonicalRoot::AsProvided(path) => {
            println!("  No versioned title directories, using {}", path.display());
        }
        CanonicalRoot::Merged { titles, stats, .. } => {
            println!(
                "  Merged {} title directories ({} files, {} overwritten)",
                titles.len(),
                stats.files_copied,
                stats.files_overwritten
            );
        }
    }

    print_step(2, STEPS, PACKAGE, "Extracting RDB archives...");
    let runner = ProcessRunner::new().with_quiet(config.tools.quiet);
    export_archives(&runner, &config.tools.exporter, root.path(), &config.paths.export_root)?;

    print_step(3, STEPS, LOOKING_GLASS, "Loading hash list...");
    let table = PathTable::load(hash_list)?;

    print_step(4, STEPS, PICTURE, "Patching g1t textures...");
    let (summary, log_path) = remap_table(&table, config, progress)?;

    print_step(5, STEPS, DOCUMENT, &format!("Log written to {}", log_path.display()));
    print_summary(&summary);
    print_done(started.elapsed());
    Ok(())
}
