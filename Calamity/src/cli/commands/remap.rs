//! CLI command for the hash list texture remap

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::Context;
use console::style;

use crate::cli::progress::{DOCUMENT, LOOKING_GLASS, PICTURE, batch_bar, print_done, print_step};
use crate::config::Config;
use crate::remap::{RemapLayout, RemapPipeline, RemapSummary};
use crate::table::PathTable;
use crate::tool::ProcessRunner;

pub fn execute(hash_list: &Path, config: &Config, progress: bool) -> anyhow::Result<()> {
    let started = Instant::now();

    print_step(1, 3, LOOKING_GLASS, "Loading hash list...");
    let table = PathTable::load(hash_list)?;

    print_step(2, 3, PICTURE, "Patching g1t textures...");
    let (summary, log_path) = remap_table(&table, config, progress)?;

    print_step(3, 3, DOCUMENT, &format!("Log written to {}", log_path.display()));
    print_summary(&summary);
    print_done(started.elapsed());
    Ok(())
}

/// Remap `table` against the configured export tree and flush the run log.
///
/// Returns the counters and the path of the written log.
pub(super) fn remap_table(
    table: &PathTable,
    config: &Config,
    progress: bool,
) -> anyhow::Result<(RemapSummary, PathBuf)> {
    let layout = RemapLayout::new(&config.paths.export_root, config.paths.output_root());
    let runner = ProcessRunner::new().with_quiet(config.tools.quiet);
    let pipeline = RemapPipeline::new(runner, layout, &config.tools.ktid).with_threads(config.pipeline.threads);

    let pb = batch_bar(table.len() as u64, "Patching", !progress);
    let failed = AtomicUsize::new(0);
    let outcome = pipeline.run_with_progress(table, |p| {
        if p.failed {
            let count = failed.fetch_add(1, Ordering::SeqCst) + 1;
            pb.set_message(format!("({count} failed)"));
        }
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    let log_path = outcome
        .log
        .flush(&config.paths.log_dir)
        .context("writing run log")?;

    Ok((outcome.summary, log_path))
}

pub(super) fn print_summary(summary: &RemapSummary) {
    let failed = if summary.failed == 0 {
        style(summary.failed.to_string()).green()
    } else {
        style(summary.failed.to_string()).yellow()
    };
    println!(
        "  {} rows patched into {} bundles, {} failed",
        summary.succeeded, summary.bundles, failed
    );
}
