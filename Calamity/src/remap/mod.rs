//! Hash list driven texture remap
//!
//! For every hash list row the pipeline:
//!
//! 1. classifies the row into an [`EditorFolder`],
//! 2. checks that `<asset>.g1m` was exported, then creates the bundle
//!    `<output>/<folder>/merged/<asset>`,
//! 3. copies the model into the bundle,
//! 4. runs the KTID tool on the row's `kidsobjdb` entry,
//! 5. moves the resolved `<texture>.g1t` into the bundle.
//!
//! Rows run in parallel on the rayon pool. A failing or panicking row is
//! recorded in the [`RunLog`] and never stops the other rows.

mod folder;
mod layout;
mod types;

pub use folder::EditorFolder;
pub use layout::RemapLayout;
pub use types::{RemapProgress, RemapSummary, RowFailure, RowOutput};

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::run_log::{LogEntry, RunLog};
use crate::table::{PathTable, TableRow};
use crate::tool::ToolRunner;
use crate::utils::{copy_or_replace, ensure_dir, move_or_replace};

/// Log and counters of a finished remap
#[derive(Debug)]
pub struct RemapOutcome {
    /// Failures, in completion order
    pub log: RunLog,
    /// Row counters
    pub summary: RemapSummary,
}

/// Runs the KTID remap over a hash list
#[derive(Debug, Clone)]
pub struct RemapPipeline<R> {
    runner: R,
    layout: RemapLayout,
    ktid_tool: PathBuf,
    threads: usize,
}

impl<R: ToolRunner> RemapPipeline<R> {
    /// Create a pipeline that resolves textures with `ktid_tool`
    pub fn new(runner: R, layout: RemapLayout, ktid_tool: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            layout,
            ktid_tool: ktid_tool.into(),
            threads: 0,
        }
    }

    /// Limit the worker threads; 0 uses the global rayon pool
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Path layout used by this pipeline
    pub fn layout(&self) -> &RemapLayout {
        &self.layout
    }

    /// Run every row of `table`
    pub fn run(&self, table: &PathTable) -> Result<RemapOutcome> {
        self.run_with_progress(table, |_| {})
    }

    /// Run every row of `table`, reporting each finished row to `progress`
    pub fn run_with_progress<F>(&self, table: &PathTable, progress: F) -> Result<RemapOutcome>
    where
        F: Fn(&RemapProgress) + Send + Sync,
    {
        if self.threads == 0 {
            return Ok(self.run_rows(table, &progress));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;
        Ok(pool.install(|| self.run_rows(table, &progress)))
    }

    /// Process a single row
    pub fn process_row(&self, row: &TableRow) -> std::result::Result<RowOutput, RowFailure> {
        let folder = EditorFolder::classify(&row.database_key);
        let model_source = self.layout.model_source(folder, &row.asset_id);
        if !model_source.is_file() {
            return Err(RowFailure::ModelMissing { path: model_source });
        }

        let bundle = self.layout.bundle_dir(folder, &row.asset_id);
        ensure_dir(&bundle)?;
        let model = bundle.join(format!("{}.g1m", row.asset_id));
        copy_or_replace(&model_source, &model)?;

        let args = vec![
            self.layout.database_file(&row.database_key).into_os_string(),
            self.layout.texture_source_dir().into_os_string(),
            self.layout.scratch_ktid(folder, &row.texture_key).into_os_string(),
        ];
        self.runner
            .run(&self.ktid_tool, &args)
            .and_then(|exit| exit.check(&self.ktid_tool))
            .map_err(RowFailure::ToolFailed)?;

        let texture_source = self.layout.scratch_g1t(folder, &row.texture_key);
        if !texture_source.is_file() {
            return Err(RowFailure::OutputMissing { path: texture_source });
        }
        let texture = bundle.join(format!("{}.g1t", row.texture_key));
        move_or_replace(&texture_source, &texture)?;

        Ok(RowOutput {
            folder,
            bundle,
            model,
            texture,
        })
    }

    /// Process a single row, turning a panic into [`RowFailure::Panicked`]
    fn process_row_guarded(&self, row: &TableRow) -> std::result::Result<RowOutput, RowFailure> {
        panic::catch_unwind(AssertUnwindSafe(|| self.process_row(row)))
            .unwrap_or_else(|payload| Err(RowFailure::Panicked(panic_message(payload.as_ref()))))
    }

    fn run_rows(&self, table: &PathTable, progress: &(dyn Fn(&RemapProgress) + Send + Sync)) -> RemapOutcome {
        let log = RunLog::new();

        for rejected in table.rejected() {
            let failure = RowFailure::Malformed {
                token_count: rejected.token_count,
            };
            tracing::warn!("Skipping hash list line {}: {failure}", rejected.line);
            log.append(LogEntry::now(
                format!("line {}: {:?}", rejected.line, rejected.text),
                failure.to_string(),
            ));
        }

        let total = table.len();
        let processed = AtomicUsize::new(0);
        tracing::info!(
            "Remapping {total} rows from {} into {}",
            self.layout.export_root().display(),
            self.layout.output_root().display()
        );

        let bundles: Vec<Option<PathBuf>> = table
            .rows()
            .par_iter()
            .map(|row| {
                let result = self.process_row_guarded(row);
                let failed = result.is_err();

                let bundle = match result {
                    Ok(output) => {
                        tracing::debug!("Remapped {} -> {}", row, display_relative(&output.texture, self.layout.output_root()));
                        Some(output.bundle)
                    }
                    Err(failure) => {
                        tracing::warn!("Row failed ({row}): {failure}");
                        log.append(LogEntry::now(row.to_string(), failure.to_string()));
                        None
                    }
                };

                let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
                progress(&RemapProgress {
                    current,
                    total,
                    asset_id: row.asset_id.clone(),
                    failed,
                });

                bundle
            })
            .collect();

        let succeeded = bundles.iter().filter(|b| b.is_some()).count();
        let distinct: HashSet<PathBuf> = bundles.into_iter().flatten().collect();
        let summary = RemapSummary {
            succeeded,
            failed: log.len(),
            bundles: distinct.len(),
        };

        tracing::info!(
            "Remap finished: {} succeeded, {} failed, {} bundles",
            summary.succeeded,
            summary.failed,
            summary.bundles
        );

        RemapOutcome { log, summary }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn display_relative(path: &Path, base: &Path) -> String {
    crate::utils::normalize_path(path.strip_prefix(base).unwrap_or(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    use crate::tool::ToolExit;

    /// Writes `<scratch>.g1t` next to the `.ktid` argument, like the real tool
    #[derive(Default)]
    struct FakeKtid {
        calls: Mutex<Vec<Vec<OsString>>>,
    }

    impl ToolRunner for FakeKtid {
        fn run(&self, _program: &Path, args: &[OsString]) -> Result<ToolExit> {
            self.calls.lock().unwrap().push(args.to_vec());
            let out = PathBuf::from(&args[2]).with_extension("g1t");
            fs::create_dir_all(out.parent().unwrap()).unwrap();
            fs::write(out, b"G1TG").unwrap();
            Ok(ToolExit::SUCCESS)
        }
    }

    /// Exits with the given code and writes nothing
    struct ExitOnly(Option<i32>);

    impl ToolRunner for ExitOnly {
        fn run(&self, _program: &Path, _args: &[OsString]) -> Result<ToolExit> {
            Ok(ToolExit { code: self.0 })
        }
    }

    /// Panics for the texture key "bad", behaves like [`FakeKtid`] otherwise
    #[derive(Default)]
    struct CrashingKtid(FakeKtid);

    impl ToolRunner for CrashingKtid {
        fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolExit> {
            assert!(!PathBuf::from(&args[2]).ends_with("bad.ktid"), "KTID tool crashed");
            self.0.run(program, args)
        }
    }

    fn export_model(export: &Path, folder: &str, asset: &str) {
        let dir = export.join(folder).join("g1m");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{asset}.g1m")), asset.as_bytes()).unwrap();
    }

    #[test]
    fn test_process_row_passes_three_paths() {
        let temp = TempDir::new().unwrap();
        let export = temp.path().join("export");
        export_model(&export, "FieldEditor4", "tree01");

        let runner = FakeKtid::default();
        let pipeline = RemapPipeline::new(&runner, RemapLayout::new(&export, temp.path().join("out")), "ktid");
        let output = pipeline
            .process_row(&TableRow::new("tree01", "t77", "FieldEditor4/obj/tree"))
            .unwrap();

        assert_eq!(output.folder, EditorFolder::FieldEditor4);
        assert!(output.model.is_file());
        assert!(output.texture.is_file());

        let calls = runner.calls.lock().unwrap();
        assert_eq!(
            calls[0],
            vec![
                export.join("KIDSSystemResource/kidsobjdb/FieldEditor4/obj/tree").into_os_string(),
                export.join("MaterialEditor/g1t").into_os_string(),
                export.join("FieldEditor4/ktid/t77.ktid").into_os_string(),
            ]
        );
    }

    #[test]
    fn test_missing_model_skips_tool() {
        let temp = TempDir::new().unwrap();
        let runner = FakeKtid::default();
        let pipeline = RemapPipeline::new(&runner, RemapLayout::in_place(temp.path()), "ktid");

        let err = pipeline
            .process_row(&TableRow::new("ghost", "t1", "CharacterEditor/x"))
            .unwrap_err();

        assert!(matches!(err, RowFailure::ModelMissing { .. }));
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_nonzero_exit_is_tool_failure() {
        let temp = TempDir::new().unwrap();
        export_model(temp.path(), "CharacterEditor", "m");
        let pipeline = RemapPipeline::new(ExitOnly(Some(1)), RemapLayout::in_place(temp.path()), "ktid");

        let err = pipeline.process_row(&TableRow::new("m", "t", "CharacterEditor/x")).unwrap_err();
        assert!(matches!(err, RowFailure::ToolFailed(_)));
    }

    #[test]
    fn test_silent_tool_is_output_missing() {
        let temp = TempDir::new().unwrap();
        export_model(temp.path(), "CharacterEditor", "m");
        let pipeline = RemapPipeline::new(ExitOnly(Some(0)), RemapLayout::in_place(temp.path()), "ktid");

        let err = pipeline.process_row(&TableRow::new("m", "t", "CharacterEditor/x")).unwrap_err();
        assert!(matches!(err, RowFailure::OutputMissing { .. }));
        // The model was already placed before the tool ran
        assert!(temp.path().join("CharacterEditor/merged/m/m.g1m").is_file());
    }

    #[test]
    fn test_missing_model_creates_no_bundle() {
        let temp = TempDir::new().unwrap();
        let pipeline = RemapPipeline::new(FakeKtid::default(), RemapLayout::in_place(temp.path()), "ktid");

        pipeline
            .process_row(&TableRow::new("ghost", "t1", "CharacterEditor/x"))
            .unwrap_err();

        assert!(!temp.path().join("CharacterEditor/merged/ghost").exists());
    }

    #[test]
    fn test_panicking_row_is_isolated() {
        let temp = TempDir::new().unwrap();
        export_model(temp.path(), "CharacterEditor", "a");
        export_model(temp.path(), "CharacterEditor", "b");
        let table = PathTable::parse("a good CharacterEditor/x\nb bad CharacterEditor/y\n");

        let pipeline = RemapPipeline::new(CrashingKtid::default(), RemapLayout::in_place(temp.path()), "ktid");
        let outcome = pipeline.run(&table).unwrap();

        assert_eq!(outcome.summary, RemapSummary { succeeded: 1, failed: 1, bundles: 1 });
        let entries = outcome.log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].context, "b bad CharacterEditor/y");
        assert!(entries[0].detail.contains("KTID tool crashed"));
        assert!(temp.path().join("CharacterEditor/merged/a/good.g1t").is_file());
    }

    #[test]
    fn test_rejected_lines_are_logged() {
        let temp = TempDir::new().unwrap();
        export_model(temp.path(), "CharacterEditor", "m");
        let table = PathTable::parse("m t CharacterEditor/x\nbroken line\n");

        let pipeline = RemapPipeline::new(FakeKtid::default(), RemapLayout::in_place(temp.path()), "ktid");
        let outcome = pipeline.run(&table).unwrap();

        assert_eq!(outcome.summary, RemapSummary { succeeded: 1, failed: 1, bundles: 1 });
        let entries = outcome.log.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].context.starts_with("line 2"));
    }

    #[test]
    fn test_progress_reports_every_row() {
        let temp = TempDir::new().unwrap();
        export_model(temp.path(), "CharacterEditor", "a");
        let table = PathTable::from_rows(vec![
            TableRow::new("a", "t1", "CharacterEditor/1"),
            TableRow::new("a", "t2", "CharacterEditor/2"),
            TableRow::new("missing", "t3", "CharacterEditor/3"),
        ]);

        let seen = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);
        let pipeline = RemapPipeline::new(FakeKtid::default(), RemapLayout::in_place(temp.path()), "ktid")
            .with_threads(2);
        pipeline
            .run_with_progress(&table, |p| {
                assert_eq!(p.total, 3);
                seen.fetch_add(1, Ordering::SeqCst);
                if p.failed {
                    failed.fetch_add(1, Ordering::SeqCst);
                }
            })
            .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 3);
        assert_eq!(failed.load(Ordering::SeqCst), 1);
    }
}
