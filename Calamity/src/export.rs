//! RDB archive export
//!
//! Runs the archive exporter over `<install root>/asset` and checks that the
//! editor directories the remap reads from were produced.

use std::ffi::OsString;
use std::path::Path;

use crate::error::{Error, Result};
use crate::remap::EditorFolder;
use crate::tool::ToolRunner;
use crate::utils::{absolutize, ensure_dir};

/// Export the install's RDB archives into `export_root`.
///
/// The exporter is invoked as
/// `<exporter> --nyotengu <export root> <install root>/asset` with absolute
/// paths, then [`verify_export`] runs on the result.
pub fn export_archives<R: ToolRunner>(
    runner: &R,
    exporter: &Path,
    install_root: &Path,
    export_root: &Path,
) -> Result<()> {
    ensure_dir(export_root)?;

    let args: Vec<OsString> = vec![
        "--nyotengu".into(),
        absolutize(export_root)?.into_os_string(),
        absolutize(&install_root.join("asset"))?.into_os_string(),
    ];

    tracing::info!("Extracting RDB archives from {} into {}", install_root.display(), export_root.display());
    let exit = runner.run(exporter, &args)?;
    if !exit.success() {
        // Only the directory check below decides whether the run can continue
        tracing::warn!("{} finished with {exit}", exporter.display());
    }

    verify_export(export_root)
}

/// Check that both editor directories exist under `export_root`
pub fn verify_export(export_root: &Path) -> Result<()> {
    for folder in EditorFolder::all() {
        if !export_root.join(folder.as_str()).is_dir() {
            return Err(Error::ExportIncomplete {
                missing: folder.as_str().to_string(),
            });
        }
    }
    Ok(())
}
