//! # Calamity
//!
//! Tooling for pulling models and textures out of an Age of Calamity dump.
//!
//! ## Pipeline
//!
//! - **Install merge** - versioned title directories (base game, update,
//!   DLC) are overlaid into one canonical `romfs` tree
//! - **RDB export** - the archive exporter unpacks the canonical tree
//! - **Texture remap** - for every hash list row, the model is copied into a
//!   per-asset bundle and the KTID tool resolves its texture next to it
//! - **Run log** - per-row failures are collected and written to
//!   `log-<timestamp>.txt`
//!
//! ## Quick Start
//!
//! ```no_run
//! use calamity::prelude::*;
//!
//! let table = PathTable::load("hash-list")?;
//! let pipeline = RemapPipeline::new(
//!     ProcessRunner::new().with_quiet(true),
//!     RemapLayout::in_place("extracted-rdb"),
//!     "Cethleann/Nyotengu.KTID.exe",
//! );
//!
//! let outcome = pipeline.run(&table)?;
//! println!("{} rows failed", outcome.summary.failed);
//! outcome.log.flush(std::path::Path::new("."))?;
//! # Ok::<(), calamity::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `calamity` command-line binary

pub mod config;
pub mod error;
pub mod export;
pub mod merge;
pub mod remap;
pub mod run_log;
pub mod table;
pub mod tool;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::export::{export_archives, verify_export};
    pub use crate::merge::{CanonicalRoot, MergeStats, merge_trees, reconcile_install};
    pub use crate::remap::{
        EditorFolder, RemapLayout, RemapOutcome, RemapPipeline, RemapProgress, RemapSummary, RowFailure,
    };
    pub use crate::run_log::{LogEntry, RunLog};
    pub use crate::table::{PathTable, RejectedLine, TableRow};
    pub use crate::tool::{ProcessRunner, ToolExit, ToolRunner};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
