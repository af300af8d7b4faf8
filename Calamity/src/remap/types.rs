//! Types for remap results and progress tracking

use std::path::PathBuf;

use thiserror::Error;

use super::folder::EditorFolder;
use crate::error::Error;

/// Why a single hash list row failed
#[derive(Error, Debug)]
pub enum RowFailure {
    /// The line did not have three fields
    #[error("malformed hash list row: expected 3 fields, found {token_count}")]
    Malformed {
        /// Number of fields found
        token_count: usize,
    },

    /// The exported model for the row does not exist
    #[error("model file not found: {path}")]
    ModelMissing {
        /// Expected model path
        path: PathBuf,
    },

    /// The KTID tool could not be started or exited unsuccessfully
    #[error("KTID tool failed: {0}")]
    ToolFailed(#[source] Error),

    /// The KTID tool exited without producing the expected texture
    #[error("KTID tool produced no texture at {path}")]
    OutputMissing {
        /// Expected texture path
        path: PathBuf,
    },

    /// Processing the row panicked
    #[error("row processing panicked: {0}")]
    Panicked(String),

    /// Creating the bundle or placing a file failed
    #[error(transparent)]
    Io(#[from] Error),
}

/// Files written by a successful row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutput {
    /// Folder the row was classified into
    pub folder: EditorFolder,
    /// Bundle directory
    pub bundle: PathBuf,
    /// Model copied into the bundle
    pub model: PathBuf,
    /// Texture moved into the bundle
    pub texture: PathBuf,
}

/// Progress information, reported once per finished row
#[derive(Debug, Clone)]
pub struct RemapProgress {
    /// Rows finished so far (1-indexed)
    pub current: usize,
    /// Total rows in the table
    pub total: usize,
    /// Asset id of the row that just finished
    pub asset_id: String,
    /// Whether that row failed
    pub failed: bool,
}

impl RemapProgress {
    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Counters for a finished remap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemapSummary {
    /// Rows that produced a model and a texture
    pub succeeded: usize,
    /// Rows recorded in the run log, including malformed lines
    pub failed: usize,
    /// Distinct bundles with at least one successful row
    pub bundles: usize,
}
