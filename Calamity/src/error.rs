//! Error types for `Calamity`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `Calamity` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error tied to a specific path.
    #[error("{action} {path}: {source}")]
    PathIo {
        /// What was being attempted (e.g. "failed to copy").
        action: &'static str,
        /// The path involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be copied; either side may be at fault.
    #[error("failed to copy {from} to {to}: {source}")]
    CopyFailed {
        /// Source file.
        from: PathBuf,
        /// Destination file.
        to: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    // ==================== Merge Errors ====================
    /// A merge source directory does not exist or is not a directory.
    #[error("source directory does not exist or could not be found: {path}")]
    SourceDirectoryMissing {
        /// The missing source directory.
        path: PathBuf,
    },

    /// The game path given to the reconciler is not a directory.
    #[error("game path is not a directory: {path}")]
    GamePathNotFound {
        /// The game path as given.
        path: PathBuf,
    },

    // ==================== Export Errors ====================
    /// The archive exporter did not produce the editor directories the remap needs.
    #[error("failed to extract the Character and/or Field Editor (missing {missing}); please review your game dump")]
    ExportIncomplete {
        /// Name of the first missing export directory.
        missing: String,
    },

    /// An external tool could not be started.
    #[error("failed to start {program}: {source}")]
    ToolSpawn {
        /// The executable that failed to start.
        program: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An external tool exited unsuccessfully.
    #[error("{program} exited with {status}")]
    ToolExitFailure {
        /// The executable that was run.
        program: PathBuf,
        /// Human-readable exit status.
        status: String,
    },

    // ==================== Table Errors ====================
    /// The hash list could not be read.
    #[error("failed to read hash list {path}: {source}")]
    TableRead {
        /// The hash list path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    // ==================== Configuration Errors ====================
    /// The configuration file could not be parsed.
    #[error("invalid config {path}: {message}")]
    ConfigParse {
        /// The configuration file path.
        path: PathBuf,
        /// The TOML parser message.
        message: String,
    },

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A path argument was empty.
    #[error("empty path given for {0}")]
    EmptyPath(&'static str),

    // ==================== File System Errors ====================
    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),

    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The rayon thread pool could not be built.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

impl Error {
    /// Wrap an IO error with the path it happened on.
    pub(crate) fn path_io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::PathIo {
            action,
            path: path.into(),
            source,
        }
    }
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `Calamity` operations.
pub type Result<T> = std::result::Result<T, Error>;
