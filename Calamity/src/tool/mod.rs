//! External tool invocation
//!
//! The exporter and the KTID resolver are third-party executables. They are
//! started through [`ToolRunner`] so the pipeline can be exercised with
//! fakes that write the expected outputs instead of running real binaries.
//!
//! Invocations are synchronous: [`ToolRunner::run`] blocks until the process
//! exits. There is no timeout, so a hung tool hangs its caller.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Exit status of an external tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl ToolExit {
    /// Exit status for a clean exit
    pub const SUCCESS: ToolExit = ToolExit { code: Some(0) };

    /// Whether the tool exited with code 0
    pub fn success(self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into [`Error::ToolExitFailure`]
    pub fn check(self, program: &Path) -> Result<()> {
        if self.success() {
            Ok(())
        } else {
            Err(Error::ToolExitFailure {
                program: program.to_path_buf(),
                status: self.to_string(),
            })
        }
    }
}

impl fmt::Display for ToolExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "termination by signal"),
        }
    }
}

/// Runs an external executable and waits for it to exit
pub trait ToolRunner: Send + Sync {
    /// Run `program` with `args`, blocking until it exits.
    ///
    /// Errors only when the process cannot be started; a non-zero exit is
    /// reported through [`ToolExit`].
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolExit>;
}

impl<T: ToolRunner + ?Sized> ToolRunner for &T {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolExit> {
        (**self).run(program, args)
    }
}

/// Runs tools as child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner {
    quiet: bool,
}

impl ProcessRunner {
    /// Create a runner that inherits stdout/stderr
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the child's stdout/stderr
    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolExit> {
        tracing::debug!("Running {} {:?}", program.display(), args);

        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null());
        if self.quiet {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = command.status().map_err(|source| Error::ToolSpawn {
            program: program.to_path_buf(),
            source,
        })?;

        Ok(ToolExit { code: status.code() })
    }
}
