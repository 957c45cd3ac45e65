//! Execution of compiler invocations.

use crate::error::{Error, Result};
use crate::invocation::Invocation;
use std::process::{ExitStatus, Stdio};

/// Result of running the compiler once.
#[derive(Debug)]
pub struct RunResult {
    /// Exit status of the compiler.
    pub exit_status: ExitStatus,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
    /// Wall-clock duration of the run.
    pub duration: std::time::Duration,
}

impl RunResult {
    /// Returns the signal that terminated the compiler, if any.
    #[cfg(unix)]
    pub fn terminating_signal(&self) -> Option<i32> {
        use std::os::unix::process::ExitStatusExt;
        self.exit_status.signal()
    }

    /// Returns the signal that terminated the compiler, if any.
    #[cfg(not(unix))]
    #[allow(clippy::unused_self)]
    pub const fn terminating_signal(&self) -> Option<i32> {
        None
    }
}

impl Invocation {
    /// Runs the compiler to completion and captures its output.
    ///
    /// There is no timeout; a compiler that never exits blocks the caller.
    pub async fn run(&self) -> Result<RunResult> {
        let mut cmd = self.to_command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!("running: {}", self.display_command_line());

        let start_time = std::time::Instant::now();
        let output = cmd.output().await.map_err(|source| Error::CompilerSpawn {
            program: self.program.clone(),
            source,
        })?;
        let duration = start_time.elapsed();

        tracing::debug!("compiler exited with {} after {duration:?}", output.status);

        let result = RunResult {
            exit_status: output.status,
            stdout: String::from_utf8_lossy(output.stdout.as_slice()).to_string(),
            stderr: String::from_utf8_lossy(output.stderr.as_slice()).to_string(),
            duration,
        };

        if let Some(signal) = result.terminating_signal() {
            tracing::warn!(
                "compiler was terminated by signal {signal}: {}",
                self.display_command_line()
            );
        }

        Ok(result)
    }
}
