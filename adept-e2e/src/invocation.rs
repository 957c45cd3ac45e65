//! Construction of compiler invocations from test cases.

use crate::config::RunnerConfig;
use crate::testcase::{CaseKind, ENTRY_POINT_FILE_NAME, TestCase};
use std::{ffi::OsString, path::PathBuf};

/// A fully-prepared compiler command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// The compiler executable.
    pub program: PathBuf,
    /// Arguments following the executable, in order.
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Prepares the invocation that compiles `case` with the configured
    /// compiler.
    ///
    /// Module cases pass the case directory; single-file cases pass the
    /// entry-point file inside it. Whether that file exists is left for the
    /// compiler to discover.
    pub fn for_case(config: &RunnerConfig, case: &TestCase) -> Self {
        let target = match case.kind {
            CaseKind::Module => case.path.clone(),
            CaseKind::SingleFile => case.path.join(ENTRY_POINT_FILE_NAME),
        };

        let mut args = config.infrastructure.args();
        args.push(target.into_os_string());

        Self {
            program: config.compiler_path.clone(),
            args,
        }
    }

    /// Renders the command line for display.
    pub fn display_command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn to_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}
