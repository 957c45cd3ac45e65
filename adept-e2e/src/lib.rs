//! End-to-end test harness for the Adept compiler.
//!
//! Cases live in two roots under a tests directory. Every subdirectory of
//! `success/` must compile cleanly and every subdirectory of `error/` must be
//! rejected. A case directory holding `_.adept` is compiled as a module (the
//! directory itself is the target); otherwise its `main.adept` is compiled.
//!
//! Cases run one at a time in name order, success root first. The harness
//! only checks whether the compiler accepted or rejected each case, judged by
//! its exit status.

mod classify;
mod config;
mod error;
mod execution;
mod invocation;
pub mod logging;
mod reporting;
mod runner;
mod testcase;

pub use classify::{Verdict, classify};
pub use config::{
    DEFAULT_INFRASTRUCTURE_DIR, INFRASTRUCTURE_FLAG, InfrastructureOption, OutputFormat,
    RunnerConfig, TestOptions,
};
pub use error::{Error, Result};
pub use execution::RunResult;
pub use invocation::Invocation;
pub use reporting::{RunResults, TestCaseResult, report_results};
pub use runner::TestRunner;
pub use testcase::{
    CaseKind, CaseRoot, ENTRY_POINT_FILE_NAME, Expectation, MODULE_MARKER_FILE_NAME, TestCase,
    discover_cases,
};
