//! Error types for the harness.

use std::path::PathBuf;

/// Monolithic error type for the harness.
///
/// Every variant is fatal to a run. A compiler that merely exits with an
/// unexpected status is not an error; it is recorded as a failed case.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A test case root could not be listed.
    #[error("failed to discover test cases under {root}")]
    CaseDiscovery {
        /// The root directory being listed.
        root: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The compiler process could not be started or waited on.
    #[error("failed to run compiler {program}")]
    CompilerSpawn {
        /// The executable that was being launched.
        program: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a report failed.
    #[error("failed to write report: {0}")]
    Report(String),

    /// Generic I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the harness.
pub type Result<T> = std::result::Result<T, Error>;
