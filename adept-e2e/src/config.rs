//! Configuration types for the harness.

use clap::Parser;
use std::path::PathBuf;

/// Flag passed to the compiler ahead of the infrastructure directory.
pub const INFRASTRUCTURE_FLAG: &str = "--infrastructure";

/// Infrastructure directory used when none is named explicitly.
pub const DEFAULT_INFRASTRUCTURE_DIR: &str = "infrastructure";

/// Controls whether invocations carry the infrastructure flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfrastructureOption {
    /// Whether to pass the flag at all.
    pub include_flag: bool,
    /// Directory passed as the flag's value.
    pub dir: PathBuf,
}

impl InfrastructureOption {
    /// No infrastructure flag on any invocation.
    pub fn disabled() -> Self {
        Self {
            include_flag: false,
            dir: PathBuf::from(DEFAULT_INFRASTRUCTURE_DIR),
        }
    }

    /// Passes `--infrastructure <dir>` on every invocation.
    pub fn enabled(dir: impl Into<PathBuf>) -> Self {
        Self {
            include_flag: true,
            dir: dir.into(),
        }
    }

    /// Returns the arguments this option contributes to an invocation.
    pub fn args(&self) -> Vec<std::ffi::OsString> {
        if self.include_flag {
            vec![INFRASTRUCTURE_FLAG.into(), self.dir.clone().into_os_string()]
        } else {
            vec![]
        }
    }
}

impl Default for InfrastructureOption {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Configuration for the test runner.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Path to the compiler executable under test.
    pub compiler_path: PathBuf,
    /// Directory containing the `success` and `error` roots.
    pub tests_dir: PathBuf,
    /// Infrastructure flag handling.
    pub infrastructure: InfrastructureOption,
}

impl RunnerConfig {
    /// Creates a new runner config with default values.
    pub fn new(compiler_path: impl Into<PathBuf>, tests_dir: impl Into<PathBuf>) -> Self {
        Self {
            compiler_path: compiler_path.into(),
            tests_dir: tests_dir.into(),
            infrastructure: InfrastructureOption::default(),
        }
    }

    /// Derives a runner config from parsed command-line options.
    pub fn from_options(options: &TestOptions) -> Self {
        let tests_dir = options
            .tests_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config = Self::new(options.compiler_path.clone(), tests_dir);

        match &options.infrastructure {
            Some(dir) => config.with_infrastructure(InfrastructureOption::enabled(dir)),
            None => config,
        }
    }

    /// Sets the infrastructure option.
    #[must_use]
    pub fn with_infrastructure(mut self, infrastructure: InfrastructureOption) -> Self {
        self.infrastructure = infrastructure;
        self
    }
}

/// Output format for test results.
#[derive(Clone, Copy, Default, clap::ValueEnum, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// `JUnit` XML format.
    Junit,
    /// Summary only.
    Terse,
}

/// Command-line options for the harness.
#[derive(Clone, Parser, Debug)]
#[clap(version, about)]
pub struct TestOptions {
    /// Path to the compiler executable under test.
    #[clap(long = "compiler-path", env = "ADEPT_PATH")]
    pub compiler_path: PathBuf,

    /// Directory containing the `success` and `error` case roots.
    #[clap(long = "tests-path", env = "ADEPT_E2E_TESTS")]
    pub tests_path: Option<PathBuf>,

    /// Pass `--infrastructure <DIR>` to the compiler on every invocation.
    ///
    /// A directory must be attached with `=`, e.g. `--infrastructure=../infra`;
    /// a bare flag uses the default directory.
    #[clap(
        long = "infrastructure",
        env = "ADEPT_INFRASTRUCTURE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_INFRASTRUCTURE_DIR
    )]
    pub infrastructure: Option<PathBuf>,

    /// Output format for test results.
    #[clap(long = "format", default_value = "pretty")]
    pub format: OutputFormat,

    /// Display details regarding successful test cases.
    #[clap(short = 'v', long = "verbose", env = "ADEPT_E2E_VERBOSE")]
    pub verbose: bool,

    /// List available tests without running them.
    #[clap(long = "list")]
    pub list_tests_only: bool,

    /// Exactly match filters (not just substring match).
    #[clap(long = "exact")]
    pub exact_match: bool,

    /// Enable debug logging.
    #[clap(long = "log-debug")]
    pub log_debug: bool,

    /// Enable trace logging.
    #[clap(long = "log-trace")]
    pub log_trace: bool,

    /// Patterns for tests to be excluded.
    #[clap(long = "skip")]
    pub exclude_filters: Vec<String>,

    /// Patterns for tests to be included.
    pub include_filters: Vec<String>,
}

impl TestOptions {
    /// Returns options that run every case against `compiler_path` with
    /// default settings.
    pub fn for_compiler(compiler_path: impl Into<PathBuf>) -> Self {
        Self {
            compiler_path: compiler_path.into(),
            tests_path: None,
            infrastructure: None,
            format: OutputFormat::default(),
            verbose: false,
            list_tests_only: false,
            exact_match: false,
            log_debug: false,
            log_trace: false,
            exclude_filters: vec![],
            include_filters: vec![],
        }
    }

    /// Returns whether a test should run based on include/exclude filters.
    pub fn should_run_test(&self, qualified_name: &str) -> bool {
        if self.include_filters.is_empty() && self.exclude_filters.is_empty() {
            return true;
        }

        // If any include filters were given, then we are in opt-in mode.
        if !self.include_filters.is_empty()
            && !self.test_matches_filters(qualified_name, &self.include_filters)
        {
            return false;
        }

        // In all cases, exclude filters may be used to exclude tests.
        if !self.exclude_filters.is_empty()
            && self.test_matches_filters(qualified_name, &self.exclude_filters)
        {
            return false;
        }

        true
    }

    fn test_matches_filters(&self, qualified_test_name: &str, filters: &[String]) -> bool {
        if self.exact_match {
            filters.iter().any(|f| f == qualified_test_name)
        } else {
            filters
                .iter()
                .any(|filter| qualified_test_name.contains(filter))
        }
    }
}
