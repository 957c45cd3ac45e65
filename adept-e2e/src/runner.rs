//! Test runner implementation.

use crate::classify::classify;
use crate::config::{RunnerConfig, TestOptions};
use crate::error::Result;
use crate::invocation::Invocation;
use crate::reporting::{RunResults, TestCaseResult};
use crate::testcase::{CaseRoot, TestCase, discover_cases};

/// The main test runner.
pub struct TestRunner {
    config: RunnerConfig,
    options: TestOptions,
}

impl TestRunner {
    /// Creates a new test runner with the given configuration and options.
    pub const fn new(config: RunnerConfig, options: TestOptions) -> Self {
        Self { config, options }
    }

    /// Discovers the cases of both roots, success cases first.
    ///
    /// Both roots are listed before anything runs, so a missing root fails
    /// the run up front.
    pub fn discover(&self) -> Result<Vec<TestCase>> {
        let mut cases = vec![];
        for root in CaseRoot::ALL {
            cases.extend(discover_cases(&self.config.tests_dir, root)?);
        }

        Ok(cases)
    }

    /// Returns the qualified names of the cases that the filters select, in
    /// run order.
    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self
            .discover()?
            .iter()
            .map(TestCase::qualified_name)
            .filter(|name| self.options.should_run_test(name))
            .collect())
    }

    /// Runs every selected case, one at a time, and returns the aggregate.
    ///
    /// A case whose compiler exit status contradicts its expectation is
    /// recorded as failed; only discovery and spawn failures end the run
    /// early.
    pub async fn run(&self) -> Result<RunResults> {
        let cases = self.discover()?;

        tracing::info!(
            "running {} case(s) from {}",
            cases.len(),
            self.config.tests_dir.display()
        );

        let mut results = RunResults::new();
        for case in cases {
            let result = if self.options.should_run_test(&case.qualified_name()) {
                self.run_single_test(case).await?
            } else {
                tracing::debug!("skipping {}", case.qualified_name());
                TestCaseResult::skipped(case)
            };

            results.record(result);
        }

        tracing::info!(
            "{} attempted, {} passed, {} failed",
            results.attempted_count(),
            results.success_count(),
            results.fail_count()
        );

        Ok(results)
    }

    async fn run_single_test(&self, case: TestCase) -> Result<TestCaseResult> {
        let invocation = Invocation::for_case(&self.config, &case);
        let run = invocation.run().await?;
        let verdict = classify(case.expectation(), run.exit_status);

        tracing::debug!("{}: {verdict:?}", case.qualified_name());

        Ok(TestCaseResult::ran(case, invocation, run, verdict))
    }
}
