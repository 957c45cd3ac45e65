//! Reporting utilities for test results.

use crate::classify::Verdict;
use crate::config::{OutputFormat, TestOptions};
use crate::error::{Error, Result};
use crate::execution::RunResult;
use crate::invocation::Invocation;
use crate::testcase::{CaseRoot, TestCase};
use colored::Colorize;
use std::io::Write;

/// Result of a single test case.
pub struct TestCaseResult {
    /// The case that ran (or was skipped).
    pub case: TestCase,
    /// The invocation used; `None` when skipped.
    pub invocation: Option<Invocation>,
    /// Observed compiler result; `None` when skipped.
    pub run: Option<RunResult>,
    /// Classification; `None` when skipped.
    pub verdict: Option<Verdict>,
}

impl TestCaseResult {
    /// Creates a result for a case that ran.
    pub const fn ran(
        case: TestCase,
        invocation: Invocation,
        run: RunResult,
        verdict: Verdict,
    ) -> Self {
        Self {
            case,
            invocation: Some(invocation),
            run: Some(run),
            verdict: Some(verdict),
        }
    }

    /// Creates a result for a case excluded by filters.
    pub const fn skipped(case: TestCase) -> Self {
        Self {
            case,
            invocation: None,
            run: None,
            verdict: None,
        }
    }

    /// Returns whether the case was skipped.
    pub const fn is_skipped(&self) -> bool {
        self.verdict.is_none()
    }

    /// Returns whether the case ran and passed.
    pub fn passed(&self) -> bool {
        self.verdict.is_some_and(Verdict::is_pass)
    }

    /// Returns whether the case ran and failed.
    pub const fn failed(&self) -> bool {
        matches!(self.verdict, Some(Verdict::Fail))
    }

    fn duration(&self) -> std::time::Duration {
        self.run.as_ref().map(|r| r.duration).unwrap_or_default()
    }

    /// Writes the details of this result to a writer.
    pub fn write_details<W: Write>(&self, mut writer: W, options: &TestOptions) -> Result<()> {
        if self.is_skipped() {
            return Ok(());
        }

        write!(
            writer,
            "* {}: [{}]... ",
            "Test case".bright_yellow(),
            self.case.qualified_name().italic()
        )?;

        if self.passed() {
            writeln!(writer, "{}", "ok.".bright_green())?;
            if options.verbose
                && let Some(invocation) = &self.invocation
            {
                writeln!(writer, "    command: {}", invocation.display_command_line())?;
            }
            return Ok(());
        }

        writeln!(writer)?;

        writeln!(
            writer,
            "    expected {}",
            self.case.expectation().to_string().cyan()
        )?;

        if let Some(run) = &self.run {
            match (run.exit_status.code(), run.terminating_signal()) {
                (Some(code), _) => {
                    writeln!(writer, "    exited with {}", code.to_string().bright_red())?;
                }
                (None, Some(signal)) => writeln!(
                    writer,
                    "    terminated by signal {}",
                    signal.to_string().bright_red()
                )?,
                (None, None) => {
                    writeln!(writer, "    {}", run.exit_status.to_string().bright_red())?;
                }
            }
        }

        if let Some(invocation) = &self.invocation {
            writeln!(writer, "    command: {}", invocation.display_command_line())?;
        }

        if let Some(run) = &self.run {
            write_captured(&mut writer, "stdout", &run.stdout)?;
            write_captured(&mut writer, "stderr", &run.stderr)?;
        }

        writeln!(writer, "    {}", "FAILED.".bright_red())?;

        Ok(())
    }
}

fn write_captured<W: Write>(writer: &mut W, label: &str, contents: &str) -> Result<()> {
    if contents.is_empty() {
        return Ok(());
    }

    writeln!(
        writer,
        "          {}",
        format!("------ Compiler: {label} ---------------------------------").cyan()
    )?;
    writeln!(writer, "{}", indent::indent_all_by(10, contents))?;

    Ok(())
}

/// Aggregate results of a run.
///
/// Created empty at the start of a run and appended to as each case
/// completes; case order is run order.
#[derive(Default)]
pub struct RunResults {
    /// Individual results, in run order.
    pub test_case_results: Vec<TestCaseResult>,
}

impl RunResults {
    /// Creates an empty aggregate.
    pub const fn new() -> Self {
        Self {
            test_case_results: vec![],
        }
    }

    /// Records the result of one case.
    pub fn record(&mut self, result: TestCaseResult) {
        self.test_case_results.push(result);
    }

    /// Number of cases that ran.
    pub fn attempted_count(&self) -> usize {
        self.test_case_results
            .iter()
            .filter(|r| !r.is_skipped())
            .count()
    }

    /// Number of cases that passed.
    pub fn success_count(&self) -> usize {
        self.test_case_results.iter().filter(|r| r.passed()).count()
    }

    /// Number of cases that failed.
    pub fn fail_count(&self) -> usize {
        self.test_case_results.iter().filter(|r| r.failed()).count()
    }

    /// Number of cases excluded by filters.
    pub fn skip_count(&self) -> usize {
        self.test_case_results
            .iter()
            .filter(|r| r.is_skipped())
            .count()
    }

    /// Total duration of all compiler runs.
    pub fn total_duration(&self) -> std::time::Duration {
        self.test_case_results.iter().map(|r| r.duration()).sum()
    }

    /// Returns whether no attempted case failed.
    pub fn all_passed(&self) -> bool {
        self.fail_count() == 0
    }

    /// Process exit code for the harness: 0 if every attempted case passed.
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.all_passed())
    }

    /// Returns the results for one root, in run order.
    pub fn for_root(&self, root: CaseRoot) -> impl Iterator<Item = &TestCaseResult> {
        self.test_case_results
            .iter()
            .filter(move |r| r.case.root == root)
    }
}

/// Reports test results based on the configured output format.
pub fn report_results(results: &RunResults, options: &TestOptions) -> Result<()> {
    match options.format {
        OutputFormat::Pretty => {
            report_results_pretty(results, std::io::stderr(), options)?;
            write_summary(results, std::io::stderr())
        }
        OutputFormat::Junit => report_results_junit(results, std::io::stdout(), options),
        OutputFormat::Terse => write_summary(results, std::io::stderr()),
    }
}

fn report_results_pretty<W: Write>(
    results: &RunResults,
    mut writer: W,
    options: &TestOptions,
) -> Result<()> {
    for root in CaseRoot::ALL {
        if options.verbose {
            writeln!(
                writer,
                "=================== {}: [{}] ===================",
                "Running case root".blue(),
                root.to_string().italic(),
            )?;
        }

        for result in results.for_root(root) {
            result.write_details(&mut writer, options)?;
        }
    }

    Ok(())
}

fn write_summary<W: Write>(results: &RunResults, mut writer: W) -> Result<()> {
    let fail_count = results.fail_count();
    let skip_count = results.skip_count();

    let formatted_fail_count = if fail_count > 0 {
        fail_count.to_string().red()
    } else {
        fail_count.to_string().green()
    };

    let formatted_skip_count = if skip_count > 0 {
        skip_count.to_string().cyan()
    } else {
        skip_count.to_string().green()
    };

    writeln!(
        writer,
        "================================================================================"
    )?;
    writeln!(
        writer,
        "{} test case(s) ran: {} succeeded, {} failed, {} skipped.",
        results.attempted_count(),
        results.success_count().to_string().green(),
        formatted_fail_count,
        formatted_skip_count,
    )?;
    writeln!(writer, "total compiler time: {:?}", results.total_duration())?;
    writeln!(
        writer,
        "================================================================================"
    )?;

    Ok(())
}

fn report_results_junit<W: Write>(
    results: &RunResults,
    mut writer: W,
    options: &TestOptions,
) -> Result<()> {
    let mut report = junit_report::Report::new();

    for root in CaseRoot::ALL {
        let mut suite = junit_report::TestSuite::new(root.dir_name());

        for r in results.for_root(root) {
            let name = r.case.name.as_str();
            let duration = junit_duration(r.duration())?;

            let mut test_case = match r.verdict {
                None => junit_report::TestCase::skipped(name),
                Some(Verdict::Pass) => junit_report::TestCase::success(name, duration),
                Some(Verdict::Fail) => junit_report::TestCase::failure(
                    name,
                    duration,
                    "exit status mismatch",
                    "failed",
                ),
            };

            let mut output_buf: Vec<u8> = vec![];
            r.write_details(&mut output_buf, options)?;

            let output_as_string = String::from_utf8_lossy(&output_buf);
            test_case.set_system_out(strip_ansi_escapes::strip_str(output_as_string).as_str());

            suite.add_testcase(test_case);
        }

        report.add_testsuite(suite);
    }

    report
        .write_xml(&mut writer)
        .map_err(|e| Error::Report(e.to_string()))?;
    writeln!(writer)?;

    Ok(())
}

fn junit_duration(duration: std::time::Duration) -> Result<junit_report::Duration> {
    junit_report::Duration::try_from(duration).map_err(|e| Error::Report(e.to_string()))
}

#[cfg(all(test, unix))]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use std::os::unix::process::ExitStatusExt;
    use std::path::PathBuf;
    use std::process::ExitStatus;

    fn result(root: CaseRoot, name: &str, code: i32) -> TestCaseResult {
        let case = TestCase::new(root, PathBuf::from(format!("/t/{root}/{name}")));
        let invocation = Invocation {
            program: PathBuf::from("adept"),
            args: vec![case.path.join("main.adept").into_os_string()],
        };
        let run = RunResult {
            exit_status: ExitStatus::from_raw(code << 8),
            stdout: String::new(),
            stderr: String::from("error: expected ';'\n"),
            duration: std::time::Duration::from_millis(5),
        };
        let verdict = classify(case.expectation(), run.exit_status);
        TestCaseResult::ran(case, invocation, run, verdict)
    }

    fn sample() -> RunResults {
        let mut results = RunResults::new();
        results.record(result(CaseRoot::Success, "a", 0));
        results.record(result(CaseRoot::Success, "b", 1));
        results.record(TestCaseResult::skipped(TestCase::new(
            CaseRoot::Success,
            PathBuf::from("/t/success/c"),
        )));
        results.record(result(CaseRoot::Error, "d", 1));
        results
    }

    #[test]
    fn aggregate_counts() {
        let results = sample();

        assert_eq!(results.attempted_count(), 3);
        assert_eq!(results.success_count(), 2);
        assert_eq!(results.fail_count(), 1);
        assert_eq!(results.skip_count(), 1);
        assert_eq!(results.exit_code(), 1);
        assert_eq!(results.for_root(CaseRoot::Error).count(), 1);
    }

    #[test]
    fn empty_run_succeeds() {
        let results = RunResults::new();
        assert!(results.all_passed());
        assert_eq!(results.exit_code(), 0);
    }

    #[test]
    fn failure_details_include_command_and_output() -> anyhow::Result<()> {
        colored::control::set_override(false);

        let failing = result(CaseRoot::Success, "b", 1);
        let mut buf = vec![];
        failing.write_details(&mut buf, &TestOptions::for_compiler("adept"))?;
        let text = String::from_utf8(buf)?;

        assert!(text.contains("[success::b]"));
        assert!(text.contains("expected zero exit"));
        assert!(text.contains("exited with 1"));
        assert!(text.contains("command: adept /t/success/b/main.adept"));
        assert!(text.contains("error: expected ';'"));
        assert!(text.contains("FAILED."));

        Ok(())
    }

    #[test]
    fn passing_case_reports_ok_line() -> anyhow::Result<()> {
        colored::control::set_override(false);

        let passing = result(CaseRoot::Error, "d", 2);

        let mut quiet = vec![];
        passing.write_details(&mut quiet, &TestOptions::for_compiler("adept"))?;
        let quiet = String::from_utf8(quiet)?;
        assert!(quiet.contains("[error::d]"));
        assert!(quiet.contains("ok."));
        assert!(!quiet.contains("command:"));

        let mut options = TestOptions::for_compiler("adept");
        options.verbose = true;
        let mut loud = vec![];
        passing.write_details(&mut loud, &options)?;
        assert!(String::from_utf8(loud)?.contains("command: adept"));

        Ok(())
    }

    #[test]
    fn junit_report_has_suite_per_root() -> anyhow::Result<()> {
        let mut buf = vec![];
        report_results_junit(&sample(), &mut buf, &TestOptions::for_compiler("adept"))?;
        let xml = String::from_utf8(buf)?;

        assert!(xml.contains(r#"name="success""#));
        assert!(xml.contains(r#"name="error""#));
        assert!(xml.contains("exit status mismatch"));
        assert!(!xml.contains('\u{1b}'));

        Ok(())
    }

    #[test]
    fn summary_line_counts() -> anyhow::Result<()> {
        colored::control::set_override(false);

        let mut buf = vec![];
        write_summary(&sample(), &mut buf)?;
        let text = String::from_utf8(buf)?;

        assert!(text.contains("3 test case(s) ran: 2 succeeded, 1 failed, 1 skipped."));

        Ok(())
    }
}
