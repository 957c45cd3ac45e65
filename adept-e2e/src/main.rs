//! Runs the end-to-end suite against a compiler executable.

use adept_e2e::{RunnerConfig, TestOptions, TestRunner};
use anyhow::{Context, Result};
use clap::Parser;

/// Exit code for failures of the harness itself.
const HARNESS_ERROR_EXIT_CODE: i32 = 2;

async fn run_e2e_tests(options: &TestOptions) -> Result<i32> {
    let config = RunnerConfig::from_options(options);
    let runner = TestRunner::new(config, options.clone());

    if options.list_tests_only {
        for name in runner.list().context("listing test cases")? {
            println!("{name}: test");
        }
        return Ok(0);
    }

    let results = runner.run().await.context("running test cases")?;
    adept_e2e::report_results(&results, options)?;

    Ok(results.exit_code())
}

fn main() {
    let options = TestOptions::parse();

    adept_e2e::logging::init(&options);

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime")
        .and_then(|runtime| runtime.block_on(run_e2e_tests(&options)));

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("error: {e:#}");
            HARNESS_ERROR_EXIT_CODE
        }
    };

    std::process::exit(exit_code);
}
