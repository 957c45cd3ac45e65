//! Classification of compiler exit statuses.

use crate::testcase::Expectation;
use std::process::ExitStatus;

/// Pass/fail decision for one case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The observed status satisfied the expectation.
    Pass,
    /// The observed status contradicted the expectation.
    Fail,
}

impl Verdict {
    /// Returns whether this verdict is a pass.
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Decides whether `exit_status` satisfies `expectation`.
///
/// Every non-zero status is alike here, including termination by a signal:
/// an error case passes whenever the compiler did not exit cleanly.
pub fn classify(expectation: Expectation, exit_status: ExitStatus) -> Verdict {
    let accepted = exit_status.success();

    let pass = match expectation {
        Expectation::ZeroExit => accepted,
        Expectation::NonZeroExit => !accepted,
    };

    if pass { Verdict::Pass } else { Verdict::Fail }
}
