//! Test case definitions and discovery.

use crate::error::{Error, Result};
use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

/// File whose presence marks a case directory as a module.
pub const MODULE_MARKER_FILE_NAME: &str = "_.adept";

/// Entry-point source file compiled for single-file cases.
pub const ENTRY_POINT_FILE_NAME: &str = "main.adept";

/// One of the two fixed case roots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CaseRoot {
    /// Cases the compiler is expected to accept.
    Success,
    /// Cases the compiler is expected to reject.
    Error,
}

impl CaseRoot {
    /// All roots, in the order they are run.
    pub const ALL: [Self; 2] = [Self::Success, Self::Error];

    /// Name of the root's directory under the tests directory.
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// The outcome expected of every case under this root.
    pub const fn expectation(self) -> Expectation {
        match self {
            Self::Success => Expectation::ZeroExit,
            Self::Error => Expectation::NonZeroExit,
        }
    }
}

impl Display for CaseRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Expected outcome class of a compiler invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expectation {
    /// The compiler must exit with status 0.
    ZeroExit,
    /// The compiler must exit with any non-zero status.
    NonZeroExit,
}

impl Display for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroExit => write!(f, "zero exit"),
            Self::NonZeroExit => write!(f, "non-zero exit"),
        }
    }
}

/// How a case directory is handed to the compiler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaseKind {
    /// The directory itself is the compilation target.
    Module,
    /// The entry-point file inside the directory is the compilation target.
    SingleFile,
}

impl CaseKind {
    /// Determines the kind of the case rooted at `case_dir`.
    ///
    /// The marker file wins even when an entry-point file is also present.
    pub fn detect(case_dir: &Path) -> Self {
        if case_dir.join(MODULE_MARKER_FILE_NAME).exists() {
            Self::Module
        } else {
            Self::SingleFile
        }
    }
}

/// A single test case: one directory under a case root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    /// Directory name of the case; unique within its root.
    pub name: String,
    /// Root the case was discovered under.
    pub root: CaseRoot,
    /// Path to the case directory.
    pub path: PathBuf,
    /// Module or single-file.
    pub kind: CaseKind,
}

impl TestCase {
    /// Creates a test case for the given directory.
    pub fn new(root: CaseRoot, path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let kind = CaseKind::detect(&path);

        Self {
            name,
            root,
            path,
            kind,
        }
    }

    /// Returns the name used for filtering and reporting, e.g. `success::basic`.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.root, self.name)
    }

    /// Returns the outcome this case expects of the compiler.
    pub const fn expectation(&self) -> Expectation {
        self.root.expectation()
    }
}

/// Discovers the cases under one root of `tests_dir`.
///
/// Only immediate subdirectories are cases; files are ignored and nested
/// directories are not searched. Cases are sorted by directory name.
pub fn discover_cases(tests_dir: &Path, root: CaseRoot) -> Result<Vec<TestCase>> {
    let root_dir = tests_dir.join(root.dir_name());

    if root_dir.exists() && !root_dir.is_dir() {
        return Err(Error::CaseDiscovery {
            root: root_dir,
            source: std::io::Error::from(std::io::ErrorKind::NotADirectory),
        });
    }

    let walker = walkdir::WalkDir::new(&root_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut cases = vec![];
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_dangling_link(&e) => {
                let link = e.path().unwrap_or(root_dir.as_path());
                tracing::trace!("ignoring dangling link {}", link.display());
                continue;
            }
            Err(e) => {
                return Err(Error::CaseDiscovery {
                    root: root_dir,
                    source: e.into(),
                });
            }
        };

        if !entry.file_type().is_dir() {
            tracing::trace!("ignoring non-directory entry {}", entry.path().display());
            continue;
        }

        let case = TestCase::new(root, entry.into_path());
        tracing::debug!("discovered case {} ({:?})", case.qualified_name(), case.kind);
        cases.push(case);
    }

    Ok(cases)
}

/// A link under a root whose target is gone is a non-directory entry, not a
/// failure to list the root.
fn is_dangling_link(error: &walkdir::Error) -> bool {
    error.depth() > 0
        && error
            .io_error()
            .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
        && error.path().is_some_and(|p| {
            std::fs::symlink_metadata(p).is_ok_and(|m| m.file_type().is_symlink())
        })
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    fn case_names(cases: &[TestCase]) -> Vec<&str> {
        cases.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn discovers_sorted_subdirectories_only() -> anyhow::Result<()> {
        let temp = assert_fs::TempDir::new()?;
        temp.child("success/zeta/main.adept").touch()?;
        temp.child("success/alpha/main.adept").touch()?;
        temp.child("success/mid/_.adept").touch()?;
        temp.child("success/stray.adept").touch()?;
        temp.child("success/README").touch()?;

        let cases = discover_cases(temp.path(), CaseRoot::Success)?;
        assert_eq!(case_names(&cases), vec!["alpha", "mid", "zeta"]);

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_not_a_case() -> anyhow::Result<()> {
        let temp = assert_fs::TempDir::new()?;
        temp.child("success/basic/main.adept").touch()?;
        std::os::unix::fs::symlink(
            temp.path().join("nowhere"),
            temp.path().join("success/stray_link"),
        )?;

        let cases = discover_cases(temp.path(), CaseRoot::Success)?;
        assert_eq!(case_names(&cases), vec!["basic"]);

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_case_directory_is_a_case() -> anyhow::Result<()> {
        let temp = assert_fs::TempDir::new()?;
        temp.child("shared/main.adept").touch()?;
        temp.child("error").create_dir_all()?;
        std::os::unix::fs::symlink(temp.path().join("shared"), temp.path().join("error/linked"))?;

        let cases = discover_cases(temp.path(), CaseRoot::Error)?;
        assert_eq!(case_names(&cases), vec!["linked"]);

        Ok(())
    }

    #[test]
    fn discovery_does_not_recurse() -> anyhow::Result<()> {
        let temp = assert_fs::TempDir::new()?;
        temp.child("error/outer/inner/main.adept").touch()?;
        temp.child("error/outer/main.adept").touch()?;

        let cases = discover_cases(temp.path(), CaseRoot::Error)?;
        assert_eq!(case_names(&cases), vec!["outer"]);
        assert_eq!(cases[0].root, CaseRoot::Error);
        assert_eq!(cases[0].expectation(), Expectation::NonZeroExit);

        Ok(())
    }

    #[test]
    fn discovery_is_repeatable() -> anyhow::Result<()> {
        let temp = assert_fs::TempDir::new()?;
        for name in ["b", "a", "c_2", "c_10"] {
            temp.child(format!("success/{name}/main.adept")).touch()?;
        }

        let first = discover_cases(temp.path(), CaseRoot::Success)?;
        let second = discover_cases(temp.path(), CaseRoot::Success)?;
        assert_eq!(first, second);
        assert_eq!(case_names(&first), vec!["a", "b", "c_10", "c_2"]);

        Ok(())
    }

    #[test]
    fn missing_root_is_an_error() -> anyhow::Result<()> {
        let temp = assert_fs::TempDir::new()?;

        let result = discover_cases(temp.path(), CaseRoot::Success);
        assert!(matches!(result, Err(Error::CaseDiscovery { .. })));

        Ok(())
    }

    #[test]
    fn root_that_is_a_file_is_an_error() -> anyhow::Result<()> {
        let temp = assert_fs::TempDir::new()?;
        temp.child("error").touch()?;

        let result = discover_cases(temp.path(), CaseRoot::Error);
        assert!(matches!(result, Err(Error::CaseDiscovery { .. })));

        Ok(())
    }

    #[test]
    fn marker_file_wins_over_entry_point() -> anyhow::Result<()> {
        let temp = assert_fs::TempDir::new()?;
        temp.child("both/_.adept").touch()?;
        temp.child("both/main.adept").touch()?;
        temp.child("plain/main.adept").touch()?;
        temp.child("empty").create_dir_all()?;

        assert_eq!(CaseKind::detect(&temp.path().join("both")), CaseKind::Module);
        assert_eq!(
            CaseKind::detect(&temp.path().join("plain")),
            CaseKind::SingleFile
        );
        assert_eq!(
            CaseKind::detect(&temp.path().join("empty")),
            CaseKind::SingleFile
        );

        Ok(())
    }

    #[test]
    fn qualified_names_include_root() {
        let case = TestCase::new(CaseRoot::Success, PathBuf::from("/t/success/basic"));
        assert_eq!(case.qualified_name(), "success::basic");
        assert_eq!(case.expectation(), Expectation::ZeroExit);
    }
}
