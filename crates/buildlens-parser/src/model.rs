// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Build result types
//!
//! These are the structures shared by the parser, the coverage normalizer and
//! the formatter. A [`BuildResult`] is assembled once at the end of a parse and
//! is read-only afterwards; its [`BuildSummary`] is always recomputed from the
//! collected entries.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

/// Overall outcome of a build or test run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    /// No errors, linker errors, failed or flaky tests were observed
    Success,
    /// At least one piece of failure evidence was observed
    Failed,
}

impl BuildStatus {
    /// Check if this is a successful status
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// A compiler diagnostic with an optional source location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Source file path, as printed by the compiler
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Diagnostic text
    pub message: String,
}

/// A compile error
pub type BuildError = Diagnostic;

/// A compile warning
pub type BuildWarning = Diagnostic;

impl Diagnostic {
    /// Create a diagnostic without location information
    #[must_use]
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            file: None,
            line: None,
            column: None,
            message: message.into(),
        }
    }

    /// Two diagnostics are the same report when file, line and message match.
    /// The column is deliberately not part of the key.
    #[must_use]
    pub fn is_duplicate_of(&self, other: &Self) -> bool {
        self.file == other.file && self.line == other.line && self.message == other.message
    }
}

/// A test that failed during the run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedTest {
    /// Qualified test identifier (`Suite.testName`, `testName()` or a display name)
    pub test: String,
    /// Failure reason
    pub message: String,
    /// File the failure was recorded in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Line the failure was recorded at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// A passing test that took at least the slow threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlowTest {
    /// Qualified test identifier
    pub test: String,
    /// Duration in seconds
    pub duration: f64,
}

/// A link-stage failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkerError {
    /// Undefined symbol, mangled as printed by the linker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Architecture the link was performed for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    /// Object or module that referenced the symbol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_from: Option<String>,
    /// Free-form message when no symbol applies (missing framework or library)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LinkerError {
    /// Create an undefined-symbol linker error
    #[must_use]
    pub fn undefined_symbol(
        symbol: impl Into<String>,
        architecture: impl Into<String>,
        referenced_from: Option<String>,
    ) -> Self {
        Self {
            symbol: Some(symbol.into()),
            architecture: Some(architecture.into()),
            referenced_from,
            message: None,
        }
    }

    /// Create a message-only linker error
    #[must_use]
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            symbol: None,
            architecture: None,
            referenced_from: None,
            message: Some(message.into()),
        }
    }
}

/// An artifact registered by the toolchain at the end of a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableInfo {
    /// Full artifact path
    pub path: String,
    /// Last path component of `path`
    pub name: String,
    /// Owning build target
    pub target: String,
}

impl ExecutableInfo {
    /// Create executable info, deriving the name from the path
    #[must_use]
    pub fn new(path: impl Into<String>, target: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: last_path_component(&path),
            path,
            target: target.into(),
        }
    }
}

/// Line coverage for a single source file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCoverage {
    /// Source file path
    pub path: String,
    /// Last path component of `path`
    pub name: String,
    /// Percentage of executable lines covered (0-100)
    pub line_coverage: f64,
    /// Number of covered lines
    pub covered_lines: u64,
    /// Number of executable lines
    pub executable_lines: u64,
}

impl FileCoverage {
    /// Create file coverage from line counts
    #[must_use]
    pub fn new(path: impl Into<String>, covered_lines: u64, executable_lines: u64) -> Self {
        let path = path.into();
        Self {
            name: last_path_component(&path),
            path,
            line_coverage: percent(covered_lines, executable_lines),
            covered_lines,
            executable_lines,
        }
    }
}

/// Line coverage for a set of files
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeCoverage {
    /// Overall percentage, weighted by executable lines (0-100)
    pub line_coverage: f64,
    /// Per-file coverage
    pub files: Vec<FileCoverage>,
}

impl CodeCoverage {
    /// Aggregate per-file coverage into one weighted total
    ///
    /// The overall percentage is `covered / executable` over the summed line
    /// counts, never the mean of the per-file percentages.
    #[must_use]
    pub fn from_files(files: Vec<FileCoverage>) -> Self {
        let covered: u64 = files.iter().map(|f| f.covered_lines).sum();
        let executable: u64 = files.iter().map(|f| f.executable_lines).sum();
        Self {
            line_coverage: percent(covered, executable),
            files,
        }
    }

    /// Total covered lines across all files
    #[must_use]
    pub fn covered_lines(&self) -> u64 {
        self.files.iter().map(|f| f.covered_lines).sum()
    }

    /// Total executable lines across all files
    #[must_use]
    pub fn executable_lines(&self) -> u64 {
        self.files.iter().map(|f| f.executable_lines).sum()
    }
}

/// Counts derived from a [`BuildResult`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    /// Number of compile errors
    pub errors: usize,
    /// Number of compile warnings
    pub warnings: usize,
    /// Number of failed tests
    pub failed_tests: usize,
    /// Number of linker errors
    pub linker_errors: usize,
    /// Number of passed tests, absent when no test framework reported anything
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed_tests: Option<usize>,
    /// Number of skipped tests, absent when no test framework reported anything
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_tests: Option<usize>,
    /// Build duration as printed, e.g. `12.3s`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_time: Option<String>,
    /// Accumulated test duration, e.g. `2.894s`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_time: Option<String>,
    /// Overall coverage percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_percent: Option<f64>,
}

/// Everything collected from one parse of build/test output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    status: BuildStatus,
    summary: BuildSummary,
    errors: Vec<BuildError>,
    warnings: Vec<BuildWarning>,
    failed_tests: Vec<FailedTest>,
    linker_errors: Vec<LinkerError>,
    slow_tests: Vec<SlowTest>,
    flaky_tests: BTreeSet<String>,
    executables: Vec<ExecutableInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coverage: Option<CodeCoverage>,
}

/// The collected entries a [`BuildResult`] is assembled from
#[derive(Debug, Clone, Default)]
pub(crate) struct ResultParts {
    pub errors: Vec<BuildError>,
    pub warnings: Vec<BuildWarning>,
    pub failed_tests: Vec<FailedTest>,
    pub linker_errors: Vec<LinkerError>,
    pub slow_tests: Vec<SlowTest>,
    pub flaky_tests: BTreeSet<String>,
    pub executables: Vec<ExecutableInfo>,
    pub passed_tests: Option<usize>,
    pub skipped_tests: Option<usize>,
    pub build_time: Option<String>,
    pub test_time: Option<String>,
}

impl BuildResult {
    /// Assemble a result, resolving status from the evidence alone
    pub(crate) fn from_parts(parts: ResultParts) -> Self {
        let failed = !parts.errors.is_empty()
            || !parts.linker_errors.is_empty()
            || !parts.failed_tests.is_empty()
            || !parts.flaky_tests.is_empty();
        let status = if failed {
            BuildStatus::Failed
        } else {
            BuildStatus::Success
        };

        let summary = BuildSummary {
            errors: parts.errors.len(),
            warnings: parts.warnings.len(),
            failed_tests: parts.failed_tests.len(),
            linker_errors: parts.linker_errors.len(),
            passed_tests: parts.passed_tests,
            skipped_tests: parts.skipped_tests,
            build_time: parts.build_time,
            test_time: parts.test_time,
            coverage_percent: None,
        };

        Self {
            status,
            summary,
            errors: parts.errors,
            warnings: parts.warnings,
            failed_tests: parts.failed_tests,
            linker_errors: parts.linker_errors,
            slow_tests: parts.slow_tests,
            flaky_tests: parts.flaky_tests,
            executables: parts.executables,
            coverage: None,
        }
    }

    /// Create an empty successful result
    #[must_use]
    pub fn empty() -> Self {
        Self::from_parts(ResultParts::default())
    }

    /// Attach coverage, updating the summary's coverage percentage
    #[must_use]
    pub fn with_coverage(mut self, coverage: Option<CodeCoverage>) -> Self {
        self.summary.coverage_percent = coverage.as_ref().map(|c| c.line_coverage);
        self.coverage = coverage;
        self
    }

    /// Overall status
    #[must_use]
    pub fn status(&self) -> BuildStatus {
        self.status
    }

    /// Derived counts and timings
    #[must_use]
    pub fn summary(&self) -> &BuildSummary {
        &self.summary
    }

    /// Compile errors in first-seen order
    #[must_use]
    pub fn errors(&self) -> &[BuildError] {
        &self.errors
    }

    /// Compile warnings in first-seen order
    #[must_use]
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    /// Failed tests in first-seen order
    #[must_use]
    pub fn failed_tests(&self) -> &[FailedTest] {
        &self.failed_tests
    }

    /// Linker errors in first-seen order
    #[must_use]
    pub fn linker_errors(&self) -> &[LinkerError] {
        &self.linker_errors
    }

    /// Passing tests at or above the slow threshold
    #[must_use]
    pub fn slow_tests(&self) -> &[SlowTest] {
        &self.slow_tests
    }

    /// Tests observed both passing and failing
    #[must_use]
    pub fn flaky_tests(&self) -> &BTreeSet<String> {
        &self.flaky_tests
    }

    /// Registered build artifacts
    #[must_use]
    pub fn executables(&self) -> &[ExecutableInfo] {
        &self.executables
    }

    /// Attached coverage, if any
    #[must_use]
    pub fn coverage(&self) -> Option<&CodeCoverage> {
        self.coverage.as_ref()
    }

    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, crate::ParseError> {
        serde_json::to_string_pretty(self).map_err(crate::ParseError::from)
    }
}

impl Default for BuildResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// Last component of a path, or the path itself when it has none
#[must_use]
pub fn last_path_component(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Format a number of seconds as `<n>s`, rounded to milliseconds
///
/// Trailing zeros are trimmed: `2.894` -> `2.894s`, `1.5` -> `1.5s`, `3.0` -> `3s`.
#[must_use]
pub fn format_seconds(seconds: f64) -> String {
    let rounded = format!("{seconds:.3}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}s")
}

fn percent(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_empty_result_is_success() {
        let result = BuildResult::empty();
        assert!(result.status().is_success());
        assert_eq!(result.summary().errors, 0);
        assert_eq!(result.summary().passed_tests, None);
        assert!(result.errors().is_empty());
        assert!(result.coverage().is_none());
    }

    #[test]
    fn test_status_resolves_from_evidence() {
        let parts = ResultParts {
            linker_errors: vec![LinkerError::message_only("framework not found Foo")],
            ..Default::default()
        };
        let result = BuildResult::from_parts(parts);
        assert_eq!(result.status(), BuildStatus::Failed);
        assert_eq!(result.summary().linker_errors, 1);

        let mut flaky = BTreeSet::new();
        flaky.insert("Suite.testFlaky".to_string());
        let result = BuildResult::from_parts(ResultParts {
            flaky_tests: flaky,
            ..Default::default()
        });
        assert_eq!(result.status(), BuildStatus::Failed);
    }

    #[test]
    fn test_warnings_alone_do_not_fail() {
        let result = BuildResult::from_parts(ResultParts {
            warnings: vec![Diagnostic::message_only("deprecated")],
            ..Default::default()
        });
        assert!(result.status().is_success());
        assert_eq!(result.summary().warnings, 1);
    }

    #[test]
    fn test_diagnostic_duplicate_ignores_column() {
        let a = Diagnostic {
            file: Some("a.swift".to_string()),
            line: Some(3),
            column: Some(1),
            message: "oops".to_string(),
        };
        let b = Diagnostic {
            column: Some(9),
            ..a.clone()
        };
        let c = Diagnostic {
            line: Some(4),
            ..a.clone()
        };
        assert!(a.is_duplicate_of(&b));
        assert!(!a.is_duplicate_of(&c));
    }

    #[test]
    fn test_coverage_is_weighted() {
        let coverage = CodeCoverage::from_files(vec![
            FileCoverage::new("Sources/A.swift", 50, 100),
            FileCoverage::new("Sources/B.swift", 40, 50),
        ]);
        assert!((coverage.line_coverage - 60.0).abs() < 1e-9);
        assert_eq!(coverage.covered_lines(), 90);
        assert_eq!(coverage.executable_lines(), 150);
        assert_eq!(coverage.files[1].name, "B.swift");
        assert!((coverage.files[1].line_coverage - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_with_no_executable_lines() {
        let coverage = CodeCoverage::from_files(vec![FileCoverage::new("Empty.swift", 0, 0)]);
        assert_eq!(coverage.line_coverage, 0.0);
    }

    #[test]
    fn test_with_coverage_updates_summary() {
        let coverage = CodeCoverage::from_files(vec![FileCoverage::new("A.swift", 3, 4)]);
        let result = BuildResult::empty().with_coverage(Some(coverage));
        assert_eq!(result.summary().coverage_percent, Some(75.0));
        assert!(result.coverage().is_some());

        let cleared = result.with_coverage(None);
        assert_eq!(cleared.summary().coverage_percent, None);
    }

    #[test]
    fn test_executable_name_from_path() {
        let exe = ExecutableInfo::new("/Build/Products/Debug/MyApp.app", "MyApp");
        assert_eq!(exe.name, "MyApp.app");
        assert_eq!(exe.target, "MyApp");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(2.728 + 0.166), "2.894s");
        assert_eq!(format_seconds(1.5), "1.5s");
        assert_eq!(format_seconds(3.0), "3s");
        assert_eq!(format_seconds(0.0), "0s");
    }

    #[test]
    fn test_json_uses_camel_case() {
        let result = BuildResult::from_parts(ResultParts {
            failed_tests: vec![FailedTest {
                test: "Suite.testA".to_string(),
                message: "boom".to_string(),
                file: None,
                line: None,
                duration: Some(0.5),
            }],
            ..Default::default()
        });
        let json = result.to_json().expect("Should serialize");
        assert!(json.contains("\"failedTests\""));
        assert!(json.contains("\"status\": \"failed\""));
        assert!(!json.contains("\"coverage\""));
    }
}
