// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Parse-then-format helpers for callers holding raw output text

use std::path::{Path, PathBuf};

use buildlens_coverage::parse_coverage_from_path;
use buildlens_parser::{BuildResult, DEFAULT_SLOW_THRESHOLD_SECS, parse_build_output};
use tracing::debug;

use crate::format::{format_build_result, format_test_result};

/// Options for a single analysis
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Root used by the warning provenance filter
    pub project_root: Option<PathBuf>,
    /// Slow test threshold in seconds
    pub slow_threshold: f64,
    /// Coverage report to attach
    pub coverage_path: Option<PathBuf>,
    /// Coverage target filter
    pub coverage_target: Option<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            project_root: None,
            slow_threshold: DEFAULT_SLOW_THRESHOLD_SECS,
            coverage_path: None,
            coverage_target: None,
        }
    }
}

/// Parse output and attach coverage when a report path is configured
///
/// A coverage report that cannot be used leaves the result without coverage.
#[must_use]
pub fn analyze(text: &str, options: &ExtractOptions) -> BuildResult {
    let result = parse_build_output(text, Some(options.slow_threshold));
    let Some(path) = options.coverage_path.as_deref() else {
        return result;
    };

    let coverage = parse_coverage_from_path(path, options.coverage_target.as_deref());
    debug!(
        path = %path.display(),
        attached = coverage.is_some(),
        "coverage lookup finished"
    );
    result.with_coverage(coverage)
}

/// Parse build output and render the build summary
#[must_use]
pub fn extract_build_errors(text: &str, project_root: Option<&Path>) -> String {
    format_build_result(&parse_build_output(text, None), project_root)
}

/// Parse test output and render the test summary
#[must_use]
pub fn extract_test_results(text: &str) -> String {
    format_test_result(&parse_build_output(text, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_analyze_without_coverage() {
        let result = analyze(
            "Test Case '-[Suite testA]' passed (0.001 seconds).",
            &ExtractOptions::default(),
        );
        assert!(result.coverage().is_none());
        assert!(result.status().is_success());
    }

    #[test]
    fn test_analyze_attaches_coverage() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        write!(
            file,
            r#"{{"data":[{{"files":[{{"filename":"/p/A.swift","summary":{{"lines":{{"covered":3,"count":4}}}}}}]}}]}}"#
        )
        .expect("write coverage");

        let options = ExtractOptions {
            coverage_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let result = analyze("", &options);
        assert_eq!(result.summary().coverage_percent, Some(75.0));
    }

    #[test]
    fn test_analyze_missing_coverage_file_is_ignored() {
        let options = ExtractOptions {
            coverage_path: Some(PathBuf::from("/nonexistent/coverage-12345.json")),
            ..Default::default()
        };
        let result = analyze("", &options);
        assert!(result.coverage().is_none());
        assert_eq!(result.summary().coverage_percent, None);
    }

    #[test]
    fn test_slow_threshold_is_applied() {
        let text = "Test Case '-[Suite testA]' passed (0.200 seconds).";
        let options = ExtractOptions {
            slow_threshold: 0.1,
            ..Default::default()
        };
        assert_eq!(analyze(text, &options).slow_tests().len(), 1);
        assert!(analyze(text, &ExtractOptions::default()).slow_tests().is_empty());
    }

    #[test]
    fn test_extract_build_errors_scenario() {
        let text = "main.swift:15:5: error: use of undeclared identifier 'unknown'\nunknown = 5\n^";
        let rendered = extract_build_errors(text, None);
        assert!(rendered.starts_with("Build failed"));
        assert!(rendered.contains("1 error,"));
        assert!(rendered.contains("main.swift:15:5: use of undeclared identifier 'unknown'"));
    }

    #[test]
    fn test_extract_test_results() {
        let rendered = extract_test_results(
            "Test Case '-[Suite testA]' failed (0.010 seconds).\nTest Case '-[Suite testB]' passed (0.010 seconds).",
        );
        assert!(rendered.starts_with("Tests failed"));
        assert!(rendered.contains("Suite.testA"));
    }
}
