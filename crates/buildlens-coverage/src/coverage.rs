// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Coverage report normalization
//!
//! Two report layouts are recognized:
//!
//! - `xccov view --report --json`: `{"targets":[{"name", "files":[{"path",
//!   "lineCoverage", "coveredLines", "executableLines"}]}]}`, where
//!   `lineCoverage` is a 0-1 fraction
//! - `llvm-cov export` (SwiftPM `--enable-code-coverage`): `{"data":[{"files":
//!   [{"filename", "summary":{"lines":{"covered","count"}}}]}]}`
//!
//! Both are reduced to a [`CodeCoverage`] whose overall percentage is weighted
//! by executable lines.

use std::collections::HashSet;
use std::path::Path;

use buildlens_parser::model::{CodeCoverage, FileCoverage};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::CoverageError;

/// Target name suffixes that denote a test bundle
const TEST_BUNDLE_SUFFIXES: &[&str] = &[".xctest", "Tests"];

/// Which report layout a coverage file used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageSchema {
    /// `targets[].files[]` (xccov)
    Targets,
    /// `data[].files[]` (llvm-cov export)
    Data,
}

// ============================================================================
// Report Types (xccov)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TargetsReport {
    targets: Vec<TargetEntry>,
}

#[derive(Debug, Deserialize)]
struct TargetEntry {
    name: String,
    #[serde(default)]
    files: Vec<TargetFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetFile {
    path: String,
    line_coverage: Option<f64>,
    covered_lines: u64,
    executable_lines: u64,
}

// ============================================================================
// Report Types (llvm-cov export)
// ============================================================================

#[derive(Debug, Deserialize)]
struct DataReport {
    data: Vec<DataEntry>,
}

#[derive(Debug, Deserialize)]
struct DataEntry {
    #[serde(default)]
    files: Vec<DataFile>,
}

#[derive(Debug, Deserialize)]
struct DataFile {
    filename: String,
    summary: DataSummary,
}

#[derive(Debug, Deserialize)]
struct DataSummary {
    lines: LineCounts,
}

#[derive(Debug, Deserialize)]
struct LineCounts {
    covered: u64,
    count: u64,
}

// ============================================================================
// Parsing Functions
// ============================================================================

/// Check whether a target name denotes a test bundle
///
/// Test bundles are excluded from filtered reports even when their name
/// contains the filter (`MyAppTests` for filter `MyApp`).
#[must_use]
pub fn is_test_bundle(target_name: &str) -> bool {
    TEST_BUNDLE_SUFFIXES
        .iter()
        .any(|suffix| target_name.ends_with(suffix))
}

/// Detect which report layout a JSON document uses
#[must_use]
pub fn detect_schema(document: &Value) -> Option<CoverageSchema> {
    if document.get("targets").is_some_and(Value::is_array) {
        Some(CoverageSchema::Targets)
    } else if document.get("data").is_some_and(Value::is_array) {
        Some(CoverageSchema::Data)
    } else {
        None
    }
}

/// Normalize a coverage report held in memory
///
/// # Errors
///
/// Returns `CoverageError::JsonParse` if the text is not valid JSON or a known
/// layout has the wrong field types, `CoverageError::UnrecognizedSchema` if
/// neither layout matches, and `CoverageError::NoFiles` if nothing remains
/// after filtering.
pub fn parse_coverage_json(
    json: &str,
    target_filter: Option<&str>,
) -> Result<CodeCoverage, CoverageError> {
    let document: Value = serde_json::from_str(json)?;
    let schema = detect_schema(&document).ok_or(CoverageError::UnrecognizedSchema)?;

    let files = match schema {
        CoverageSchema::Targets => {
            let report: TargetsReport = serde_json::from_value(document)?;
            files_from_targets(report, target_filter)
        }
        CoverageSchema::Data => {
            let report: DataReport = serde_json::from_value(document)?;
            files_from_data(report)
        }
    };

    if files.is_empty() {
        return Err(CoverageError::NoFiles {
            target_filter: target_filter.map(str::to_string),
        });
    }

    let coverage = CodeCoverage::from_files(files);
    debug!(
        ?schema,
        files = coverage.files.len(),
        line_coverage = coverage.line_coverage,
        "normalized coverage report"
    );
    Ok(coverage)
}

/// Read and normalize a coverage report from disk
///
/// # Errors
///
/// Returns `CoverageError::Io` if the file cannot be read, otherwise the errors
/// of [`parse_coverage_json`].
pub fn load_coverage(
    path: impl AsRef<Path>,
    target_filter: Option<&str>,
) -> Result<CodeCoverage, CoverageError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| CoverageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_coverage_json(&json, target_filter)
}

/// Read and normalize a coverage report, returning `None` on any failure
///
/// A missing file, malformed JSON, an unknown layout and an empty result are
/// all treated as "no coverage available".
#[must_use]
pub fn parse_coverage_from_path(
    path: impl AsRef<Path>,
    target_filter: Option<&str>,
) -> Option<CodeCoverage> {
    let path = path.as_ref();
    match load_coverage(path, target_filter) {
        Ok(coverage) => Some(coverage),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no coverage available");
            None
        }
    }
}

fn files_from_targets(report: TargetsReport, target_filter: Option<&str>) -> Vec<FileCoverage> {
    let mut seen = HashSet::new();
    report
        .targets
        .into_iter()
        .filter(|target| match target_filter {
            Some(filter) => target.name.contains(filter) && !is_test_bundle(&target.name),
            None => true,
        })
        .flat_map(|target| target.files)
        .filter(|file| seen.insert(file.path.clone()))
        .map(|file| {
            let computed = FileCoverage::new(file.path, file.covered_lines, file.executable_lines);
            match file.line_coverage {
                Some(fraction) if fraction.is_finite() => FileCoverage {
                    line_coverage: fraction * 100.0,
                    ..computed
                },
                _ => computed,
            }
        })
        .collect()
}

fn files_from_data(report: DataReport) -> Vec<FileCoverage> {
    let mut seen = HashSet::new();
    report
        .data
        .into_iter()
        .flat_map(|entry| entry.files)
        .filter(|file| seen.insert(file.filename.clone()))
        .map(|file| {
            FileCoverage::new(
                file.filename,
                file.summary.lines.covered,
                file.summary.lines.count,
            )
        })
        .collect()
}
