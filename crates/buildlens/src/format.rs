// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Result rendering
//!
//! Turns a [`BuildResult`] into short plain text for a person or an AI agent
//! reading a terminal. The phrasing is stable: callers match on fragments such
//! as `Build succeeded`, `2 errors` and `dependencies hidden`.
//!
//! # Example
//!
//! ```no_run
//! use buildlens::format::format_build_result;
//! use buildlens_parser::parse_build_output;
//! use std::path::Path;
//!
//! let result = parse_build_output("a.swift:1:1: error: expected expression", None);
//! let text = format_build_result(&result, Some(Path::new("/Users/dev/App")));
//! assert!(text.starts_with("Build failed"));
//! ```

use std::path::Path;

use buildlens_parser::model::{
    BuildResult, CodeCoverage, Diagnostic, ExecutableInfo, FailedTest, LinkerError, SlowTest,
    format_seconds,
};

/// Render a build result
///
/// With `project_root`, warnings from files outside the root are hidden on a
/// failed build (and counted in a trailing note), and no warnings are itemized
/// on a successful one. Without it, every warning is itemized.
#[must_use]
pub fn format_build_result(result: &BuildResult, project_root: Option<&Path>) -> String {
    let summary = result.summary();
    let mut lines = Vec::new();

    let outcome = if result.status().is_success() {
        "Build succeeded"
    } else {
        "Build failed"
    };
    lines.push(header(
        outcome,
        summary.build_time.as_deref(),
        summary.test_time.as_deref(),
    ));

    let mut counts = vec![
        plural(summary.errors, "error", "errors"),
        plural(summary.warnings, "warning", "warnings"),
    ];
    if summary.linker_errors > 0 {
        counts.push(plural(
            summary.linker_errors,
            "linker error",
            "linker errors",
        ));
    }
    if summary.failed_tests > 0 {
        counts.push(plural(summary.failed_tests, "failed test", "failed tests"));
    }
    lines.push(counts.join(", "));

    push_diagnostics(&mut lines, "Errors:", result.errors().iter());

    let (shown, hidden) = visible_warnings(result, project_root);
    let any_shown = !shown.is_empty();
    push_diagnostics(&mut lines, "Warnings:", shown.into_iter());
    if hidden > 0 {
        if !any_shown {
            lines.push(String::new());
            lines.push("Warnings:".to_string());
        }
        lines.push(format!(
            "  (+{} from dependencies hidden)",
            plural(hidden, "warning", "warnings")
        ));
    }

    push_linker_errors(&mut lines, result.linker_errors());
    push_failed_tests(&mut lines, result.failed_tests());
    push_executables(&mut lines, result.executables());

    lines.join("\n")
}

/// Render a test result
///
/// Compile and link failures that kept tests from running are listed first,
/// followed by failed, flaky and slow tests and the attached coverage.
#[must_use]
pub fn format_test_result(result: &BuildResult) -> String {
    let summary = result.summary();
    let mut lines = Vec::new();

    let outcome = if result.status().is_success() {
        "Tests passed"
    } else {
        "Tests failed"
    };
    lines.push(header(
        outcome,
        summary.build_time.as_deref(),
        summary.test_time.as_deref(),
    ));

    if summary.passed_tests.is_none() && summary.failed_tests == 0 {
        lines.push("No test results found".to_string());
    } else {
        let mut counts = vec![
            format!("{} passed", summary.passed_tests.unwrap_or(0)),
            format!("{} failed", summary.failed_tests),
        ];
        if let Some(skipped) = summary.skipped_tests.filter(|&n| n > 0) {
            counts.push(format!("{skipped} skipped"));
        }
        if !result.flaky_tests().is_empty() {
            counts.push(format!("{} flaky", result.flaky_tests().len()));
        }
        lines.push(counts.join(", "));
    }

    push_diagnostics(&mut lines, "Errors:", result.errors().iter());
    push_linker_errors(&mut lines, result.linker_errors());
    push_failed_tests(&mut lines, result.failed_tests());

    if !result.flaky_tests().is_empty() {
        lines.push(String::new());
        lines.push("Flaky tests:".to_string());
        lines.extend(result.flaky_tests().iter().map(|name| format!("  {name}")));
    }

    push_slow_tests(&mut lines, result.slow_tests());

    if let Some(coverage) = result.coverage() {
        lines.push(String::new());
        lines.push(format_coverage(coverage));
    }

    lines.join("\n")
}

/// Render the coverage line, e.g. `Coverage: 62.4% (212/340 lines)`
#[must_use]
pub fn format_coverage(coverage: &CodeCoverage) -> String {
    format!(
        "Coverage: {:.1}% ({}/{} lines)",
        coverage.line_coverage,
        coverage.covered_lines(),
        coverage.executable_lines()
    )
}

/// Render a diagnostic as `file:line:col: message`, dropping unknown parts
#[must_use]
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let location = match (&diagnostic.file, diagnostic.line, diagnostic.column) {
        (Some(file), Some(line), Some(column)) => format!("{file}:{line}:{column}: "),
        (Some(file), Some(line), None) => format!("{file}:{line}: "),
        (Some(file), None, _) => format!("{file}: "),
        (None, _, _) => String::new(),
    };
    indent_continuation(&format!("{location}{}", diagnostic.message))
}

/// Split warnings into those to itemize and the number hidden
fn visible_warnings<'a>(
    result: &'a BuildResult,
    project_root: Option<&Path>,
) -> (Vec<&'a Diagnostic>, usize) {
    let Some(root) = project_root else {
        return (result.warnings().iter().collect(), 0);
    };
    if result.status().is_success() {
        return (Vec::new(), 0);
    }

    let (shown, hidden): (Vec<&Diagnostic>, Vec<&Diagnostic>) =
        result.warnings().iter().partition(|w| match &w.file {
            Some(file) => Path::new(file).starts_with(root),
            None => true,
        });
    (shown, hidden.len())
}

fn header(outcome: &str, build_time: Option<&str>, test_time: Option<&str>) -> String {
    let mut timings = Vec::new();
    if let Some(t) = build_time {
        timings.push(format!("build time: {t}"));
    }
    if let Some(t) = test_time {
        timings.push(format!("test time: {t}"));
    }
    if timings.is_empty() {
        outcome.to_string()
    } else {
        format!("{outcome} ({})", timings.join(", "))
    }
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn push_diagnostics<'a>(
    lines: &mut Vec<String>,
    title: &str,
    diagnostics: impl Iterator<Item = &'a Diagnostic>,
) {
    let mut diagnostics = diagnostics.peekable();
    if diagnostics.peek().is_none() {
        return;
    }
    lines.push(String::new());
    lines.push(title.to_string());
    lines.extend(diagnostics.map(|d| format!("  {}", format_diagnostic(d))));
}

fn push_linker_errors(lines: &mut Vec<String>, errors: &[LinkerError]) {
    if errors.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("Linker errors:".to_string());
    for error in errors {
        let mut line = match (&error.symbol, &error.message) {
            (Some(symbol), _) => format!("  Undefined symbol {symbol}"),
            (None, Some(message)) => format!("  {message}"),
            (None, None) => "  Unknown linker error".to_string(),
        };
        if let Some(arch) = &error.architecture {
            line.push_str(&format!(" for architecture {arch}"));
        }
        if let Some(origin) = &error.referenced_from {
            line.push_str(&format!(", referenced from {origin}"));
        }
        lines.push(line);
    }
}

fn push_failed_tests(lines: &mut Vec<String>, failed: &[FailedTest]) {
    if failed.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("Failed tests:".to_string());
    for test in failed {
        let location = match (&test.file, test.line) {
            (Some(file), Some(line)) => format!(" ({file}:{line})"),
            (Some(file), None) => format!(" ({file})"),
            _ => String::new(),
        };
        lines.push(indent_continuation(&format!(
            "  {}{location}: {}",
            test.test, test.message
        )));
    }
}

fn push_slow_tests(lines: &mut Vec<String>, slow: &[SlowTest]) {
    if slow.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("Slow tests:".to_string());
    lines.extend(
        slow.iter()
            .map(|t| format!("  {} ({})", t.test, format_seconds(t.duration))),
    );
}

fn push_executables(lines: &mut Vec<String>, executables: &[ExecutableInfo]) {
    if executables.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("Executables:".to_string());
    lines.extend(
        executables
            .iter()
            .map(|e| format!("  {} [{}] {}", e.name, e.target, e.path)),
    );
}

/// Indent every line after the first so multi-line messages stay under their item
fn indent_continuation(text: &str) -> String {
    text.replace('\n', "\n    ")
}
