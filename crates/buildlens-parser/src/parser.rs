// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Build output parsing
//!
//! A single forward pass over xcodebuild / SwiftPM output. Each line is
//! classified by [`crate::matchers`] and folded into a [`ParseState`]; the
//! state carries only what multi-line constructs need (script-phase context,
//! the current undefined-symbols block, XCTest suite nesting and the running
//! test totals).
//!
//! # Example
//!
//! ```no_run
//! use buildlens_parser::parser::{parse_build_output, StreamingParser};
//!
//! // Parse complete output
//! let output = "main.swift:1:1: error: expected expression";
//! let result = parse_build_output(output, None);
//! assert_eq!(result.summary().errors, 1);
//!
//! // Or feed lines as they arrive
//! let mut parser = StreamingParser::new();
//! parser.process_line(output);
//! let result = parser.into_result();
//! ```

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use tracing::{debug, trace};

use crate::matchers::{
    BuildEvent, LineEvent, LinkerEvent, Severity, TestEvent, TestOutcome, classify_line,
    reference_origin,
};
use crate::model::{
    BuildResult, Diagnostic, ExecutableInfo, FailedTest, LinkerError, ResultParts, SlowTest,
    format_seconds,
};

/// Passing tests at or above this many seconds are reported as slow
pub const DEFAULT_SLOW_THRESHOLD_SECS: f64 = 1.0;

/// Number of preceding lines kept as context for a failed script phase
const PHASE_CONTEXT_LINES: usize = 3;

/// Message used for a failed test when no issue text was printed for it
const DEFAULT_FAILURE_MESSAGE: &str = "Test failed";

/// Parse complete build/test output
///
/// Never fails: input nothing recognizes produces a successful, empty result.
#[must_use]
pub fn parse_build_output(input: &str, slow_threshold: Option<f64>) -> BuildResult {
    let mut parser = StreamingParser::with_slow_threshold(
        slow_threshold.unwrap_or(DEFAULT_SLOW_THRESHOLD_SECS),
    );
    for line in input.lines() {
        parser.process_line(line);
    }
    parser.into_result()
}

// ============================================================================
// Parse state
// ============================================================================

#[derive(Debug, Default)]
struct TestRecord {
    seen_pass: bool,
    seen_fail: bool,
    last_outcome: Option<TestOutcome>,
}

#[derive(Debug)]
struct PendingIssue {
    file: Option<String>,
    line: Option<u32>,
    message: String,
}

/// Open `Undefined symbols for architecture <arch>` block
#[derive(Debug)]
struct SymbolBlock {
    architecture: String,
    /// Symbol whose origin is expected on the next line
    awaiting_origin: Option<String>,
    /// Only the first symbol of a block is reported
    paired: bool,
}

/// Counts from one XCTest `Executed ...` line
#[derive(Debug, Clone, Copy)]
struct XcTestRun {
    executed: usize,
    skipped: usize,
    failures: usize,
    duration: f64,
}

/// Accumulator threaded through the forward pass
#[derive(Debug, Default)]
struct ParseState {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
    diagnostic_keys: HashSet<(bool, Option<String>, Option<u32>, String)>,

    linker_errors: Vec<LinkerError>,
    symbol_block: Option<SymbolBlock>,

    failed_tests: Vec<FailedTest>,
    failed_index: HashMap<String, usize>,
    pending_issues: HashMap<String, PendingIssue>,
    pending_order: Vec<String>,
    tests: HashMap<String, TestRecord>,
    flaky_tests: BTreeSet<String>,
    slow_tests: Vec<SlowTest>,
    saw_test_output: bool,

    suite_depth: usize,
    after_suite_close: bool,
    /// Latest `Executed` line of the current run; outer suites print theirs last
    pending_run_summary: Option<XcTestRun>,
    passed_from_summaries: Option<usize>,
    skipped_from_summaries: Option<usize>,
    test_seconds: Option<f64>,

    executables: Vec<ExecutableInfo>,
    build_time: Option<String>,

    context: VecDeque<String>,
}

impl ParseState {
    fn record_diagnostic(&mut self, severity: Severity, diagnostic: Diagnostic) {
        let is_error = severity == Severity::Error;
        let key = (
            is_error,
            diagnostic.file.clone(),
            diagnostic.line,
            diagnostic.message.clone(),
        );
        if !self.diagnostic_keys.insert(key) {
            return;
        }
        if is_error {
            self.errors.push(diagnostic);
        } else {
            self.warnings.push(diagnostic);
        }
    }

    fn record_linker_error(&mut self, error: LinkerError) {
        if !self.linker_errors.contains(&error) {
            self.linker_errors.push(error);
        }
    }

    fn record_phase_failure(&mut self, line: String) {
        let mut message = line;
        for context in self.context.drain(..) {
            message.push('\n');
            message.push_str(&context);
        }
        self.record_diagnostic(Severity::Error, Diagnostic::message_only(message));
    }

    fn handle_linker(&mut self, event: LinkerEvent) {
        match event {
            LinkerEvent::UndefinedSymbols { architecture } => {
                self.close_symbol_block();
                self.symbol_block = Some(SymbolBlock {
                    architecture,
                    awaiting_origin: None,
                    paired: false,
                });
            }
            LinkerEvent::SymbolReference { symbol, origin } => {
                let Some(block) = self.symbol_block.as_mut() else {
                    return;
                };
                if block.paired {
                    return;
                }
                block.paired = true;
                match origin {
                    Some(origin) => {
                        let error = LinkerError::undefined_symbol(
                            symbol,
                            block.architecture.clone(),
                            Some(origin),
                        );
                        self.record_linker_error(error);
                    }
                    None => block.awaiting_origin = Some(symbol),
                }
            }
            LinkerEvent::Missing { message } => {
                self.record_linker_error(LinkerError::message_only(message));
            }
        }
    }

    /// Consume the line following a bare `"sym", referenced from:` as its origin
    fn take_symbol_origin(&mut self, line: &str) -> bool {
        let Some(block) = self.symbol_block.as_mut() else {
            return false;
        };
        let Some(symbol) = block.awaiting_origin.take() else {
            return false;
        };
        let error = LinkerError::undefined_symbol(
            symbol,
            block.architecture.clone(),
            Some(reference_origin(line)),
        );
        self.record_linker_error(error);
        true
    }

    fn close_symbol_block(&mut self) {
        if let Some(block) = self.symbol_block.take()
            && let Some(symbol) = block.awaiting_origin
        {
            self.record_linker_error(LinkerError::undefined_symbol(
                symbol,
                block.architecture,
                None,
            ));
        }
    }

    fn handle_test(&mut self, event: TestEvent, slow_threshold: f64) {
        self.saw_test_output = true;
        match event {
            TestEvent::CaseFinished {
                test,
                outcome,
                duration,
            } => self.record_outcome(test, outcome, duration, slow_threshold),
            TestEvent::Issue {
                test,
                file,
                line,
                message,
            } => self.record_issue(test, file, line, message),
            TestEvent::SuiteStarted => {
                // A top-level suite opening starts a new run.
                if self.suite_depth == 0 {
                    self.commit_run_summary();
                }
                self.suite_depth += 1;
            }
            TestEvent::SuiteFinished => {
                self.suite_depth = self.suite_depth.saturating_sub(1);
                self.after_suite_close = true;
            }
            TestEvent::XcTestSummary {
                executed,
                skipped,
                failures,
                duration,
            } => {
                let run = XcTestRun {
                    executed,
                    skipped,
                    failures,
                    duration,
                };
                // Every suite prints its own summary after closing, innermost
                // first, so only the last one of a run is kept. Closes without
                // a matching start (truncated logs) are handled the same way.
                if std::mem::take(&mut self.after_suite_close) {
                    self.pending_run_summary = Some(run);
                } else {
                    self.add_xctest_run(run);
                }
            }
            TestEvent::SwiftTestingSummary {
                tests,
                passed,
                issues,
                duration,
            } => {
                let passed = if passed {
                    tests
                } else {
                    tests.saturating_sub(issues)
                };
                self.add_summary(passed, duration);
            }
        }
    }

    fn commit_run_summary(&mut self) {
        if let Some(run) = self.pending_run_summary.take() {
            self.add_xctest_run(run);
        }
    }

    fn add_xctest_run(&mut self, run: XcTestRun) {
        *self.skipped_from_summaries.get_or_insert(0) += run.skipped;
        self.add_summary(run.executed.saturating_sub(run.failures), run.duration);
    }

    fn add_summary(&mut self, passed: usize, duration: f64) {
        *self.passed_from_summaries.get_or_insert(0) += passed;
        *self.test_seconds.get_or_insert(0.0) += duration;
    }

    fn record_outcome(
        &mut self,
        test: String,
        outcome: TestOutcome,
        duration: Option<f64>,
        slow_threshold: f64,
    ) {
        let record = self.tests.entry(test.clone()).or_default();
        record.last_outcome = Some(outcome);
        match outcome {
            TestOutcome::Passed => record.seen_pass = true,
            TestOutcome::Failed => record.seen_fail = true,
            TestOutcome::Skipped => {}
        }
        if record.seen_pass && record.seen_fail {
            self.flaky_tests.insert(test.clone());
        }

        match outcome {
            TestOutcome::Passed => {
                if let Some(duration) = duration
                    && duration >= slow_threshold
                    && !self.slow_tests.iter().any(|s| s.test == test)
                {
                    self.slow_tests.push(SlowTest { test, duration });
                }
            }
            TestOutcome::Failed => {
                if self.failed_index.contains_key(&test) {
                    return;
                }
                let issue = self.pending_issues.remove(&test);
                let (file, line, message) = match issue {
                    Some(issue) => (issue.file, issue.line, issue.message),
                    None => (None, None, DEFAULT_FAILURE_MESSAGE.to_string()),
                };
                self.push_failed(FailedTest {
                    test,
                    message,
                    file,
                    line,
                    duration,
                });
            }
            TestOutcome::Skipped => {}
        }
    }

    fn record_issue(
        &mut self,
        test: String,
        file: Option<String>,
        line: Option<u32>,
        message: String,
    ) {
        if let Some(&index) = self.failed_index.get(&test) {
            let failed = &mut self.failed_tests[index];
            if failed.message == DEFAULT_FAILURE_MESSAGE {
                failed.message = message;
                failed.file = file;
                failed.line = line;
            }
            return;
        }
        if !self.pending_issues.contains_key(&test) {
            self.pending_order.push(test.clone());
            self.pending_issues
                .insert(test, PendingIssue { file, line, message });
        }
    }

    fn push_failed(&mut self, failed: FailedTest) {
        self.failed_index
            .insert(failed.test.clone(), self.failed_tests.len());
        self.failed_tests.push(failed);
    }

    fn handle_build(&mut self, event: BuildEvent) {
        match event {
            BuildEvent::PhaseFailed { line } => self.record_phase_failure(line),
            BuildEvent::Executable(info) => {
                if !self.executables.iter().any(|e| e.path == info.path) {
                    self.executables.push(info);
                }
            }
            BuildEvent::Banner { build_time } => {
                if let Some(secs) = build_time {
                    self.build_time = Some(format_seconds(secs));
                }
            }
        }
    }

    fn remember_context(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if self.context.len() == PHASE_CONTEXT_LINES {
            self.context.pop_front();
        }
        self.context.push_back(line.to_string());
    }

    fn into_result(mut self) -> BuildResult {
        self.close_symbol_block();
        self.commit_run_summary();

        // Issues never followed by an outcome line still mean the test failed.
        for test in std::mem::take(&mut self.pending_order) {
            if let Some(issue) = self.pending_issues.remove(&test) {
                if let Some(record) = self.tests.get_mut(&test) {
                    record.seen_fail = true;
                    if record.seen_pass {
                        self.flaky_tests.insert(test.clone());
                    }
                }
                self.push_failed(FailedTest {
                    test,
                    message: issue.message,
                    file: issue.file,
                    line: issue.line,
                    duration: None,
                });
            }
        }

        let passed_tests = if self.saw_test_output {
            self.passed_from_summaries.or_else(|| {
                Some(
                    self.tests
                        .values()
                        .filter(|r| r.last_outcome == Some(TestOutcome::Passed))
                        .count(),
                )
            })
        } else {
            None
        };
        let skipped_tests = if self.saw_test_output {
            self.skipped_from_summaries.or_else(|| {
                Some(
                    self.tests
                        .values()
                        .filter(|r| r.last_outcome == Some(TestOutcome::Skipped))
                        .count(),
                )
            })
        } else {
            None
        };

        BuildResult::from_parts(ResultParts {
            errors: self.errors,
            warnings: self.warnings,
            failed_tests: self.failed_tests,
            linker_errors: self.linker_errors,
            slow_tests: self.slow_tests,
            flaky_tests: self.flaky_tests,
            executables: self.executables,
            passed_tests,
            skipped_tests,
            build_time: self.build_time,
            test_time: self.test_seconds.map(format_seconds),
        })
    }
}

// ============================================================================
// Streaming Parser for incremental parsing
// ============================================================================

/// A streaming parser for build/test output
pub struct StreamingParser {
    state: ParseState,
    slow_threshold: f64,
    lines: usize,
}

impl StreamingParser {
    /// Create a new streaming parser with the default slow threshold
    #[must_use]
    pub fn new() -> Self {
        Self::with_slow_threshold(DEFAULT_SLOW_THRESHOLD_SECS)
    }

    /// Create a new streaming parser that reports passing tests at or above
    /// `slow_threshold` seconds as slow
    #[must_use]
    pub fn with_slow_threshold(slow_threshold: f64) -> Self {
        Self {
            state: ParseState::default(),
            slow_threshold,
            lines: 0,
        }
    }

    /// Process a single line of output, returning how it was classified
    pub fn process_line(&mut self, line: &str) -> LineEvent {
        let line = line.trim_end_matches(['\r', '\n']);
        self.lines += 1;

        let event = classify_line(line);
        let state = &mut self.state;

        if event == LineEvent::Noise && !line.trim().is_empty() && state.take_symbol_origin(line.trim())
        {
            return event;
        }
        if event != LineEvent::Noise
            && event != LineEvent::Visual
            && let Some(block) = state.symbol_block.as_ref()
            && block.awaiting_origin.is_some()
        {
            state.close_symbol_block();
        }

        match event.clone() {
            LineEvent::Noise => {
                state.remember_context(line);
                return event;
            }
            LineEvent::Visual => return event,
            LineEvent::Diagnostic(severity, diagnostic) => {
                state.record_diagnostic(severity, diagnostic);
            }
            LineEvent::Test(test) => state.handle_test(test, self.slow_threshold),
            LineEvent::Linker(linker) => state.handle_linker(linker),
            LineEvent::Build(build) => state.handle_build(build),
        }
        trace!(line = self.lines, ?event, "classified line");
        state.context.clear();
        event
    }

    /// Number of lines processed so far
    #[must_use]
    pub fn lines_processed(&self) -> usize {
        self.lines
    }

    /// Finalize and return the result
    #[must_use]
    pub fn into_result(self) -> BuildResult {
        let lines = self.lines;
        let result = self.state.into_result();
        debug!(
            lines,
            status = ?result.status(),
            errors = result.summary().errors,
            warnings = result.summary().warnings,
            failed_tests = result.summary().failed_tests,
            linker_errors = result.summary().linker_errors,
            passed_tests = ?result.summary().passed_tests,
            "parsed build output"
        );
        result
    }
}

impl Default for StreamingParser {
    fn default() -> Self {
        Self::new()
    }
}
