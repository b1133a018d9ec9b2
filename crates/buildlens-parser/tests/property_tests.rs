// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for buildlens-parser
//!
//! These tests use proptest to check that parsing is total and that the
//! summary and deduplication invariants hold for arbitrary input.

use proptest::prelude::*;

use buildlens_parser::{StreamingParser, parse_build_output};

// ============================================================================
// Strategies
// ============================================================================

/// Lines shaped like real toolchain output, mixed with noise
fn output_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("Building for debugging...".to_string()),
        Just("** TEST FAILED **".to_string()),
        Just("** BUILD SUCCEEDED ** [1.2 sec]".to_string()),
        Just("Undefined symbols for architecture arm64:".to_string()),
        Just("ld: framework not found Analytics".to_string()),
        Just("Command PhaseScriptExecution failed with a nonzero exit code".to_string()),
        Just("    ^~~~".to_string()),
        Just("   12 | let x = 1".to_string()),
        Just("Test Suite 'All tests' started at 2026-01-01 10:00:00.000".to_string()),
        Just("Test Suite 'All tests' passed at 2026-01-01 10:00:01.000".to_string()),
        ("[a-z]{1,8}", 1u32..500, 1u32..80, prop::bool::ANY, "[ -~]{0,40}").prop_map(
            |(file, line, col, is_error, msg)| {
                let severity = if is_error { "error" } else { "warning" };
                format!("/src/{file}.swift:{line}:{col}: {severity}: {msg}")
            }
        ),
        ("[A-Z][a-z]{1,6}", "[a-z]{1,8}", prop::bool::ANY, 0u32..3000).prop_map(
            |(suite, test, passed, millis)| {
                let outcome = if passed { "passed" } else { "failed" };
                format!(
                    "Test Case '-[{suite} {test}]' {outcome} ({}.{:03} seconds).",
                    millis / 1000,
                    millis % 1000
                )
            }
        ),
        ("[a-z]{1,8}", prop::bool::ANY).prop_map(|(test, passed)| {
            let outcome = if passed { "passed" } else { "failed" };
            format!("􀟈 Test {test}() {outcome} after 0.002 seconds.")
        }),
        (1usize..2000, 0usize..5).prop_map(|(executed, failures)| format!(
            "Executed {executed} tests, with {failures} failures (0 unexpected) in 0.5 (0.6) seconds"
        )),
        "[a-z_]{1,12}".prop_map(|sym| format!("  \"_{sym}\", referenced from: _main in main.o")),
        ".{0,80}",
    ]
}

fn output_text() -> impl Strategy<Value = String> {
    prop::collection::vec(output_line(), 0..40).prop_map(|lines| lines.join("\n"))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn parse_never_panics_and_summary_is_a_projection(text in output_text()) {
        let result = parse_build_output(&text, None);
        let summary = result.summary();
        prop_assert_eq!(summary.errors, result.errors().len());
        prop_assert_eq!(summary.warnings, result.warnings().len());
        prop_assert_eq!(summary.failed_tests, result.failed_tests().len());
        prop_assert_eq!(summary.linker_errors, result.linker_errors().len());
    }

    #[test]
    fn status_follows_evidence(text in output_text()) {
        let result = parse_build_output(&text, None);
        let has_evidence = !result.errors().is_empty()
            || !result.linker_errors().is_empty()
            || !result.failed_tests().is_empty()
            || !result.flaky_tests().is_empty();
        prop_assert_eq!(result.status().is_success(), !has_evidence);
    }

    #[test]
    fn repeated_diagnostics_collapse(
        file in "[a-z]{1,8}",
        line in 1u32..500,
        msg in "[a-z]{1,10}( [a-z]{1,10}){0,3}",
        copies in 1usize..5,
    ) {
        let diagnostic = format!("/src/{file}.swift:{line}:1: error: {msg}");
        let text = vec![diagnostic; copies].join("\n");
        let result = parse_build_output(&text, None);
        prop_assert_eq!(result.summary().errors, 1);
    }

    #[test]
    fn repeated_linker_errors_collapse(copies in 1usize..5) {
        let text = vec!["ld: library not found for -lsqlite3"; copies].join("\n");
        let result = parse_build_output(text.as_str(), None);
        prop_assert_eq!(result.linker_errors().len(), 1);
    }

    #[test]
    fn streaming_matches_batch(text in output_text()) {
        let mut parser = StreamingParser::new();
        for line in text.lines() {
            parser.process_line(line);
        }
        prop_assert_eq!(parser.into_result(), parse_build_output(&text, None));
    }
}
