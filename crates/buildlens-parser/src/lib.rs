// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! buildlens-parser: Build and test output parsing for buildlens
//!
//! This library crate turns the raw console output of xcodebuild and SwiftPM
//! (compiler diagnostics, XCTest and Swift Testing results, linker failures)
//! into a structured [`BuildResult`].
//!
//! # Example
//!
//! ```no_run
//! use buildlens_parser::parser::{parse_build_output, StreamingParser};
//!
//! // Parse complete output
//! let output = "main.swift:15:5: error: use of undeclared identifier 'unknown'";
//! let result = parse_build_output(output, None);
//! assert!(!result.status().is_success());
//!
//! // Or use streaming parser for incremental parsing
//! let mut parser = StreamingParser::new();
//! parser.process_line(output);
//! let result = parser.into_result();
//! ```

pub mod error;
pub mod matchers;
pub mod model;
pub mod parser;

pub use error::ParseError;
pub use matchers::{LineEvent, LineMatchers, classify_line};
pub use model::{
    BuildError, BuildResult, BuildStatus, BuildSummary, BuildWarning, CodeCoverage, Diagnostic,
    ExecutableInfo, FailedTest, FileCoverage, LinkerError, SlowTest,
};
pub use parser::{DEFAULT_SLOW_THRESHOLD_SECS, StreamingParser, parse_build_output};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::model::{BuildResult, BuildStatus, CodeCoverage};
    pub use crate::parser::{StreamingParser, parse_build_output};
}
