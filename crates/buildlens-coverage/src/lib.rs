// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! buildlens-coverage: Code coverage normalization for buildlens
//!
//! This library crate reads the two JSON coverage reports a Swift toolchain
//! can produce (`xccov` target reports and `llvm-cov export` data) and
//! normalizes them into one [`CodeCoverage`] model.
//!
//! # Example
//!
//! ```no_run
//! use buildlens_coverage::parse_coverage_from_path;
//!
//! if let Some(coverage) = parse_coverage_from_path("coverage.json", Some("MyApp")) {
//!     println!("{:.1}% of lines covered", coverage.line_coverage);
//! }
//! ```

#![warn(missing_docs)]

pub mod coverage;
pub mod error;

pub use buildlens_parser::model::{CodeCoverage, FileCoverage};
pub use coverage::{
    CoverageSchema, is_test_bundle, load_coverage, parse_coverage_from_path, parse_coverage_json,
};
pub use error::CoverageError;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::coverage::{load_coverage, parse_coverage_from_path};
    pub use crate::error::CoverageError;
    pub use buildlens_parser::model::{CodeCoverage, FileCoverage};
}
