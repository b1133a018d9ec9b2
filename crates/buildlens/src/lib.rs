// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! buildlens library
//!
//! This module exports the rendering and command-line layers of buildlens for
//! use in integration tests and as a library.

pub mod config;
pub mod extract;
pub mod format;

pub use extract::{ExtractOptions, analyze, extract_build_errors, extract_test_results};
pub use format::{format_build_result, format_test_result};
