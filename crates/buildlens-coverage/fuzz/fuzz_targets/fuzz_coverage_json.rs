// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for coverage report normalization
//!
//! This fuzzes `parse_coverage_json` with arbitrary documents and target filters.

#![no_main]

use libfuzzer_sys::fuzz_target;

use buildlens_coverage::parse_coverage_json;

fuzz_target!(|input: (&str, Option<&str>)| {
    let (json, filter) = input;
    if let Ok(coverage) = parse_coverage_json(json, filter) {
        assert!(!coverage.files.is_empty());
    }
});
