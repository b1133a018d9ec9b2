// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for build output parsing
//!
//! This fuzzes `parse_build_output`, which must be total over arbitrary text.

#![no_main]

use libfuzzer_sys::fuzz_target;

use buildlens_parser::parse_build_output;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let result = parse_build_output(input, None);
        // The summary is always a projection of the collected entries
        assert_eq!(result.summary().errors, result.errors().len());
        assert_eq!(result.summary().failed_tests, result.failed_tests().len());
    }
});
