// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the streaming parser
//!
//! Feeds arbitrary lines one at a time, as a caller tailing a live build would.

#![no_main]

use libfuzzer_sys::fuzz_target;

use buildlens_parser::StreamingParser;

fuzz_target!(|lines: Vec<String>| {
    let mut parser = StreamingParser::new();
    for line in &lines {
        let _ = parser.process_line(line);
    }
    let _ = parser.into_result();
});
