// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for buildlens-parser

use thiserror::Error;

/// Errors that can occur while converting parsed build output
///
/// Parsing itself is total and never returns these; they surface from the
/// helpers that convert captured text into numbers and from JSON export.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Error serializing a result to JSON
    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),

    /// A captured duration was not a finite, non-negative number of seconds
    #[error("Invalid duration: {value}")]
    InvalidDuration {
        /// The text that failed to convert
        value: String,
    },
}
