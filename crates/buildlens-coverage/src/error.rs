// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for buildlens-coverage

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a coverage report could not be normalized
#[derive(Debug, Error)]
pub enum CoverageError {
    /// Error reading the coverage file
    #[error("Failed to read coverage file {path}: {source}")]
    Io {
        /// The path that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Error parsing JSON
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The JSON is valid but matches neither known report layout
    #[error("Unrecognized coverage report: expected a `targets` or `data` array")]
    UnrecognizedSchema,

    /// No files remained after target filtering
    #[error("No coverage files found{}", describe_filter(.target_filter))]
    NoFiles {
        /// The target filter that was applied, if any
        target_filter: Option<String>,
    },
}

fn describe_filter(target_filter: &Option<String>) -> String {
    target_filter
        .as_deref()
        .map(|t| format!(" for target filter '{t}'"))
        .unwrap_or_default()
}
