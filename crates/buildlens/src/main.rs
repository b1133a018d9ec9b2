// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! buildlens: concise summaries of xcodebuild and SwiftPM output
//!
//! Reads captured build or test output from a file or stdin and prints either
//! a short text summary or the structured result as JSON.

use std::io::Read;
use std::process::ExitCode;

use anyhow::Context;
use buildlens::config::{Action, Config};
use buildlens::{analyze, format_build_result, format_test_result};
use clap::Parser;
use tracing::{debug, info};

fn main() -> anyhow::Result<ExitCode> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    config.validate()?;

    // Logs may carry stray non-UTF-8 bytes; those are replaced, not rejected.
    let bytes = match &config.input {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read build output from {}", path.display()))?,
        None => {
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read build output from stdin")?;
            buffer
        }
    };
    let text = String::from_utf8_lossy(&bytes);
    debug!(bytes = text.len(), "read build output");

    let options = config.extract_options();
    let result = analyze(&text, &options);
    info!(status = ?result.status(), "analysis complete");

    let rendered = if config.json {
        result.to_json().context("Failed to serialize result")?
    } else {
        match config.action() {
            Action::Build => format_build_result(&result, options.project_root.as_deref()),
            Action::Test => format_test_result(&result),
        }
    };
    println!("{rendered}");

    Ok(if result.status().is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
