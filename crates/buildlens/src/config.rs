// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the buildlens command line
//!
//! This module provides the clap definitions for the `build` and `test`
//! subcommands, their validation, and the mapping to [`ExtractOptions`].

use std::path::{Path, PathBuf};

use buildlens_parser::DEFAULT_SLOW_THRESHOLD_SECS;
use clap::{Parser, Subcommand};

use crate::extract::ExtractOptions;

/// buildlens - concise summaries of xcodebuild and SwiftPM output
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "buildlens")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run (defaults to `build`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File holding the captured build output
    ///
    /// Output is read from stdin when no file is given.
    #[arg(short, long, global = true, env = "BUILDLENS_INPUT")]
    pub input: Option<PathBuf>,

    /// Emit the structured result as JSON instead of text
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with the summary.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Summarize compile diagnostics and linker errors
    ///
    /// Example:
    ///   xcodebuild -scheme App build 2>&1 | buildlens build --project-root .
    Build {
        /// Project root used to hide warnings from dependencies
        #[arg(short = 'r', long, env = "BUILDLENS_PROJECT_ROOT")]
        project_root: Option<PathBuf>,
    },

    /// Summarize test outcomes, with optional coverage
    ///
    /// Example:
    ///   swift test --enable-code-coverage 2>&1 | buildlens test --coverage default.json
    Test {
        /// Coverage report (xccov or llvm-cov JSON)
        #[arg(long, env = "BUILDLENS_COVERAGE")]
        coverage: Option<PathBuf>,

        /// Only count coverage for targets whose name contains this text
        #[arg(long, env = "BUILDLENS_COVERAGE_TARGET")]
        coverage_target: Option<String>,

        /// Seconds at or above which a passing test is reported as slow
        #[arg(long, env = "BUILDLENS_SLOW_THRESHOLD")]
        slow_threshold: Option<f64>,
    },
}

/// What the binary should do once configuration is validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Render a build summary
    Build,
    /// Render a test summary
    Test,
}

impl Config {
    /// The action selected by the subcommand, `Build` when none was given
    #[must_use]
    pub fn action(&self) -> Action {
        match self.command {
            Some(Command::Test { .. }) => Action::Test,
            Some(Command::Build { .. }) | None => Action::Build,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file is specified but doesn't exist
    /// - The project root is specified but doesn't exist or isn't a directory
    /// - The slow threshold is negative or not finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref input) = self.input
            && !input.is_file()
        {
            return Err(ConfigError::InputNotFound(input.clone()));
        }

        match &self.command {
            Some(Command::Build {
                project_root: Some(root),
            }) => {
                if !root.exists() {
                    return Err(ConfigError::ProjectRootNotFound(root.clone()));
                }
                if !root.is_dir() {
                    return Err(ConfigError::ProjectRootNotDirectory(root.clone()));
                }
            }
            Some(Command::Test {
                slow_threshold: Some(threshold),
                ..
            }) => {
                if !threshold.is_finite() || *threshold < 0.0 {
                    return Err(ConfigError::InvalidSlowThreshold(*threshold));
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }

    /// Collect the options the extraction step needs
    ///
    /// The project root is made absolute (and symlinks resolved) so it can be
    /// compared with the absolute paths compilers print.
    #[must_use]
    pub fn extract_options(&self) -> ExtractOptions {
        match &self.command {
            Some(Command::Build { project_root }) => ExtractOptions {
                project_root: project_root.as_deref().map(resolve_project_root),
                ..Default::default()
            },
            Some(Command::Test {
                coverage,
                coverage_target,
                slow_threshold,
            }) => ExtractOptions {
                slow_threshold: slow_threshold.unwrap_or(DEFAULT_SLOW_THRESHOLD_SECS),
                coverage_path: coverage.clone(),
                coverage_target: coverage_target.clone(),
                ..Default::default()
            },
            None => ExtractOptions::default(),
        }
    }
}

fn resolve_project_root(root: &Path) -> PathBuf {
    root.canonicalize()
        .or_else(|_| std::path::absolute(root))
        .unwrap_or_else(|_| root.to_path_buf())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input file not found
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Project root not found
    #[error("Project root not found: {0}")]
    ProjectRootNotFound(PathBuf),

    /// Project root is not a directory
    #[error("Project root is not a directory: {0}")]
    ProjectRootNotDirectory(PathBuf),

    /// Slow threshold is negative or not a number
    #[error("Slow threshold must be a non-negative number of seconds, got {0}")]
    InvalidSlowThreshold(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.command.is_none());
        assert!(config.input.is_none());
        assert!(!config.json);
        assert!(!config.verbose);
        assert!(!config.quiet);
        assert_eq!(config.action(), Action::Build);
    }

    #[test]
    fn test_action_from_subcommand() {
        let config = Config {
            command: Some(Command::Test {
                coverage: None,
                coverage_target: None,
                slow_threshold: None,
            }),
            ..Default::default()
        };
        assert_eq!(config.action(), Action::Test);
    }

    #[test]
    fn test_log_level_default() {
        let config = Config::default();
        assert_eq!(config.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_log_level_verbose_wins() {
        let config = Config {
            verbose: true,
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_log_level_quiet() {
        let config = Config {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_validate_missing_input() {
        let config = Config {
            input: Some(PathBuf::from("/nonexistent/build-12345.log")),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InputNotFound(_))
        ));
    }

    #[test]
    fn test_validate_missing_project_root() {
        let config = Config {
            command: Some(Command::Build {
                project_root: Some(PathBuf::from("/nonexistent/project/12345")),
            }),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ProjectRootNotFound(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_thresholds() {
        for threshold in [-1.0, f64::NAN, f64::INFINITY] {
            let config = Config {
                command: Some(Command::Test {
                    coverage: None,
                    coverage_target: None,
                    slow_threshold: Some(threshold),
                }),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidSlowThreshold(_))),
                "threshold {threshold} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_accepts_zero_threshold() {
        let config = Config {
            command: Some(Command::Test {
                coverage: None,
                coverage_target: None,
                slow_threshold: Some(0.0),
            }),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extract_options_for_test() {
        let config = Config {
            command: Some(Command::Test {
                coverage: Some(PathBuf::from("coverage.json")),
                coverage_target: Some("App".to_string()),
                slow_threshold: None,
            }),
            ..Default::default()
        };
        let options = config.extract_options();
        assert_eq!(options.slow_threshold, DEFAULT_SLOW_THRESHOLD_SECS);
        assert_eq!(options.coverage_path, Some(PathBuf::from("coverage.json")));
        assert_eq!(options.coverage_target.as_deref(), Some("App"));
        assert!(options.project_root.is_none());
    }

    #[test]
    fn test_extract_options_resolves_relative_root() {
        let config = Config {
            command: Some(Command::Build {
                project_root: Some(PathBuf::from(".")),
            }),
            ..Default::default()
        };
        let expected = std::env::current_dir()
            .and_then(|dir| dir.canonicalize())
            .expect("current dir");
        let root = config.extract_options().project_root.expect("root is set");
        assert!(root.is_absolute());
        assert_eq!(root, expected);
    }

    #[test]
    fn test_missing_root_is_still_made_absolute() {
        let root = resolve_project_root(Path::new("does-not-exist-12345"));
        assert!(root.is_absolute());
        assert!(root.ends_with("does-not-exist-12345"));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
