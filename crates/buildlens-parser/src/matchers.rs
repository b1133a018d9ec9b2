// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Line classification
//!
//! Every line of build output is run through an ordered list of independent
//! matchers. The first matcher whose pattern fits turns the line into a
//! [`LineEvent`]; lines nothing recognizes are [`LineEvent::Noise`]. Adding a
//! new output dialect means adding a matcher, not touching the parser loop.
//!
//! Order matters only where two patterns could both fit the same line: the
//! XCTest assertion form (`path:line: error: Suite.test : ...`) is checked
//! before the generic diagnostic forms, and Swift Testing run summaries are
//! checked before individual Swift Testing test lines.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::ParseError;
use crate::model::{Diagnostic, ExecutableInfo};

/// Severity of a compiler diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// `error:` or `fatal error:`
    Error,
    /// `warning:`
    Warning,
}

/// Possible per-test outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOutcome {
    /// Test passed
    Passed,
    /// Test failed
    Failed,
    /// Test was skipped
    Skipped,
}

impl TestOutcome {
    fn from_word(word: &str) -> Self {
        match word {
            "passed" => Self::Passed,
            "skipped" => Self::Skipped,
            _ => Self::Failed,
        }
    }
}

/// A recognized test-runner line
#[derive(Debug, Clone, PartialEq)]
pub enum TestEvent {
    /// A single test finished
    CaseFinished {
        /// Qualified test identifier
        test: String,
        /// Reported outcome
        outcome: TestOutcome,
        /// Duration in seconds, when printed
        duration: Option<f64>,
    },
    /// An assertion failure or recorded issue attributed to a test
    Issue {
        /// Qualified test identifier
        test: String,
        /// File the issue was recorded in
        file: Option<String>,
        /// Line the issue was recorded at
        line: Option<u32>,
        /// Issue text
        message: String,
    },
    /// An XCTest suite began
    SuiteStarted,
    /// An XCTest suite finished
    SuiteFinished,
    /// XCTest run summary: `Executed N tests, with F failures ... in T1 (T2) seconds`
    XcTestSummary {
        /// Tests executed
        executed: usize,
        /// Tests skipped, when reported
        skipped: usize,
        /// Failures reported
        failures: usize,
        /// First parenthesized duration, in seconds
        duration: f64,
    },
    /// Swift Testing run summary: `Test run with N tests ... passed|failed after T seconds`
    SwiftTestingSummary {
        /// Tests run
        tests: usize,
        /// Whether the run passed
        passed: bool,
        /// Issues reported on failure
        issues: usize,
        /// Run duration, in seconds
        duration: f64,
    },
}

/// A recognized linker line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkerEvent {
    /// `Undefined symbols for architecture <arch>:`
    UndefinedSymbols {
        /// Target architecture
        architecture: String,
    },
    /// `"<symbol>", referenced from: [origin]`
    SymbolReference {
        /// Undefined symbol
        symbol: String,
        /// Referencing object, when printed on the same line
        origin: Option<String>,
    },
    /// Missing framework or library
    Missing {
        /// Message such as `framework not found Foo`
        message: String,
    },
}

/// A recognized build-system line
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    /// `Command <Phase> failed with a nonzero exit code`
    PhaseFailed {
        /// The triggering line, trimmed
        line: String,
    },
    /// An artifact registration line
    Executable(ExecutableInfo),
    /// A `** BUILD SUCCEEDED **`-style banner or SwiftPM completion line
    Banner {
        /// Build duration in seconds, when printed
        build_time: Option<f64>,
    },
}

/// Classification of a single output line
#[derive(Debug, Clone, PartialEq)]
pub enum LineEvent {
    /// Compiler diagnostic or crash marker
    Diagnostic(Severity, Diagnostic),
    /// Test-runner line
    Test(TestEvent),
    /// Linker line
    Linker(LinkerEvent),
    /// Build-system line
    Build(BuildEvent),
    /// Source-context echo or caret marker belonging to a diagnostic block
    Visual,
    /// Anything else
    Noise,
}

type LineClassifier = fn(&Captures) -> Option<LineEvent>;

/// Ordered list of compiled line patterns
pub struct LineMatchers {
    matchers: Vec<(Regex, LineClassifier)>,
}

impl LineMatchers {
    /// Build the default matcher set for xcodebuild, SwiftPM, XCTest and Swift Testing output
    #[must_use]
    pub fn default_matchers() -> Self {
        Self {
            matchers: vec![
                // Swift 6 source echo (`15 |     code`, `   |     `- error: ...`)
                (pattern(r"^\s*(?:\d+\s*)?\|"), |_| Some(LineEvent::Visual)),
                // Caret / tilde underline
                (pattern(r"^\s*[\^~][\s\^~]*$"), |_| Some(LineEvent::Visual)),
                // Swift Testing run summary
                (
                    pattern(
                        r"^\s*(?:\S+\s+)?Test run with (\d+) tests?(?: in \d+ suites?)? (passed|failed) after ([\d.]+) seconds?(?: with (\d+) issues?)?",
                    ),
                    |caps| {
                        Some(LineEvent::Test(TestEvent::SwiftTestingSummary {
                            tests: number(caps, 1)?,
                            passed: &caps[2] == "passed",
                            issues: number(caps, 4).unwrap_or(0),
                            duration: seconds(caps, 3)?,
                        }))
                    },
                ),
                // Swift Testing issue
                (
                    pattern(
                        r#"^\s*(?:\S+\s+)?Test (?:"(.+?)"|(\S+)) recorded an issue(?: at (.+?):(\d+):(?:\d+:)?)?:? (.*)$"#,
                    ),
                    |caps| {
                        Some(LineEvent::Test(TestEvent::Issue {
                            test: quoted_or_bare(caps, 1, 2)?,
                            file: caps.get(3).map(|m| m.as_str().to_string()),
                            line: number(caps, 4),
                            message: caps[6].trim().to_string(),
                        }))
                    },
                ),
                // Swift Testing test outcome
                (
                    pattern(
                        r#"^\s*(?:\S+\s+)?Test (?:"(.+?)"|(\S+)) (passed|failed|skipped)(?: after ([\d.]+) seconds?)?"#,
                    ),
                    |caps| {
                        Some(LineEvent::Test(TestEvent::CaseFinished {
                            test: quoted_or_bare(caps, 1, 2)?,
                            outcome: TestOutcome::from_word(&caps[3]),
                            duration: seconds(caps, 4),
                        }))
                    },
                ),
                // XCTest case outcome, including the parallel runner's `on '<device>'` form
                (
                    pattern(
                        r"^\s*Test [Cc]ase '(.+?)' (passed|failed|skipped)(?: on '.+?')? \(([\d.]+) seconds\)",
                    ),
                    |caps| {
                        Some(LineEvent::Test(TestEvent::CaseFinished {
                            test: normalize_test_name(&caps[1]),
                            outcome: TestOutcome::from_word(&caps[2]),
                            duration: seconds(caps, 3),
                        }))
                    },
                ),
                (pattern(r"^\s*Test Suite '.+?' started"), |_| {
                    Some(LineEvent::Test(TestEvent::SuiteStarted))
                }),
                (pattern(r"^\s*Test Suite '.+?' (?:passed|failed) at"), |_| {
                    Some(LineEvent::Test(TestEvent::SuiteFinished))
                }),
                // XCTest run summary
                (
                    pattern(
                        r"^\s*Executed (\d+) tests?, with (?:(\d+) tests? skipped and )?(\d+) failures?.*? in ([\d.]+) \(([\d.]+)\) seconds",
                    ),
                    |caps| {
                        Some(LineEvent::Test(TestEvent::XcTestSummary {
                            executed: number(caps, 1)?,
                            skipped: number(caps, 2).unwrap_or(0),
                            failures: number(caps, 3)?,
                            duration: seconds(caps, 4)?,
                        }))
                    },
                ),
                // XCTest assertion: `File.swift:12: error: -[Suite test] : message`
                (
                    pattern(r"^(.+?):(\d+): error: (?:-\[(\S+) (\S+)\]|(\S+)) : (.*)$"),
                    |caps| {
                        let test = match (caps.get(3), caps.get(4), caps.get(5)) {
                            (Some(suite), Some(name), _) => {
                                format!("{}.{}", suite.as_str(), name.as_str())
                            }
                            (_, _, Some(qualified)) => qualified.as_str().to_string(),
                            _ => return None,
                        };
                        Some(LineEvent::Test(TestEvent::Issue {
                            test,
                            file: Some(caps[1].to_string()),
                            line: number(caps, 2),
                            message: caps[6].trim().to_string(),
                        }))
                    },
                ),
                // Runtime crash: `File.swift:600: Fatal error: Index out of range`
                (pattern(r"^(.+?):(\d+): (Fatal error.*)$"), |caps| {
                    Some(LineEvent::Diagnostic(
                        Severity::Error,
                        Diagnostic {
                            file: Some(caps[1].to_string()),
                            line: number(caps, 2),
                            column: None,
                            message: caps[3].trim().to_string(),
                        },
                    ))
                }),
                // Located compiler diagnostic
                (
                    pattern(r"^(.+?):(\d+):(\d+): (fatal error|error|warning): (.*)$"),
                    |caps| {
                        Some(LineEvent::Diagnostic(
                            severity(&caps[4]),
                            Diagnostic {
                                file: Some(caps[1].trim().to_string()),
                                line: number(caps, 2),
                                column: number(caps, 3),
                                message: caps[5].trim().to_string(),
                            },
                        ))
                    },
                ),
                // Location-less diagnostic
                (pattern(r"^(error|warning): (.+)$"), |caps| {
                    Some(LineEvent::Diagnostic(
                        severity(&caps[1]),
                        Diagnostic::message_only(caps[2].trim()),
                    ))
                }),
                (
                    pattern(r"^\s*Command (\S+) failed with a nonzero exit code"),
                    |caps| {
                        Some(LineEvent::Build(BuildEvent::PhaseFailed {
                            line: caps[0].trim().to_string(),
                        }))
                    },
                ),
                (
                    pattern(r"^\s*Undefined symbols for architecture (\S+?):?\s*$"),
                    |caps| {
                        Some(LineEvent::Linker(LinkerEvent::UndefinedSymbols {
                            architecture: caps[1].to_string(),
                        }))
                    },
                ),
                (
                    pattern(r#"^\s*"(.+)", referenced from:\s*(.*)$"#),
                    |caps| {
                        let origin = caps[2].trim();
                        Some(LineEvent::Linker(LinkerEvent::SymbolReference {
                            symbol: caps[1].to_string(),
                            origin: (!origin.is_empty()).then(|| reference_origin(origin)),
                        }))
                    },
                ),
                (
                    pattern(r"^\s*ld: framework (?:not found (\S+)|'(.+?)' not found)"),
                    |caps| {
                        let name = caps.get(1).or_else(|| caps.get(2))?.as_str();
                        Some(LineEvent::Linker(LinkerEvent::Missing {
                            message: format!("framework not found {name}"),
                        }))
                    },
                ),
                (
                    pattern(r"^\s*ld: library (?:not found for -l(\S+)|'(.+?)' not found)"),
                    |caps| {
                        let name = caps.get(1).or_else(|| caps.get(2))?.as_str();
                        Some(LineEvent::Linker(LinkerEvent::Missing {
                            message: format!("library not found for -l{name}"),
                        }))
                    },
                ),
                (
                    pattern(
                        r"^\s*(?:RegisterWithLaunchServices|RegisterExecutionPolicyException) (.+?) \(in target '([^']+)'",
                    ),
                    |caps| {
                        let path = caps[1].replace("\\ ", " ");
                        Some(LineEvent::Build(BuildEvent::Executable(
                            ExecutableInfo::new(path, &caps[2]),
                        )))
                    },
                ),
                (
                    pattern(
                        r"^\s*\*\* (BUILD|TEST|ARCHIVE|CLEAN|ANALYZE) (?:SUCCEEDED|FAILED|INTERRUPTED) \*\*(?: \[([\d.]+) sec\])?",
                    ),
                    |caps| {
                        let build_time = if &caps[1] == "BUILD" {
                            seconds(caps, 2)
                        } else {
                            None
                        };
                        Some(LineEvent::Build(BuildEvent::Banner { build_time }))
                    },
                ),
                (pattern(r"^\s*Build complete! \(([\d.]+)s\)"), |caps| {
                    Some(LineEvent::Build(BuildEvent::Banner {
                        build_time: seconds(caps, 1),
                    }))
                }),
            ],
        }
    }

    /// Classify a line; lines no matcher recognizes are [`LineEvent::Noise`]
    #[must_use]
    pub fn classify(&self, line: &str) -> LineEvent {
        for (regex, classify) in &self.matchers {
            if let Some(caps) = regex.captures(line) {
                return classify(&caps).unwrap_or(LineEvent::Noise);
            }
        }
        LineEvent::Noise
    }
}

static DEFAULT_MATCHERS: LazyLock<LineMatchers> = LazyLock::new(LineMatchers::default_matchers);

/// Classify a single line with the default matcher set
#[must_use]
pub fn classify_line(line: &str) -> LineEvent {
    DEFAULT_MATCHERS.classify(line)
}

/// Parse a captured number of seconds
///
/// # Errors
///
/// Returns `ParseError::InvalidDuration` if the text is not a finite,
/// non-negative number.
pub fn parse_seconds(value: &str) -> Result<f64, ParseError> {
    match value.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs),
        _ => Err(ParseError::InvalidDuration {
            value: value.to_string(),
        }),
    }
}

/// Normalize an XCTest case name
///
/// Input: "-[MathTests testAddition]"
/// Output: "MathTests.testAddition"
fn normalize_test_name(name: &str) -> String {
    name.strip_prefix("-[")
        .and_then(|rest| rest.strip_suffix(']'))
        .and_then(|inner| inner.split_once(' '))
        .map(|(suite, test)| format!("{suite}.{test}"))
        .unwrap_or_else(|| name.to_string())
}

/// Reduce `objc-class-ref in ViewController.o` to `ViewController.o`
pub(crate) fn reference_origin(text: &str) -> String {
    text.rsplit_once(" in ")
        .map(|(_, object)| object.trim().to_string())
        .unwrap_or_else(|| text.to_string())
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("line patterns are static and must compile")
}

fn number<T: FromStr>(caps: &Captures, index: usize) -> Option<T> {
    caps.get(index)?.as_str().parse().ok()
}

fn seconds(caps: &Captures, index: usize) -> Option<f64> {
    parse_seconds(caps.get(index)?.as_str()).ok()
}

fn severity(word: &str) -> Severity {
    if word == "warning" {
        Severity::Warning
    } else {
        Severity::Error
    }
}

fn quoted_or_bare(caps: &Captures, quoted: usize, bare: usize) -> Option<String> {
    caps.get(quoted)
        .or_else(|| caps.get(bare))
        .map(|m| m.as_str().to_string())
}
