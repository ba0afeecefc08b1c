//! Failure reporting.
//!
//! Every failure a harness run can produce, whether a missing fixture or an
//! expansion mismatch, is surfaced as an [`Issue`] through an [`IssueSink`].
//! Two sink styles are provided:
//!
//! - [`IssueRecorder`]: structured. Issues are collected and the run
//!   continues; the caller decides when to fail. This is the default.
//! - [`PanicSink`]: legacy. The first issue panics and ends the test.

use std::fmt;
use std::path::PathBuf;

use parking_lot::Mutex;
use serde::Serialize;

use crate::fixture::FixtureError;
use crate::location::SourceLocation;

/// Classification of a reported failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// A fixture file could not be read
    MissingFixture {
        /// Resolved fixture path
        path: PathBuf,
    },
    /// Expanded source differs from the expected output
    ExpansionMismatch {
        /// Expected output fixture text
        expected: String,
        /// Text the engine produced
        actual: String,
    },
    /// Any other failure, wrapped with a generic diagnostic
    Unexpected,
}

/// One reported failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Failure classification
    #[serde(flatten)]
    pub kind: IssueKind,
    /// Human-readable description
    pub message: String,
    /// Harness call the failure belongs to
    pub location: SourceLocation,
}

impl Issue {
    /// Create an issue
    pub fn new(kind: IssueKind, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }

    /// Issue for a fixture that failed to load.
    ///
    /// Unreadable files become [`IssueKind::MissingFixture`]; other fixture
    /// errors are [`IssueKind::Unexpected`].
    pub fn from_fixture_error(error: &FixtureError, location: SourceLocation) -> Self {
        match error {
            FixtureError::MissingFile { path, source } => Self::new(
                IssueKind::MissingFixture { path: path.clone() },
                format!("{error} ({source})"),
                location,
            ),
            other => Self::unexpected(format!("Failed to load fixture: {other}"), location),
        }
    }

    /// Issue for expanded text that differs from the expected output.
    ///
    /// The message carries a line diff of expected vs actual.
    pub fn mismatch(expected: &str, actual: &str, location: SourceLocation) -> Self {
        let diff = similar_asserts::SimpleDiff::from_str(expected, actual, "expected", "actual");
        Self::new(
            IssueKind::ExpansionMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            },
            format!("Expanded source does not match expected output\n{diff}"),
            location,
        )
    }

    /// Issue for an unclassified failure
    pub fn unexpected(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(IssueKind::Unexpected, message, location)
    }

    /// Whether this issue reports a missing fixture
    pub fn is_missing_fixture(&self) -> bool {
        matches!(self.kind, IssueKind::MissingFixture { .. })
    }

    /// Whether this issue reports an expansion mismatch
    pub fn is_mismatch(&self) -> bool {
        matches!(self.kind, IssueKind::ExpansionMismatch { .. })
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Destination for reported failures.
///
/// Shared by the harness and the expansion engine so that fixture failures
/// and mismatches land in the same place.
pub trait IssueSink {
    /// Report one failure
    fn record(&self, issue: Issue);
}

impl<S: IssueSink + ?Sized> IssueSink for &S {
    fn record(&self, issue: Issue) {
        (**self).record(issue)
    }
}

/// Legacy sink: the first reported issue panics.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicSink;

impl IssueSink for PanicSink {
    fn record(&self, issue: Issue) {
        panic!("{issue}");
    }
}

/// Structured sink collecting issues without aborting.
///
/// Safe to share across threads.
#[derive(Debug, Default)]
pub struct IssueRecorder {
    issues: Mutex<Vec<Issue>>,
}

impl IssueRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the issues recorded so far
    pub fn issues(&self) -> Vec<Issue> {
        self.issues.lock().clone()
    }

    /// Number of recorded issues
    pub fn len(&self) -> usize {
        self.issues.lock().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.issues.lock().is_empty()
    }

    /// Remove and return all recorded issues
    pub fn take(&self) -> Vec<Issue> {
        std::mem::take(&mut *self.issues.lock())
    }

    /// `Ok` when nothing was recorded, otherwise every issue as one failure
    pub fn into_result(self) -> Result<(), HarnessFailure> {
        let issues = self.issues.into_inner();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(HarnessFailure { issues })
        }
    }
}

impl IssueSink for IssueRecorder {
    fn record(&self, issue: Issue) {
        log::debug!("Recorded issue: {}", issue);
        self.issues.lock().push(issue);
    }
}

/// Sink forwarding to a closure.
pub struct FnSink<F>(F);

/// Wrap a closure as an [`IssueSink`]
pub fn sink_fn<F: Fn(Issue)>(f: F) -> FnSink<F> {
    FnSink(f)
}

impl<F: Fn(Issue)> IssueSink for FnSink<F> {
    fn record(&self, issue: Issue) {
        (self.0)(issue)
    }
}

/// Every issue recorded by one harness run.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", render_issues(.issues))]
pub struct HarnessFailure {
    /// Recorded issues, in report order
    pub issues: Vec<Issue>,
}

fn render_issues(issues: &[Issue]) -> String {
    let mut out = format!("{} issue(s) recorded", issues.len());
    for (i, issue) in issues.iter().enumerate() {
        out.push_str(&format!("\n[{}] {}", i + 1, issue));
    }
    out
}
