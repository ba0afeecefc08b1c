//! Harness dispatch.
//!
//! One harness call runs strictly in order: derive the identifier, load the
//! input fixture, load the expected output, run the engine once. Any failure
//! is reported through the sink and ends that call only.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

use crate::config::HarnessConfig;
use crate::engine::{ExpansionEngine, TransformationTable};
use crate::fixture::load_fixtures;
use crate::identifier::{derive_identifier, TestIdentifier};
use crate::issue::{HarnessFailure, Issue, IssueRecorder, IssueSink, PanicSink};
use crate::location::SourceLocation;

/// Which fixture case a harness call runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestName {
    /// Identifier supplied by the caller, used as is
    Explicit(TestIdentifier),
    /// Raw call-site token, run through [`derive_identifier`]
    CallSite(String),
}

impl TestName {
    /// Resolve to the identifier naming the fixture directory
    pub fn identifier(&self) -> TestIdentifier {
        match self {
            TestName::Explicit(id) => id.clone(),
            TestName::CallSite(raw) => derive_identifier(raw),
        }
    }
}

impl From<TestIdentifier> for TestName {
    fn from(id: TestIdentifier) -> Self {
        TestName::Explicit(id)
    }
}

impl From<&str> for TestName {
    fn from(raw: &str) -> Self {
        TestName::CallSite(raw.to_string())
    }
}

impl From<String> for TestName {
    fn from(raw: String) -> Self {
        TestName::CallSite(raw)
    }
}

/// Fixture-driven macro expansion tester.
///
/// Holds no state between calls; one tester can run any number of cases,
/// from any number of threads when the engine allows it.
pub struct MacroTester<E> {
    engine: E,
    config: HarnessConfig,
}

impl<E: ExpansionEngine> MacroTester<E> {
    /// Create a tester with the default fixture layout and any
    /// `MACRO_TESTER_*` environment overrides applied
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, HarnessConfig::from_env())
    }

    /// Create a tester with a custom fixture layout
    pub fn with_config(engine: E, config: HarnessConfig) -> Self {
        Self { engine, config }
    }

    /// Fixture layout in use
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Underlying expansion engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Run one fixture case, reporting every failure to `sink`.
    ///
    /// Nothing is reported on success. When the input fixture cannot be
    /// loaded the output fixture is not read and the engine is not invoked.
    /// An engine panic is caught and reported as an unexpected issue; a panic
    /// raised by `sink` itself propagates unchanged.
    pub fn run(
        &self,
        test: impl Into<TestName>,
        location: &SourceLocation,
        transformations: &TransformationTable<E::Transformation>,
        sink: &dyn IssueSink,
    ) {
        let test = test.into().identifier();

        let contents = match load_fixtures(&test, &location.file, &self.config) {
            Ok(contents) => contents,
            Err(e) => {
                sink.record(Issue::from_fixture_error(&e, location.clone()));
                return;
            }
        };

        log::debug!(
            "Expanding '{}' with {} transformation(s)",
            test,
            transformations.len()
        );

        let guarded = GuardedSink::new(sink);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.engine.assert_expansion(
                &contents.input,
                &contents.expected,
                transformations,
                location,
                &guarded,
            )
        }));

        if let Err(payload) = outcome {
            if guarded.panicked_while_recording() {
                panic::resume_unwind(payload);
            }
            let reason = panic_message(payload.as_ref());
            log::error!("Expansion engine panicked on '{}': {}", test, reason);
            sink.record(Issue::unexpected(
                format!("Expansion engine panicked on '{}': {}", test, reason),
                location.clone(),
            ));
        }
    }

    /// Run one case with a fresh [`IssueRecorder`].
    ///
    /// Returns every recorded issue as one [`HarnessFailure`].
    pub fn check(
        &self,
        test: impl Into<TestName>,
        location: &SourceLocation,
        transformations: &TransformationTable<E::Transformation>,
    ) -> Result<(), HarnessFailure> {
        let recorder = IssueRecorder::new();
        self.run(test, location, transformations, &recorder);
        recorder.into_result()
    }

    /// Run one case and fail the test once, listing every recorded issue.
    #[track_caller]
    pub fn assert_fixture(
        &self,
        test: impl Into<TestName>,
        location: &SourceLocation,
        transformations: &TransformationTable<E::Transformation>,
    ) {
        if let Err(failure) = self.check(test, location, transformations) {
            panic!("{failure}");
        }
    }

    /// Run one case on a [`PanicSink`]: the first issue ends the test.
    pub fn assert_fixture_fatal(
        &self,
        test: impl Into<TestName>,
        location: &SourceLocation,
        transformations: &TransformationTable<E::Transformation>,
    ) {
        self.run(test, location, transformations, &PanicSink);
    }
}

/// Run one fixture case with the layout of [`MacroTester::new`].
///
/// Free-function form of [`MacroTester::run`].
pub fn run_harness<E: ExpansionEngine>(
    test: impl Into<TestName>,
    location: &SourceLocation,
    engine: E,
    transformations: &TransformationTable<E::Transformation>,
    sink: &dyn IssueSink,
) {
    MacroTester::new(engine).run(test, location, transformations, sink)
}

/// Forwards to the caller's sink and remembers whether a record call was
/// interrupted by a panic.
struct GuardedSink<'a> {
    inner: &'a dyn IssueSink,
    recording: Cell<bool>,
}

impl<'a> GuardedSink<'a> {
    fn new(inner: &'a dyn IssueSink) -> Self {
        Self {
            inner,
            recording: Cell::new(false),
        }
    }

    fn panicked_while_recording(&self) -> bool {
        self.recording.get()
    }
}

impl IssueSink for GuardedSink<'_> {
    fn record(&self, issue: Issue) {
        self.recording.set(true);
        self.inner.record(issue);
        self.recording.set(false);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run the fixture case named after the enclosing test function.
///
/// ```rust,ignore
/// #[test]
/// fn expands_stringify() {
///     // Reads Resources/expands_stringify/{Input,Output}.rs.test
///     // next to this file.
///     test_macro!(&engine, &rules);
/// }
///
/// #[test]
/// fn shared_case() {
///     test_macro!("expands_stringify", &engine, &rules);
/// }
/// ```
///
/// All issues of the run are collected first; the test then fails once
/// listing them.
#[macro_export]
macro_rules! test_macro {
    ($test:expr, $engine:expr, $transformations:expr $(,)?) => {
        $crate::MacroTester::new($engine).assert_fixture(
            $test,
            &$crate::caller_location!(),
            $transformations,
        )
    };
    ($engine:expr, $transformations:expr $(,)?) => {
        $crate::MacroTester::new($engine).assert_fixture(
            $crate::current_test!(),
            &$crate::caller_location!(),
            $transformations,
        )
    };
}
