//! # MacroTester
//!
//! Fixture-driven testing for macro expansions.
//!
//! A test names a fixture case; the harness loads the case's input snippet
//! and expected expansion from disk, next to the test source file, and hands
//! both to an [`ExpansionEngine`] together with the caller's
//! [`TransformationTable`]. Failures are reported through an [`IssueSink`]
//! instead of aborting the test run.
//!
//! ## Fixture Layout
//!
//! ```text
//! tests/
//!   expand_tests.rs
//!   Resources/
//!     expands_stringify/
//!       Input.rs.test
//!       Output.rs.test
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use macro_tester::{test_macro, ExpandAndCompare, TransformationTable};
//!
//! #[test]
//! fn expands_stringify() {
//!     let engine = ExpandAndCompare::new(my_expander);
//!     let rules = TransformationTable::from([("stringify", stringify as Rule)]);
//!
//!     // Loads Resources/expands_stringify/{Input,Output}.rs.test
//!     test_macro!(&engine, &rules);
//! }
//! ```
//!
//! ## Flow
//!
//! 1. **Identifier**: the test name with every `()` removed
//! 2. **Fixtures**: `Input` then `Output`, read byte-for-byte
//! 3. **Engine**: invoked exactly once; mismatches go to the same sink
//!
//! Every call is independent: nothing is cached and no state is shared.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Fixture layout configuration
pub mod config;

/// Fixture case discovery
pub mod discovery;

/// Expansion engine boundary and transformation tables
pub mod engine;

/// Fixture path resolution and loading
pub mod fixture;

/// Harness dispatch
pub mod harness;

/// Test identifier derivation
pub mod identifier;

/// Failure reporting sinks
pub mod issue;

/// Caller source locations
pub mod location;

pub use config::{FixtureKind, HarnessConfig};
pub use discovery::{discover_cases, find_resource_dirs, FixtureCase};
pub use engine::{ExpandAndCompare, ExpansionEngine, TransformationTable};
pub use fixture::{
    fixture_path, load_fixture, load_fixtures, FixtureContents, FixtureError, FixturePaths,
};
pub use harness::{run_harness, MacroTester, TestName};
pub use identifier::{derive_identifier, TestIdentifier};
pub use issue::{
    sink_fn, FnSink, HarnessFailure, Issue, IssueKind, IssueRecorder, IssueSink, PanicSink,
};
pub use location::{resolve_caller_path, SourceLocation};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
