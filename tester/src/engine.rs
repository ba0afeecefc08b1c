//! Expansion engine boundary.
//!
//! The harness never expands anything itself. It hands the loaded fixtures
//! and the caller's [`TransformationTable`] to an [`ExpansionEngine`], which
//! applies the transformations, compares the result with the expected text
//! and reports mismatches through the shared [`IssueSink`].

use std::collections::btree_map::{self, BTreeMap};
use std::marker::PhantomData;

use anyhow::Result;

use crate::issue::{Issue, IssueSink};
use crate::location::SourceLocation;

/// Transformation name to implementation.
///
/// Names are unique and order is irrelevant. Implementations are opaque to
/// the harness and passed through to the engine unmodified.
#[derive(Debug, Clone)]
pub struct TransformationTable<T> {
    entries: BTreeMap<String, T>,
}

impl<T> Default for TransformationTable<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> TransformationTable<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transformation, returning any previous one under that name
    pub fn insert(&mut self, name: impl Into<String>, transformation: T) -> Option<T> {
        self.entries.insert(name.into(), transformation)
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, transformation: T) -> Self {
        self.insert(name, transformation);
        self
    }

    /// Look up a transformation by the name it is invoked with
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    /// Whether a transformation is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(name, transformation)` pairs
    pub fn iter(&self) -> btree_map::Iter<'_, String, T> {
        self.entries.iter()
    }

    /// Number of registered transformations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T, S: Into<String>> FromIterator<(S, T)> for TransformationTable<T> {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, transformation)| (name.into(), transformation))
                .collect(),
        }
    }
}

impl<T, S: Into<String>, const N: usize> From<[(S, T); N]> for TransformationTable<T> {
    fn from(entries: [(S, T); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a TransformationTable<T> {
    type Item = (&'a String, &'a T);
    type IntoIter = btree_map::Iter<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Expands fixture input and asserts it matches the expected output.
///
/// Implementations report every mismatch through `sink` rather than
/// panicking. The harness still catches a panicking engine and reports it.
pub trait ExpansionEngine {
    /// Implementation type stored in the [`TransformationTable`]
    type Transformation;

    /// Expand `input` using `transformations` and compare with `expected`.
    fn assert_expansion(
        &self,
        input: &str,
        expected: &str,
        transformations: &TransformationTable<Self::Transformation>,
        location: &SourceLocation,
        sink: &dyn IssueSink,
    );
}

impl<E: ExpansionEngine + ?Sized> ExpansionEngine for &E {
    type Transformation = E::Transformation;

    fn assert_expansion(
        &self,
        input: &str,
        expected: &str,
        transformations: &TransformationTable<Self::Transformation>,
        location: &SourceLocation,
        sink: &dyn IssueSink,
    ) {
        (**self).assert_expansion(input, expected, transformations, location, sink)
    }
}

/// Engine built from an expansion function.
///
/// The function produces the expanded text; it is compared byte-for-byte
/// with the expected output. A difference is reported as one
/// [`ExpansionMismatch`](crate::IssueKind::ExpansionMismatch), an expansion
/// error as one [`Unexpected`](crate::IssueKind::Unexpected) issue.
pub struct ExpandAndCompare<T, F> {
    expand: F,
    _transformation: PhantomData<fn(&T)>,
}

impl<T, F> ExpandAndCompare<T, F>
where
    F: Fn(&str, &TransformationTable<T>) -> Result<String>,
{
    /// Wrap an expansion function
    pub fn new(expand: F) -> Self {
        Self {
            expand,
            _transformation: PhantomData,
        }
    }
}

impl<T, F> ExpansionEngine for ExpandAndCompare<T, F>
where
    F: Fn(&str, &TransformationTable<T>) -> Result<String>,
{
    type Transformation = T;

    fn assert_expansion(
        &self,
        input: &str,
        expected: &str,
        transformations: &TransformationTable<T>,
        location: &SourceLocation,
        sink: &dyn IssueSink,
    ) {
        let actual = match (self.expand)(input, transformations) {
            Ok(actual) => actual,
            Err(e) => {
                sink.record(Issue::unexpected(
                    format!("Expansion failed: {:#}", e),
                    location.clone(),
                ));
                return;
            }
        };

        if actual != expected {
            sink.record(Issue::mismatch(expected, &actual, location.clone()));
        }
    }
}
