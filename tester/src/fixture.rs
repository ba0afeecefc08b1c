//! Fixture location and loading.
//!
//! Paths are a pure function of the caller's source file, the test
//! identifier and the [`HarnessConfig`]; they are recomputed on every call.
//! Contents are returned exactly as stored, since the expansion comparison is
//! byte-for-byte.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::{FixtureKind, HarnessConfig};
use crate::identifier::TestIdentifier;

/// Errors that can occur when locating or loading fixtures.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// A fixture file could not be read (absent, unreadable, not UTF-8)
    #[error("Missing fixture at path: {}", path.display())]
    MissingFile {
        /// Resolved path of the fixture
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// The caller path has no parent directory to resolve fixtures against
    #[error("Caller location has no parent directory: {}", path.display())]
    InvalidCallerLocation {
        /// Caller path as given
        path: PathBuf,
    },

    /// The identifier is empty, e.g. a raw name of just `()`
    #[error("Empty test identifier for caller: {}", caller.display())]
    EmptyIdentifier {
        /// Caller path the fixtures would have been resolved against
        caller: PathBuf,
    },

    /// A directory could not be listed during fixture discovery
    #[error("Failed to read fixture directory {}: {source}", path.display())]
    ReadDir {
        /// Directory being listed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
}

/// Resolved input and output fixture paths for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixturePaths {
    /// Path of the input fixture
    pub input: PathBuf,
    /// Path of the expected-output fixture
    pub output: PathBuf,
}

impl FixturePaths {
    /// Resolve both fixture paths for `test` relative to `caller`
    pub fn resolve(
        caller: &Path,
        test: &TestIdentifier,
        config: &HarnessConfig,
    ) -> Result<Self, FixtureError> {
        let dir = case_dir(caller, test, config)?;
        Ok(Self {
            input: dir.join(config.file_name(FixtureKind::Input)),
            output: dir.join(config.file_name(FixtureKind::Output)),
        })
    }

    /// Path for one fixture kind
    pub fn get(&self, kind: FixtureKind) -> &Path {
        match kind {
            FixtureKind::Input => &self.input,
            FixtureKind::Output => &self.output,
        }
    }
}

/// Loaded fixture texts for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureContents {
    /// Source text before expansion
    pub input: String,
    /// Expected source text after expansion
    pub expected: String,
}

/// Directory holding the fixtures of one case:
/// `dirname(caller)/<resources_dir>/<test>`.
///
/// An empty identifier would name the resources directory itself and is
/// rejected.
pub fn case_dir(
    caller: &Path,
    test: &TestIdentifier,
    config: &HarnessConfig,
) -> Result<PathBuf, FixtureError> {
    if test.as_str().is_empty() {
        return Err(FixtureError::EmptyIdentifier {
            caller: caller.to_path_buf(),
        });
    }
    let parent = caller
        .parent()
        .ok_or_else(|| FixtureError::InvalidCallerLocation {
            path: caller.to_path_buf(),
        })?;
    Ok(parent.join(&config.resources_dir).join(test))
}

/// Path of a single fixture file.
pub fn fixture_path(
    kind: FixtureKind,
    test: &TestIdentifier,
    caller: &Path,
    config: &HarnessConfig,
) -> Result<PathBuf, FixtureError> {
    Ok(case_dir(caller, test, config)?.join(config.file_name(kind)))
}

/// Load one fixture file as UTF-8 text.
///
/// Any read failure, including invalid UTF-8, yields
/// [`FixtureError::MissingFile`] with the resolved path.
pub fn load_fixture(
    kind: FixtureKind,
    test: &TestIdentifier,
    caller: &Path,
    config: &HarnessConfig,
) -> Result<String, FixtureError> {
    let path = fixture_path(kind, test, caller, config)?;
    log::debug!("Loading {:?} fixture for '{}': {}", kind, test, path.display());

    std::fs::read_to_string(&path).map_err(|source| {
        log::warn!("Missing fixture at path: {} ({})", path.display(), source);
        FixtureError::MissingFile { path, source }
    })
}

/// Load the input fixture, then the expected output.
///
/// The output is not read when the input fails to load.
pub fn load_fixtures(
    test: &TestIdentifier,
    caller: &Path,
    config: &HarnessConfig,
) -> Result<FixtureContents, FixtureError> {
    let input = load_fixture(FixtureKind::Input, test, caller, config)?;
    let expected = load_fixture(FixtureKind::Output, test, caller, config)?;
    Ok(FixtureContents { input, expected })
}
