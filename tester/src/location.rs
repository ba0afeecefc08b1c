//! Caller source locations.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Source file and line a harness call was issued from.
///
/// Fixture resolution only uses the parent directory of `file`; the file
/// itself is never read. `line` is carried into reported issues.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Absolute path of the calling source file
    pub file: PathBuf,
    /// Line of the harness call
    pub line: u32,
}

impl SourceLocation {
    /// Create a location from a file path and line
    pub fn new(file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Directory the calling file lives in, if the path has one
    pub fn directory(&self) -> Option<&Path> {
        self.file.parent()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// Resolve a `file!()` path into an absolute path.
///
/// `file!()` is relative to the workspace root for workspace members and to
/// the package root otherwise. Both are `manifest_dir` or one of its
/// ancestors, so the first ancestor under which the file exists wins.
/// Absolute paths are returned unchanged. When nothing matches, the path is
/// joined onto `manifest_dir`.
pub fn resolve_caller_path(manifest_dir: impl AsRef<Path>, file: impl AsRef<Path>) -> PathBuf {
    let file = file.as_ref();
    if file.is_absolute() {
        return file.to_path_buf();
    }

    let manifest_dir = manifest_dir.as_ref();
    match manifest_dir
        .ancestors()
        .map(|dir| dir.join(file))
        .find(|candidate| candidate.is_file())
    {
        Some(resolved) => resolved,
        None => {
            log::debug!(
                "Caller file {} not found under {} or its ancestors",
                file.display(),
                manifest_dir.display()
            );
            manifest_dir.join(file)
        }
    }
}

/// Expands to the [`SourceLocation`] of the invocation.
///
/// The `file!()` path is made absolute with [`resolve_caller_path`] against
/// the calling crate's `CARGO_MANIFEST_DIR`.
#[macro_export]
macro_rules! caller_location {
    () => {
        $crate::SourceLocation::new(
            $crate::location::resolve_caller_path(env!("CARGO_MANIFEST_DIR"), file!()),
            line!(),
        )
    };
}
