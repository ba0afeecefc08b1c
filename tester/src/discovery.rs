//! Fixture case discovery.
//!
//! Lists the cases present under a resources directory and finds resources
//! directories in a source tree. Read-only: nothing here creates fixtures.

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::config::{FixtureKind, HarnessConfig};
use crate::fixture::FixtureError;
use crate::identifier::TestIdentifier;

/// One case directory and which of its fixtures exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureCase {
    /// Case name (the directory name)
    pub name: TestIdentifier,
    /// Case directory
    pub dir: PathBuf,
    /// Whether the input fixture exists
    pub has_input: bool,
    /// Whether the expected-output fixture exists
    pub has_output: bool,
}

impl FixtureCase {
    /// Both fixtures are present
    pub fn is_complete(&self) -> bool {
        self.has_input && self.has_output
    }

    /// Fixture kinds absent from the case directory
    pub fn missing(&self) -> Vec<FixtureKind> {
        FixtureKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                FixtureKind::Input => !self.has_input,
                FixtureKind::Output => !self.has_output,
            })
            .collect()
    }
}

/// List the cases under one resources directory, sorted by name.
///
/// Every subdirectory is a case; plain files are ignored.
pub fn discover_cases(
    resources_dir: &Path,
    config: &HarnessConfig,
) -> Result<Vec<FixtureCase>, FixtureError> {
    let read_dir_error = |source| FixtureError::ReadDir {
        path: resources_dir.to_path_buf(),
        source,
    };

    let mut cases = Vec::new();
    for entry in std::fs::read_dir(resources_dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }

        let name = TestIdentifier::new(entry.file_name().to_string_lossy());
        let has_input = dir.join(config.file_name(FixtureKind::Input)).is_file();
        let has_output = dir.join(config.file_name(FixtureKind::Output)).is_file();
        log::trace!(
            "Found case '{}' (input: {}, output: {})",
            name,
            has_input,
            has_output
        );

        cases.push(FixtureCase {
            name,
            dir,
            has_input,
            has_output,
        });
    }

    cases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(cases)
}

/// Find every resources directory below `root`, in path order.
///
/// Resources directories are not descended into.
pub fn find_resource_dirs(
    root: &Path,
    config: &HarnessConfig,
) -> Result<Vec<PathBuf>, FixtureError> {
    let mut dirs = Vec::new();
    let mut walker = WalkDir::new(root).sort_by_file_name().into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| FixtureError::ReadDir {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e.into(),
        })?;

        if entry.file_type().is_dir() && entry.file_name() == config.resources_dir.as_str() {
            log::debug!("Found resources directory: {}", entry.path().display());
            dirs.push(entry.into_path());
            walker.skip_current_dir();
        }
    }

    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_discover_cases_sorted_with_status() {
        let temp = TempDir::new().unwrap();
        let resources = temp.path().join("Resources");
        touch(&resources.join("b_case/Input.rs.test"));
        touch(&resources.join("b_case/Output.rs.test"));
        touch(&resources.join("a_case/Input.rs.test"));
        touch(&resources.join("README.md"));

        let cases = discover_cases(&resources, &HarnessConfig::default()).unwrap();
        assert_eq!(cases.len(), 2);

        assert_eq!(cases[0].name.as_str(), "a_case");
        assert!(!cases[0].is_complete());
        assert_eq!(cases[0].missing(), vec![FixtureKind::Output]);

        assert_eq!(cases[1].name.as_str(), "b_case");
        assert!(cases[1].is_complete());
        assert!(cases[1].missing().is_empty());
    }

    #[test]
    fn test_discover_respects_language_ext() {
        let temp = TempDir::new().unwrap();
        let resources = temp.path().join("Resources");
        touch(&resources.join("testAutoInit/Input.swift.test"));
        touch(&resources.join("testAutoInit/Output.swift.test"));

        let rust = discover_cases(&resources, &HarnessConfig::default()).unwrap();
        assert!(!rust[0].is_complete());

        let swift = HarnessConfig::default().with_language_ext("swift");
        let cases = discover_cases(&resources, &swift).unwrap();
        assert!(cases[0].is_complete());
    }

    #[test]
    fn test_discover_missing_dir() {
        let temp = TempDir::new().unwrap();
        let result = discover_cases(&temp.path().join("Resources"), &HarnessConfig::default());
        assert!(matches!(result, Err(FixtureError::ReadDir { .. })));
    }

    #[test]
    fn test_find_resource_dirs() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("tests/Resources/case/Input.rs.test"));
        touch(&temp.path().join("tests/nested/Resources/other/Input.rs.test"));
        // Not descended into: a Resources dir inside a case
        touch(&temp.path().join("tests/Resources/case/Resources/x/Input.rs.test"));

        let dirs = find_resource_dirs(temp.path(), &HarnessConfig::default()).unwrap();
        assert_eq!(
            dirs,
            vec![
                temp.path().join("tests/Resources"),
                temp.path().join("tests/nested/Resources"),
            ]
        );
    }

    #[test]
    fn test_find_resource_dirs_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = find_resource_dirs(&temp.path().join("nope"), &HarnessConfig::default());
        assert!(matches!(result, Err(FixtureError::ReadDir { .. })));
    }
}
