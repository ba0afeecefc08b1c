//! Harness configuration.
//!
//! Describes the on-disk fixture layout:
//!
//! ```text
//! <dir of caller source>/
//!   Resources/
//!     <TestIdentifier>/
//!       Input.rs.test
//!       Output.rs.test
//! ```
//!
//! The trailing `.test` marker keeps build tooling from treating fixtures as
//! compilable sources.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Directory next to the calling source file that holds fixture cases
pub const DEFAULT_RESOURCES_DIR: &str = "Resources";

/// Source-language extension of fixture files
pub const DEFAULT_LANGUAGE_EXT: &str = "rs";

/// Marker appended after the language extension
pub const FIXTURE_MARKER_EXT: &str = "test";

/// Base name of the input fixture
pub const DEFAULT_INPUT_NAME: &str = "Input";

/// Base name of the expected-output fixture
pub const DEFAULT_OUTPUT_NAME: &str = "Output";

/// Environment variable overriding [`HarnessConfig::resources_dir`]
pub const ENV_RESOURCES_DIR: &str = "MACRO_TESTER_RESOURCES_DIR";

/// Environment variable overriding [`HarnessConfig::language_ext`]
pub const ENV_LANGUAGE_EXT: &str = "MACRO_TESTER_LANGUAGE_EXT";

/// The two files making up a fixture case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureKind {
    /// Source text before expansion
    Input,
    /// Expected source text after expansion
    Output,
}

impl FixtureKind {
    /// Both kinds, in load order
    pub const ALL: [FixtureKind; 2] = [FixtureKind::Input, FixtureKind::Output];
}

/// Fixture layout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory name next to the caller holding one subdirectory per case
    pub resources_dir: String,
    /// Source-language extension (`rs` gives `Input.rs.test`)
    pub language_ext: String,
    /// Non-compiled marker extension
    pub marker_ext: String,
    /// Base name of the input fixture
    pub input_name: String,
    /// Base name of the expected-output fixture
    pub output_name: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            resources_dir: DEFAULT_RESOURCES_DIR.to_string(),
            language_ext: DEFAULT_LANGUAGE_EXT.to_string(),
            marker_ext: FIXTURE_MARKER_EXT.to_string(),
            input_name: DEFAULT_INPUT_NAME.to_string(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}

impl HarnessConfig {
    /// Default layout with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply overrides looked up by environment variable name.
    ///
    /// Empty values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ENV_RESOURCES_DIR).filter(|v| !v.is_empty()) {
            log::debug!("Resources directory overridden to '{}'", dir);
            self.resources_dir = dir;
        }
        if let Some(ext) = lookup(ENV_LANGUAGE_EXT).filter(|v| !v.is_empty()) {
            log::debug!("Fixture language extension overridden to '{}'", ext);
            self.language_ext = ext;
        }
        self
    }

    /// Set the resources directory name
    pub fn with_resources_dir(mut self, dir: impl Into<String>) -> Self {
        self.resources_dir = dir.into();
        self
    }

    /// Set the source-language extension
    pub fn with_language_ext(mut self, ext: impl Into<String>) -> Self {
        self.language_ext = ext.into();
        self
    }

    /// Set the input and output base names
    pub fn with_base_names(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input_name = input.into();
        self.output_name = output.into();
        self
    }

    /// Base name for a fixture kind
    pub fn base_name(&self, kind: FixtureKind) -> &str {
        match kind {
            FixtureKind::Input => &self.input_name,
            FixtureKind::Output => &self.output_name,
        }
    }

    /// Full file name for a fixture kind, e.g. `Input.rs.test`
    pub fn file_name(&self, kind: FixtureKind) -> String {
        format!(
            "{}.{}.{}",
            self.base_name(kind),
            self.language_ext,
            self.marker_ext
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_file_names() {
        let config = HarnessConfig::default();
        assert_eq!(config.file_name(FixtureKind::Input), "Input.rs.test");
        assert_eq!(config.file_name(FixtureKind::Output), "Output.rs.test");
        assert_eq!(config.resources_dir, "Resources");
    }

    #[test]
    fn test_language_ext_changes_suffix() {
        let config = HarnessConfig::default().with_language_ext("swift");
        assert_eq!(config.file_name(FixtureKind::Input), "Input.swift.test");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_RESOURCES_DIR, "Fixtures"),
            (ENV_LANGUAGE_EXT, ""),
        ]);
        let config = HarnessConfig::default()
            .with_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.resources_dir, "Fixtures");
        // Empty override keeps the default
        assert_eq!(config.language_ext, "rs");
    }

    #[test]
    fn test_from_json_file_partial() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("macro-tester.json");
        std::fs::write(&path, r#"{"language_ext":"swift"}"#).unwrap();

        let config = HarnessConfig::from_json_file(&path).unwrap();
        assert_eq!(config.language_ext, "swift");
        assert_eq!(config.resources_dir, DEFAULT_RESOURCES_DIR);
        assert_eq!(config.input_name, DEFAULT_INPUT_NAME);
    }

    #[test]
    fn test_from_json_file_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("macro-tester.json");
        std::fs::write(&path, "not json").unwrap();

        let err = HarnessConfig::from_json_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
