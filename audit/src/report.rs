//! Audit report over every fixture case below a root directory.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use macro_tester::{discover_cases, find_resource_dirs, FixtureKind, HarnessConfig};
use serde::Serialize;

/// One fixture case as listed in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    /// Case name
    pub name: String,
    /// Case directory
    pub dir: PathBuf,
    /// Fixture kinds the case lacks
    pub missing: Vec<FixtureKind>,
}

impl AuditEntry {
    /// Both fixtures are present
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Result of auditing one source tree
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    /// Directory the scan started from
    pub root: PathBuf,
    /// Resources directories found
    pub resources_dirs: Vec<PathBuf>,
    /// Number of cases scanned
    pub total_cases: usize,
    /// Number of cases missing at least one fixture
    pub incomplete_cases: usize,
    /// Listed cases: incomplete ones, or all when requested
    pub entries: Vec<AuditEntry>,
}

impl AuditReport {
    /// Scan `root` for fixture cases.
    ///
    /// Complete cases are only listed when `include_complete` is set; they
    /// are always counted.
    pub fn scan(root: &Path, config: &HarnessConfig, include_complete: bool) -> Result<Self> {
        let resources_dirs = find_resource_dirs(root, config)
            .with_context(|| format!("Failed to scan {}", root.display()))?;

        let mut total_cases = 0;
        let mut incomplete_cases = 0;
        let mut entries = Vec::new();

        for dir in &resources_dirs {
            let cases = discover_cases(dir, config)
                .with_context(|| format!("Failed to list cases in {}", dir.display()))?;
            log::debug!("{}: {} case(s)", dir.display(), cases.len());

            for case in cases {
                total_cases += 1;
                if !case.is_complete() {
                    incomplete_cases += 1;
                } else if !include_complete {
                    continue;
                }
                entries.push(AuditEntry {
                    missing: case.missing(),
                    name: case.name.into_string(),
                    dir: case.dir,
                });
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            resources_dirs,
            total_cases,
            incomplete_cases,
            entries,
        })
    }

    /// No case lacks a fixture
    pub fn is_clean(&self) -> bool {
        self.incomplete_cases == 0
    }

    /// Human-readable listing
    pub fn render_text(&self, config: &HarnessConfig) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            if entry.is_complete() {
                let _ = writeln!(out, "ok       {}", entry.dir.display());
                continue;
            }
            let missing: Vec<String> = entry
                .missing
                .iter()
                .map(|kind| config.file_name(*kind))
                .collect();
            let _ = writeln!(
                out,
                "missing  {} ({})",
                entry.dir.display(),
                missing.join(", ")
            );
        }
        let _ = writeln!(
            out,
            "{} case(s) in {} resources dir(s), {} incomplete",
            self.total_cases,
            self.resources_dirs.len(),
            self.incomplete_cases
        );
        out
    }

    /// Pretty-printed JSON
    pub fn render_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize audit report")
    }
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

    fn tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("tests/Resources/complete/Input.rs.test"));
        touch(&temp.path().join("tests/Resources/complete/Output.rs.test"));
        touch(&temp.path().join("tests/Resources/no_output/Input.rs.test"));
        fs::create_dir_all(temp.path().join("tests/ui/Resources/empty")).unwrap();
        temp
    }

    #[test]
    fn test_scan_lists_incomplete_only() {
        let temp = tree();
        let report = AuditReport::scan(temp.path(), &HarnessConfig::default(), false).unwrap();

        assert_eq!(report.resources_dirs.len(), 2);
        assert_eq!(report.total_cases, 3);
        assert_eq!(report.incomplete_cases, 2);
        assert!(!report.is_clean());

        let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["no_output", "empty"]);
        assert_eq!(report.entries[0].missing, vec![FixtureKind::Output]);
        assert_eq!(
            report.entries[1].missing,
            vec![FixtureKind::Input, FixtureKind::Output]
        );
    }

    #[test]
    fn test_scan_all_includes_complete() {
        let temp = tree();
        let report = AuditReport::scan(temp.path(), &HarnessConfig::default(), true).unwrap();
        assert_eq!(report.entries.len(), 3);
        assert!(report.entries.iter().any(|e| e.name == "complete" && e.is_complete()));
    }

    #[test]
    fn test_clean_tree() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("Resources/a/Input.rs.test"));
        touch(&temp.path().join("Resources/a/Output.rs.test"));

        let report = AuditReport::scan(temp.path(), &HarnessConfig::default(), false).unwrap();
        assert!(report.is_clean());
        assert!(report.entries.is_empty());
        assert_eq!(
            report.render_text(&HarnessConfig::default()),
            "1 case(s) in 1 resources dir(s), 0 incomplete\n"
        );
    }

    #[test]
    fn test_render_text_names_missing_files() {
        let temp = tree();
        let config = HarnessConfig::default();
        let text = AuditReport::scan(temp.path(), &config, false)
            .unwrap()
            .render_text(&config);

        assert!(text.contains("no_output (Output.rs.test)"));
        assert!(text.contains("empty (Input.rs.test, Output.rs.test)"));
        assert!(text.ends_with("3 case(s) in 2 resources dir(s), 2 incomplete\n"));
    }

    #[test]
    fn test_render_json() {
        let temp = tree();
        let report = AuditReport::scan(temp.path(), &HarnessConfig::default(), false).unwrap();
        let json: serde_json::Value = serde_json::from_str(&report.render_json().unwrap()).unwrap();

        assert_eq!(json["incomplete_cases"], 2);
        assert_eq!(json["entries"][0]["name"], "no_output");
        assert_eq!(json["entries"][0]["missing"][0], "output");
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let err = AuditReport::scan(&temp.path().join("absent"), &HarnessConfig::default(), false)
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to scan"));
    }
}
