//! Macro Tester Audit - fixture completeness checker
//!
//! Walks a source tree, finds every `Resources` directory and reports the
//! fixture cases missing their `Input` or `Output` file. Nothing is written.
//!
//! # Usage
//!
//! ```bash
//! # Audit the tests of the current crate
//! macro-tester-audit tests
//!
//! # Swift fixtures, machine-readable output
//! macro-tester-audit --language-ext swift --format json Tests/
//!
//! # List complete cases as well
//! macro-tester-audit --all
//! ```

mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use macro_tester::HarnessConfig;

use report::AuditReport;

/// Macro Tester Audit - fixture completeness checker
#[derive(Parser)]
#[command(name = "macro-tester-audit")]
#[command(about = "Reports macro test cases with missing Input/Output fixtures")]
#[command(version)]
struct Cli {
    /// Directory to scan
    #[arg(default_value = ".")]
    root: PathBuf,

    /// JSON file with a fixture layout configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the resources directory name
    #[arg(long)]
    resources_dir: Option<String>,

    /// Override the source-language extension
    #[arg(short, long)]
    language_ext: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// List complete cases too
    #[arg(short, long)]
    all: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl Cli {
    /// Layout from the config file (or environment), then flag overrides
    fn harness_config(&self) -> Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::from_json_file(path)?,
            None => HarnessConfig::from_env(),
        };
        if let Some(dir) = &self.resources_dir {
            config = config.with_resources_dir(dir.as_str());
        }
        if let Some(ext) = &self.language_ext {
            config = config.with_language_ext(ext.as_str());
        }
        Ok(config)
    }

    fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Run the audit, returning whether every case is complete
fn run(cli: &Cli) -> Result<bool> {
    let config = cli.harness_config()?;
    log::debug!("Fixture layout: {:?}", config);

    let report = AuditReport::scan(&cli.root, &config, cli.all)?;

    match cli.format {
        Format::Text => print!("{}", report.render_text(&config)),
        Format::Json => println!("{}", report.render_json()?),
    }

    Ok(report.is_clean())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["macro-tester-audit"]);
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(cli.format == Format::Text);
        assert!(!cli.all);
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_cli_flags_override_config_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("layout.json");
        fs::write(&config_path, r#"{"resources_dir": "Fixtures", "language_ext": "swift"}"#)
            .unwrap();

        let cli = Cli::parse_from([
            "macro-tester-audit",
            "--config",
            config_path.to_str().unwrap(),
            "--language-ext",
            "kt",
            "-vv",
        ]);
        let config = cli.harness_config().unwrap();
        assert_eq!(config.resources_dir, "Fixtures");
        assert_eq!(config.language_ext, "kt");
        assert_eq!(cli.log_filter(), "trace");
    }

    #[test]
    fn test_run_reports_incomplete_tree() {
        let temp = TempDir::new().unwrap();
        let case = temp.path().join("Resources/half");
        fs::create_dir_all(&case).unwrap();
        fs::write(case.join("Input.rs.test"), "x").unwrap();

        let cli = Cli::parse_from([
            "macro-tester-audit",
            "--resources-dir",
            "Resources",
            temp.path().to_str().unwrap(),
        ]);
        assert!(!run(&cli).unwrap());

        fs::write(case.join("Output.rs.test"), "x").unwrap();
        assert!(run(&cli).unwrap());
    }
}
