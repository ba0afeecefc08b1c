// Shared helpers for macro_tester integration tests
//
// Provides a tiny `#name(args)` expander so the harness can be driven end
// to end, plus on-disk fixture helpers.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use macro_tester::{ExpandAndCompare, TransformationTable};

/// Rule applied to the argument text of one `#name(...)` invocation
pub type Rule = fn(&str) -> String;

/// `#stringify(a + b)` -> `(a + b, "a + b")`
pub fn stringify(args: &str) -> String {
    format!("({args}, \"{args}\")")
}

/// `#double(x)` -> `(x) * 2`
pub fn double(args: &str) -> String {
    format!("({args}) * 2")
}

/// Rules used by most tests
pub fn default_rules() -> TransformationTable<Rule> {
    TransformationTable::from([("stringify", stringify as Rule), ("double", double as Rule)])
}

/// Replace every `#name(args)` whose name is in `rules`.
///
/// Unknown names are left untouched. Arguments may not contain `)`.
pub fn expand(input: &str, rules: &TransformationTable<Rule>) -> Result<String> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('#') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let name_len = after
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let name = &after[..name_len];

        let Some(rule) = rules.get(name) else {
            output.push('#');
            rest = after;
            continue;
        };

        let Some(args) = after[name_len..].strip_prefix('(') else {
            bail!("#{} must be invoked with parentheses", name);
        };
        let Some(close) = args.find(')') else {
            bail!("Unterminated #{}( invocation", name);
        };

        output.push_str(&rule(&args[..close]));
        rest = &args[close + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

/// Engine driving [`expand`]
pub fn engine() -> ExpandAndCompare<Rule, fn(&str, &TransformationTable<Rule>) -> Result<String>> {
    ExpandAndCompare::new(expand as fn(&str, &TransformationTable<Rule>) -> Result<String>)
}

/// Write a case directory below `root/Resources`, returning the caller path
/// the harness should be given.
pub fn write_case(root: &Path, test: &str, input: Option<&str>, output: Option<&str>) -> PathBuf {
    let dir = root.join("Resources").join(test);
    fs::create_dir_all(&dir).unwrap();
    if let Some(input) = input {
        fs::write(dir.join("Input.rs.test"), input).unwrap();
    }
    if let Some(output) = output {
        fs::write(dir.join("Output.rs.test"), output).unwrap();
    }
    root.join("ExpandTests.rs")
}

/// Install env_logger once for the test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
