//! Test file parsing

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use crate::filecheck::{has_filecheck_directives, match_filecheck};

/// One input of a test file with its expected output
#[derive(Debug, Clone)]
pub struct TestCase {
    /// The `test ...` header line
    pub command: String,
    /// Input text, without the expectation lines
    pub source: String,
    /// Expected output with the `;` prefixes stripped
    pub expected_text: String,
    /// 1-based line of the first input line
    pub line: usize,
}

impl TestCase {
    /// Words of the command after `test <name>`.
    pub fn arguments(&self) -> impl Iterator<Item = &str> {
        self.command.split_whitespace().skip(2)
    }
}

/// Split a test file into cases.
///
/// Every run of input lines followed by `;` lines is one case. Expectation
/// lines start with `;` in the first column, so an indented `;` stays an
/// empty statement of the input. Blank lines between expectation lines are
/// ignored; the next input line starts a new case. Inputs without
/// expectations are dropped.
pub fn parse_test_file(content: &str) -> Vec<TestCase> {
    let mut lines = content.lines().enumerate();

    let mut command = String::new();
    for (_, line) in lines.by_ref() {
        let trimmed = line.trim();
        if trimmed.starts_with("test ") {
            command = trimmed.to_string();
            break;
        }
    }

    let mut cases = Vec::new();
    let mut source: Vec<&str> = Vec::new();
    let mut expected: Vec<&str> = Vec::new();
    let mut start = 0;
    for (index, line) in lines {
        if let Some(rest) = line.strip_prefix(';') {
            expected.push(rest.strip_prefix(' ').unwrap_or(rest).trim_end());
            continue;
        }
        if line.trim().is_empty() && (source.is_empty() || !expected.is_empty()) {
            continue;
        }
        if !expected.is_empty() {
            cases.push(TestCase {
                command: command.clone(),
                source: source.join("\n"),
                expected_text: expected.join("\n"),
                line: start + 1,
            });
            source.clear();
            expected.clear();
        }
        if source.is_empty() {
            start = index;
        }
        source.push(line);
    }
    if !expected.is_empty() {
        cases.push(TestCase {
            command,
            source: source.join("\n"),
            expected_text: expected.join("\n"),
            line: start + 1,
        });
    }
    cases
}

/// Trimmed non-empty lines, for comparisons that ignore indentation.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| String::from(l.trim()))
        .filter(|l| !l.is_empty())
        .collect()
}

/// Compare `actual` against the case's expectation: filecheck directives if
/// the expectation has any, otherwise line-by-line text equality.
pub fn check_output(case: &TestCase, actual: &str) -> Result<(), String> {
    if has_filecheck_directives(&case.expected_text) {
        return match_filecheck(actual, &case.expected_text);
    }
    if normalize_lines(actual) == normalize_lines(&case.expected_text) {
        Ok(())
    } else {
        Err(alloc::format!(
            "Expected:\n{}\n\nActual:\n{}",
            case.expected_text, actual
        ))
    }
}
