//! Filecheck directive matching using the filecheck crate

use alloc::{format, string::String};

use filecheck::{Checker, CheckerBuilder, NO_VARIABLES};

const DIRECTIVES: &[&str] = &[
    "check:", "sameln:", "nextln:", "unordered:", "not:", "regex:",
];

/// Whether the expected text is written as filecheck directives.
pub fn has_filecheck_directives(expected_text: &str) -> bool {
    expected_text.lines().any(|line| {
        let trimmed = line.trim();
        DIRECTIVES.iter().any(|d| trimmed.starts_with(d))
    })
}

/// Build a filechecker from expected text containing directives
pub fn build_filechecker(expected_text: &str) -> Result<Checker, String> {
    let mut builder = CheckerBuilder::new();
    for line in expected_text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        builder
            .directive(trimmed)
            .map_err(|e| format!("Failed to parse filecheck directive '{}': {}", trimmed, e))?;
    }
    Ok(builder.finish())
}

/// Match actual output against filecheck directives
pub fn match_filecheck(actual: &str, expected_text: &str) -> Result<(), String> {
    let checker = build_filechecker(expected_text)?;

    if checker
        .check(actual, NO_VARIABLES)
        .map_err(|e| format!("Filecheck error: {}", e))?
    {
        Ok(())
    } else {
        let (_, explain) = checker
            .explain(actual, NO_VARIABLES)
            .map_err(|e| format!("Failed to get filecheck explanation: {}", e))?;
        Err(format!("Filecheck failed:\n{}", explain))
    }
}
