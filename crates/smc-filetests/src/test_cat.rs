//! The `cat` subtest - parse/render roundtrip tests

use alloc::string::String;

use smc_ast::{parse, render, StartRule};

use crate::parser::{check_output, parse_test_file};

/// Run tests from cat test files
#[allow(dead_code)]
pub fn run_tests_from_file(content: &str) {
    let test_cases = parse_test_file(content);

    assert!(!test_cases.is_empty(), "No test cases found in test file");

    for case in test_cases {
        assert_eq!(
            case.command, "test cat",
            "Unexpected test command: {}",
            case.command
        );
        let actual = run_cat(&case.source);
        if let Err(message) = check_output(&case, &actual) {
            panic!("Cat test at line {} failed!\n\n{}", case.line, message);
        }
    }
}

/// Parse and render, then check the output renders identically again
fn run_cat(source: &str) -> String {
    let tree = parse(source, StartRule::TranslationUnit)
        .unwrap_or_else(|e| panic!("Failed to parse: {}\n\nSource:\n{}", e, source));
    let actual = render(&tree, "\n");

    let reparsed = parse(&actual, StartRule::TranslationUnit)
        .unwrap_or_else(|e| panic!("Rendered output does not parse: {}\n\n{}", e, actual));
    assert_eq!(
        render(&reparsed, "\n"),
        actual,
        "Render is not stable under re-parsing"
    );
    actual
}
