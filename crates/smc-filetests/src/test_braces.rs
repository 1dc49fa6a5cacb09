//! The `braces` subtest - redundant brace removal

use smc_ast::{parse, render, StartRule};
use smc_compiler::passes::BraceReducer;

use crate::parser::{check_output, parse_test_file};

/// Run tests from braces test files
#[allow(dead_code)]
pub fn run_tests_from_file(content: &str) {
    let test_cases = parse_test_file(content);

    assert!(!test_cases.is_empty(), "No test cases found in test file");

    for case in test_cases {
        assert_eq!(
            case.command, "test braces",
            "Unexpected test command: {}",
            case.command
        );
        let tree = parse(&case.source, StartRule::TranslationUnit)
            .unwrap_or_else(|e| panic!("Failed to parse: {}\n\nSource:\n{}", e, case.source));
        let (tree, _) = BraceReducer::reduce(&tree)
            .unwrap_or_else(|e| panic!("Brace reduction failed: {}", e));
        if let Err(message) = check_output(&case, &render(&tree, "\n")) {
            panic!("Braces test at line {} failed!\n\n{}", case.line, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braces_statements() {
        run_tests_from_file(include_str!("../filetests/braces/statements.glsl"));
    }
}
