//! The `dce` subtest - dead function removal

use smc_ast::{parse, render, StartRule};
use smc_compiler::passes::DeadFunctionRemover;

use crate::parser::{check_output, parse_test_file};

/// Run tests from dce test files
#[allow(dead_code)]
pub fn run_tests_from_file(content: &str) {
    let test_cases = parse_test_file(content);

    assert!(!test_cases.is_empty(), "No test cases found in test file");

    for case in test_cases {
        assert_eq!(
            case.command, "test dce",
            "Unexpected test command: {}",
            case.command
        );
        let tree = parse(&case.source, StartRule::TranslationUnit)
            .unwrap_or_else(|e| panic!("Failed to parse: {}\n\nSource:\n{}", e, case.source));
        let (tree, _) = DeadFunctionRemover::remove(&tree)
            .unwrap_or_else(|e| panic!("Dead function removal failed: {}", e));
        if let Err(message) = check_output(&case, &render(&tree, "\n")) {
            panic!("Dce test at line {} failed!\n\n{}", case.line, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dce_reachability() {
        run_tests_from_file(include_str!("../filetests/dce/reachability.glsl"));
    }
}
