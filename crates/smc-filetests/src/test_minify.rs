//! The `minify` subtest - whole pipeline over a combined document
//!
//! Words after `test minify` adjust the default options: `aggressive`,
//! `keep-dead-code`, `keep-braces`, `no-merge`.

use smc_compiler::{compile, render_document, split_document, CompilerOptions};

use crate::parser::{check_output, parse_test_file, TestCase};

fn options_for(case: &TestCase) -> CompilerOptions {
    let mut options = CompilerOptions::default().line_separator("\n");
    for argument in case.arguments() {
        options = match argument {
            "aggressive" => options.aggressive(true),
            "keep-dead-code" => options.remove_dead_functions(false),
            "keep-braces" => options.reduce_braces(false),
            "no-merge" => options.merge_declarations(false),
            other => panic!("Unknown minify option: {}", other),
        };
    }
    options
}

/// Run tests from minify test files
#[allow(dead_code)]
pub fn run_tests_from_file(content: &str) {
    let test_cases = parse_test_file(content);

    assert!(!test_cases.is_empty(), "No test cases found in test file");

    for case in test_cases {
        assert!(
            case.command.starts_with("test minify"),
            "Unexpected test command: {}",
            case.command
        );
        let options = options_for(&case);
        let document = split_document(&case.source)
            .unwrap_or_else(|e| panic!("Test at line {} is not a document: {}", case.line, e));
        let program = compile(&document.vertex, &document.fragment, &options)
            .unwrap_or_else(|e| panic!("Compilation failed: {}\n\nSource:\n{}", e, case.source));

        let actual = render_document(&program, &options.line_separator);
        if let Err(message) = check_output(&case, &actual) {
            panic!("Minify test at line {} failed!\n\n{}", case.line, message);
        }
    }
}
