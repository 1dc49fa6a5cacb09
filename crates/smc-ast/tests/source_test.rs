//! SourceTest helper for integration tests.
//!
//! Parses GLSL once and offers assertions over the rendered output.

#![allow(dead_code)]

extern crate alloc;

use alloc::string::String;

use smc_ast::{parse, render, NodeRef, ParseError, StartRule};

/// Test helper wrapping a parsed translation unit.
pub struct SourceTest {
    tree: NodeRef,
}

impl SourceTest {
    /// Parse `glsl` as a vertex shader.
    ///
    /// # Errors
    ///
    /// Returns `Err` if parsing fails.
    pub fn new(glsl: &str) -> Result<Self, ParseError> {
        Self::with_rule(glsl, StartRule::VertexShader)
    }

    pub fn with_rule(glsl: &str, rule: StartRule) -> Result<Self, ParseError> {
        Ok(Self {
            tree: parse(glsl, rule)?,
        })
    }

    pub fn tree(&self) -> &NodeRef {
        &self.tree
    }

    /// Compact output, no separator between declarations.
    pub fn compact(&self) -> String {
        render(&self.tree, "")
    }

    /// Assert the compact rendering equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics with both texts if the output differs.
    pub fn assert_renders(&self, expected: &str) {
        let actual = self.compact();
        if actual != expected {
            panic!(
                "Render mismatch:\n\nExpected:\n{}\n\nActual:\n{}\n",
                expected, actual
            );
        }
    }

    /// Assert that re-parsing the output renders the same text again.
    pub fn assert_round_trip(&self) {
        let first = self.compact();
        let reparsed = parse(&first, StartRule::TranslationUnit)
            .unwrap_or_else(|e| panic!("rendered output does not parse: {}\n{}", e, first));
        let second = render(&reparsed, "");
        assert_eq!(first, second, "render is not stable under re-parsing");
        assert!(
            self.tree.structurally_eq(&reparsed),
            "re-parsed tree differs from the original"
        );
    }
}
