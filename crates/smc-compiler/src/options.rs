//! Pipeline configuration.

use alloc::string::{String, ToString};

/// Options selecting which steps the default pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Also rename globals visible to the host (uniforms, attributes,
    /// varyings, global `in`/`out`)
    pub aggressive: bool,
    pub remove_dead_functions: bool,
    pub merge_declarations: bool,
    pub reduce_braces: bool,
    /// Rename variables and functions
    pub minify: bool,
    /// Written after every top-level declaration when rendering
    pub line_separator: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            aggressive: false,
            remove_dead_functions: true,
            merge_declarations: true,
            reduce_braces: true,
            minify: true,
            line_separator: String::new(),
        }
    }
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aggressive(mut self, aggressive: bool) -> Self {
        self.aggressive = aggressive;
        self
    }

    pub fn remove_dead_functions(mut self, enabled: bool) -> Self {
        self.remove_dead_functions = enabled;
        self
    }

    pub fn merge_declarations(mut self, enabled: bool) -> Self {
        self.merge_declarations = enabled;
        self
    }

    pub fn reduce_braces(mut self, enabled: bool) -> Self {
        self.reduce_braces = enabled;
        self
    }

    pub fn minify(mut self, enabled: bool) -> Self {
        self.minify = enabled;
        self
    }

    pub fn line_separator(mut self, separator: &str) -> Self {
        self.line_separator = separator.to_string();
        self
    }
}
