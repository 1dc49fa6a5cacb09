//! File-based tests for the shader minifier.
//!
//! Test files under `filetests/` contain:
//! - A `test <command>` header line (`test cat`, `test dce`, `test braces`,
//!   `test merge`, `test minify`)
//! - GLSL inputs, or combined `//! VERTEX` / `//! FRAGMENT` documents for
//!   `test minify`
//! - Expected output after each input as `;`-prefixed lines, either the
//!   exact text or `filecheck` directives

#![no_std]

extern crate alloc;

pub mod filecheck;
pub mod parser;

mod test_braces;
mod test_cat;
mod test_dce;
mod test_merge;
mod test_minify;

pub use filecheck::{has_filecheck_directives, match_filecheck};
pub use parser::{check_output, parse_test_file, TestCase};
