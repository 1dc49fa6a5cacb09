//! Shader minifying compiler.
//!
//! A [`Compiler`] runs dependency-ordered [`CompilerStep`]s over a
//! [`ShaderProgram`] (a vertex and a fragment syntax tree). The default
//! pipeline removes dead functions, merges declarations, strips redundant
//! braces and shortens identifiers consistently across both stages.

#![no_std]

extern crate alloc;

pub mod analysis;
mod compiler;
pub mod document;
mod error;
mod names;
mod options;
pub mod passes;
mod program;
mod step;

pub use compiler::{Compiler, Phase};
pub use document::{render_document, split_document, DocumentError, ShaderDocument};
pub use error::{CompileError, CompileResult};
pub use names::NameGenerator;
pub use options::CompilerOptions;
pub use program::{ShaderProgram, Stage};
pub use step::{CompilerStep, StepOutput, StepOutputs};

/// Parse, compile with the default pipeline for `options` and return the
/// compiled program.
pub fn compile(
    vertex_source: &str,
    fragment_source: &str,
    options: &CompilerOptions,
) -> CompileResult<ShaderProgram> {
    let program = ShaderProgram::parse(vertex_source, fragment_source)?;
    Compiler::with_options(options).compile_program(program)
}
