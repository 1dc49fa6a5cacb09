//! Error types for the compiler pipeline.

use alloc::{string::String, vec::Vec};

use smc_ast::{ParseError, TraversalError};
use thiserror::Error;

use crate::program::Stage;

/// Result type for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// Error that can occur while compiling a shader program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Malformed shader source
    #[error("{stage} shader: {error}")]
    Parse { stage: Stage, error: ParseError },

    /// Step dependencies form a cycle; `path` lists it as `a->b->a`
    #[error("dependency cycle between compiler steps: {path}")]
    SchedulingCycle { path: String },

    /// Pipeline wiring defect (unknown or misplaced dependency, duplicate
    /// step name)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Traversal wiring defect
    #[error(transparent)]
    Traversal(#[from] TraversalError),
}

impl CompileError {
    /// Create a new parse error for one stage.
    pub fn parse(stage: Stage, error: ParseError) -> Self {
        CompileError::Parse { stage, error }
    }

    /// Create a new configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        CompileError::Configuration(msg.into())
    }

    /// Create a cycle error from the step names along the cycle.
    pub fn cycle<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = names.into_iter().collect();
        CompileError::SchedulingCycle {
            path: names.join("->"),
        }
    }
}
