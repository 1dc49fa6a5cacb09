//! The vertex/fragment program pair a compilation works on.

use alloc::{collections::BTreeMap, string::String};
use core::fmt;

use smc_ast::{parse, render, NodeRef, StartRule};

use crate::error::{CompileError, CompileResult};

/// Shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    /// Both stages, in pipeline order.
    pub const ALL: [Stage; 2] = [Stage::Vertex, Stage::Fragment];

    /// Parser entry point for sources of this stage.
    pub fn start_rule(self) -> StartRule {
        match self {
            Stage::Vertex => StartRule::VertexShader,
            Stage::Fragment => StartRule::FragmentShader,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A linked pair of shaders plus free-form metadata steps may attach.
///
/// Steps replace the trees in place; the program is the only mutable state
/// of a compilation.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    pub vertex_ast: NodeRef,
    pub fragment_ast: NodeRef,
    pub metadata: BTreeMap<String, String>,
}

impl ShaderProgram {
    pub fn new(vertex_ast: NodeRef, fragment_ast: NodeRef) -> Self {
        Self {
            vertex_ast,
            fragment_ast,
            metadata: BTreeMap::new(),
        }
    }

    /// Parse both stages.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::Parse` naming the stage that failed.
    pub fn parse(vertex_source: &str, fragment_source: &str) -> CompileResult<Self> {
        let vertex_ast = parse(vertex_source, Stage::Vertex.start_rule())
            .map_err(|e| CompileError::parse(Stage::Vertex, e))?;
        let fragment_ast = parse(fragment_source, Stage::Fragment.start_rule())
            .map_err(|e| CompileError::parse(Stage::Fragment, e))?;
        Ok(Self::new(vertex_ast, fragment_ast))
    }

    pub fn ast(&self, stage: Stage) -> &NodeRef {
        match stage {
            Stage::Vertex => &self.vertex_ast,
            Stage::Fragment => &self.fragment_ast,
        }
    }

    pub fn set_ast(&mut self, stage: Stage, ast: NodeRef) {
        match stage {
            Stage::Vertex => self.vertex_ast = ast,
            Stage::Fragment => self.fragment_ast = ast,
        }
    }

    /// Render one stage back to source.
    pub fn render(&self, stage: Stage, line_separator: &str) -> String {
        render(self.ast(stage), line_separator)
    }
}
