//! Removal of functions unreachable from the entry point.

use alloc::{
    boxed::Box,
    collections::BTreeSet,
    string::{String, ToString},
    vec::Vec,
};

use smc_ast::{NodeRef, Tag, Transformer, TraversalResult};
use tracing::debug;

use crate::{
    analysis::{CallGraph, ENTRY_POINT, GLOBAL_SCOPE},
    error::CompileResult,
    program::{ShaderProgram, Stage},
    step::{CompilerStep, StepOutput, StepOutputs},
};

/// Deletes every function definition and prototype not reachable from
/// `main` or from a global initializer.
pub struct DeadFunctionRemover;

/// Names deleted by [`DeadFunctionRemover`], per stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedFunctions {
    pub vertex: Vec<String>,
    pub fragment: Vec<String>,
}

struct RemovalState {
    alive: BTreeSet<String>,
    removed: Vec<String>,
}

fn remove_if_dead(
    _transformer: &Transformer<RemovalState>,
    state: &mut RemovalState,
    node: &NodeRef,
) -> TraversalResult<Option<NodeRef>> {
    if state.alive.contains(node.value()) {
        return Ok(Some(node.clone()));
    }
    if !state.removed.iter().any(|name| name == node.value()) {
        state.removed.push(node.value().to_string());
    }
    Ok(None)
}

impl DeadFunctionRemover {
    /// Remove dead functions from one tree, returning the new tree and the
    /// removed names.
    pub fn remove(root: &NodeRef) -> CompileResult<(NodeRef, Vec<String>)> {
        let graph = CallGraph::build(root)?;
        let alive = graph.reachable_from(&[ENTRY_POINT, GLOBAL_SCOPE]);

        let transformer = Transformer::new()
            .on(Tag::FunctionDeclaration, remove_if_dead)
            .on(Tag::FunctionPrototype, remove_if_dead);
        let mut state = RemovalState {
            alive,
            removed: Vec::new(),
        };
        let root = transformer.apply(&mut state, root)?;
        Ok((root, state.removed))
    }
}

impl CompilerStep for DeadFunctionRemover {
    fn name(&self) -> &str {
        "DeadFunctionRemover"
    }

    fn perform_step(
        &self,
        _outputs: &StepOutputs,
        program: &mut ShaderProgram,
    ) -> CompileResult<StepOutput> {
        let mut output = RemovedFunctions::default();
        for stage in Stage::ALL {
            let (root, removed) = Self::remove(program.ast(stage))?;
            debug!("Removed {} dead functions from {} stage", removed.len(), stage);
            program.set_ast(stage, root);
            match stage {
                Stage::Vertex => output.vertex = removed,
                Stage::Fragment => output.fragment = removed,
            }
        }
        Ok(Some(Box::new(output)))
    }
}

#[cfg(test)]
mod tests {
    use smc_ast::{parse, render, StartRule};

    use super::*;

    fn remove(source: &str) -> (String, Vec<String>) {
        let root = parse(source, StartRule::TranslationUnit).unwrap();
        let (root, removed) = DeadFunctionRemover::remove(&root).unwrap();
        (render(&root, ""), removed)
    }

    #[test]
    fn test_unreachable_function_is_removed() {
        let (source, removed) = remove(
            "float unused(float x); float unused(float x) { return x; }
             float helper() { return 1.0; }
             void main() { gl_FragColor = vec4(helper()); }",
        );
        assert_eq!(removed, ["unused"]);
        assert_eq!(
            source,
            "float helper(){return 1.0;}void main(){gl_FragColor=vec4(helper());}"
        );
    }

    #[test]
    fn test_transitive_and_recursive_calls_survive() {
        let (_, removed) = remove(
            "int even(int n); int odd(int n) { return n == 0 ? 0 : even(n - 1); }
             int even(int n) { return n == 0 ? 1 : odd(n - 1); }
             int lonely(int n) { return lonely(n); }
             void main() { int r = even(4); }",
        );
        assert_eq!(removed, ["lonely"]);
    }

    #[test]
    fn test_global_initializer_keeps_callee() {
        let (source, removed) = remove("float seed() { return 0.5; } float k = seed();");
        assert!(removed.is_empty());
        assert!(source.starts_with("float seed()"));
    }

    #[test]
    fn test_nothing_to_remove_keeps_tree() {
        let root = parse("void main() {}", StartRule::TranslationUnit).unwrap();
        let (result, removed) = DeadFunctionRemover::remove(&root).unwrap();
        assert!(removed.is_empty());
        assert!(alloc::sync::Arc::ptr_eq(&root, &result));
    }
}
