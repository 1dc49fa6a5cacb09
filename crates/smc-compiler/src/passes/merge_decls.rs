//! Merging of adjacent declarations.

use alloc::{boxed::Box, vec::Vec};

use smc_ast::{NodeRef, Slot, Tag, Transformer, TraversalResult};
use tracing::debug;

use crate::{
    error::CompileResult,
    program::{ShaderProgram, Stage},
    step::{CompilerStep, StepOutput, StepOutputs},
};

/// Joins consecutive declarations of the same qualified plain type:
/// `uniform float a; uniform float b;` becomes `uniform float a,b;`.
/// Publishes the number of declarations merged away.
pub struct DeclarationMerger;

#[derive(Default)]
struct MergeState {
    merged: usize,
}

/// Whether `second` can be appended to `first`.
fn mergeable(first: &NodeRef, second: &NodeRef) -> bool {
    let plain = |node: &NodeRef| {
        node.tag() == Tag::Declaration
            && !node.list(1).is_empty()
            && node.child(0).is_some_and(|ty| ty.tag() == Tag::TypeName)
    };
    plain(first)
        && plain(second)
        && first.qualifiers() == second.qualifiers()
        && first.child(0).map(|ty| ty.value()) == second.child(0).map(|ty| ty.value())
}

fn merge_list(
    transformer: &Transformer<MergeState>,
    state: &mut MergeState,
    node: &NodeRef,
) -> TraversalResult<Option<NodeRef>> {
    let rebuilt = transformer.transform_children(state, node)?;
    let items = rebuilt.list(0);
    if !items.windows(2).any(|pair| mergeable(&pair[0], &pair[1])) {
        return Ok(Some(rebuilt));
    }

    let mut merged: Vec<NodeRef> = Vec::with_capacity(items.len());
    for item in items {
        match merged.last_mut() {
            Some(last) if mergeable(last, item) => {
                let declarators = last.list(1).iter().chain(item.list(1)).cloned().collect();
                *last = last.with_slot(1, Slot::List(declarators));
                state.merged += 1;
            }
            _ => merged.push(item.clone()),
        }
    }
    Ok(Some(rebuilt.with_slot(0, Slot::List(merged))))
}

impl DeclarationMerger {
    /// Merge declarations in one tree, returning the new tree and the number
    /// of declarations merged into a predecessor.
    pub fn merge(root: &NodeRef) -> CompileResult<(NodeRef, usize)> {
        let transformer = Transformer::new()
            .on(Tag::TranslationUnit, merge_list)
            .on(Tag::Scope, merge_list);

        let mut state = MergeState::default();
        let root = transformer.apply(&mut state, root)?;
        Ok((root, state.merged))
    }
}

impl CompilerStep for DeclarationMerger {
    fn name(&self) -> &str {
        "DeclarationMerger"
    }

    fn perform_step(
        &self,
        _outputs: &StepOutputs,
        program: &mut ShaderProgram,
    ) -> CompileResult<StepOutput> {
        let mut total = 0;
        for stage in Stage::ALL {
            let (root, merged) = Self::merge(program.ast(stage))?;
            debug!("Merged {} declarations in {} stage", merged, stage);
            program.set_ast(stage, root);
            total += merged;
        }
        Ok(Some(Box::new(total)))
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, sync::Arc};

    use smc_ast::{parse, render, StartRule};

    use super::*;

    fn merge(source: &str) -> (String, usize) {
        let root = parse(source, StartRule::TranslationUnit).unwrap();
        let (root, merged) = DeclarationMerger::merge(&root).unwrap();
        (render(&root, ""), merged)
    }

    #[test]
    fn test_globals_with_same_qualifiers() {
        let (out, merged) = merge("uniform float a; uniform float b; uniform vec2 c; float d;");
        assert_eq!(out, "uniform float a,b;uniform vec2 c;float d;");
        assert_eq!(merged, 1);
    }

    #[test]
    fn test_locals_keep_initializers_in_order() {
        let (out, merged) =
            merge("void main() { float a = 1.0; float b = a; float c[2]; int i; }");
        assert_eq!(out, "void main(){float a=1.0,b=a,c[2];int i;}");
        assert_eq!(merged, 2);
    }

    #[test]
    fn test_only_adjacent_declarations_merge() {
        let (out, merged) = merge("void main() { float a; a = 1.0; float b; }");
        assert_eq!(out, "void main(){float a;a=1.0;float b;}");
        assert_eq!(merged, 0);
    }

    #[test]
    fn test_structs_are_not_merged() {
        let (out, merged) = merge("struct S { float x; }; struct T { float y; };");
        assert_eq!(out, "struct S{float x;};struct T{float y;};");
        assert_eq!(merged, 0);
    }

    #[test]
    fn test_unchanged_tree_keeps_identity() {
        let root = parse("float a; int b;", StartRule::TranslationUnit).unwrap();
        let (merged, count) = DeclarationMerger::merge(&root).unwrap();
        assert!(Arc::ptr_eq(&root, &merged));
        assert_eq!(count, 0);
    }
}
