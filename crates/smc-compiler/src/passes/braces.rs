//! Removal of redundant braces.

use alloc::{boxed::Box, sync::Arc, vec, vec::Vec};

use smc_ast::{build, NodeRef, Slot, Tag, Transformer, TraversalResult};
use tracing::debug;

use crate::{
    error::CompileResult,
    program::{ShaderProgram, Stage},
    step::{CompilerStep, StepOutput, StepOutputs},
};

/// Unwraps single-statement loop and `if` bodies and splices nested blocks
/// without declarations into the enclosing block. Publishes the number of
/// removed brace pairs.
pub struct BraceReducer;

#[derive(Default)]
struct ReduceState {
    reduced: usize,
}

/// Whether rendering `node` without braces would leave an `if` that a
/// following `else` binds to.
fn ends_with_open_if(node: &NodeRef) -> bool {
    match node.tag() {
        Tag::If => match node.child(2) {
            None => true,
            Some(else_branch) => ends_with_open_if(else_branch),
        },
        Tag::For => node.child(3).is_some_and(ends_with_open_if),
        Tag::While => node.child(1).is_some_and(ends_with_open_if),
        _ => false,
    }
}

/// Statement replacing the block `body`, or `body` itself.
fn unwrap_block(state: &mut ReduceState, body: &NodeRef) -> NodeRef {
    if body.tag() != Tag::Scope {
        return body.clone();
    }
    match body.list(0) {
        [] => {
            state.reduced += 1;
            build::expression_statement(None)
        }
        [single] if !matches!(single.tag(), Tag::Declaration | Tag::Preprocessor) => {
            state.reduced += 1;
            single.clone()
        }
        _ => body.clone(),
    }
}

fn replace_slot(node: NodeRef, index: usize, old: &NodeRef, new: NodeRef) -> NodeRef {
    if Arc::ptr_eq(old, &new) {
        node
    } else {
        node.with_slot(index, Slot::some(new))
    }
}

fn reduce_loop(
    transformer: &Transformer<ReduceState>,
    state: &mut ReduceState,
    node: &NodeRef,
) -> TraversalResult<Option<NodeRef>> {
    let rebuilt = transformer.transform_children(state, node)?;
    let index = match rebuilt.tag() {
        Tag::For => 3,
        Tag::While => 1,
        _ => 0,
    };
    let Some(body) = rebuilt.child(index).cloned() else {
        return Ok(Some(rebuilt));
    };
    let unwrapped = unwrap_block(state, &body);
    Ok(Some(replace_slot(rebuilt, index, &body, unwrapped)))
}

fn reduce_if(
    transformer: &Transformer<ReduceState>,
    state: &mut ReduceState,
    node: &NodeRef,
) -> TraversalResult<Option<NodeRef>> {
    let mut rebuilt = transformer.transform_children(state, node)?;
    let has_else = rebuilt.child(2).is_some();

    if let Some(then_branch) = rebuilt.child(1).cloned() {
        let mut candidate = unwrap_block(state, &then_branch);
        if has_else && ends_with_open_if(&candidate) {
            if then_branch.tag() == Tag::Scope {
                if !Arc::ptr_eq(&candidate, &then_branch) {
                    state.reduced -= 1;
                }
                candidate = then_branch.clone();
            } else {
                candidate = build::scope(vec![then_branch.clone()]);
            }
        }
        rebuilt = replace_slot(rebuilt, 1, &then_branch, candidate);
    }

    if let Some(else_branch) = rebuilt.child(2).cloned() {
        let unwrapped = unwrap_block(state, &else_branch);
        rebuilt = replace_slot(rebuilt, 2, &else_branch, unwrapped);
    }
    Ok(Some(rebuilt))
}

fn splice_scopes(
    transformer: &Transformer<ReduceState>,
    state: &mut ReduceState,
    node: &NodeRef,
) -> TraversalResult<Option<NodeRef>> {
    let rebuilt = transformer.transform_children(state, node)?;
    let statements = rebuilt.list(0);
    let splices = |statement: &NodeRef| {
        statement.tag() == Tag::Scope
            && !statement
                .list(0)
                .iter()
                .any(|inner| inner.tag() == Tag::Declaration)
    };
    if !statements.iter().any(splices) {
        return Ok(Some(rebuilt));
    }

    let mut spliced = Vec::with_capacity(statements.len());
    for statement in statements {
        if splices(statement) {
            state.reduced += 1;
            spliced.extend(statement.list(0).iter().cloned());
        } else {
            spliced.push(statement.clone());
        }
    }
    Ok(Some(rebuilt.with_slot(0, Slot::List(spliced))))
}

impl BraceReducer {
    /// Reduce braces in one tree, returning the new tree and the number of
    /// brace pairs removed.
    pub fn reduce(root: &NodeRef) -> CompileResult<(NodeRef, usize)> {
        let transformer = Transformer::new()
            .on(Tag::For, reduce_loop)
            .on(Tag::While, reduce_loop)
            .on(Tag::DoWhile, reduce_loop)
            .on(Tag::If, reduce_if)
            .on(Tag::Scope, splice_scopes);

        let mut state = ReduceState::default();
        let root = transformer.apply(&mut state, root)?;
        Ok((root, state.reduced))
    }
}

impl CompilerStep for BraceReducer {
    fn name(&self) -> &str {
        "BraceReducer"
    }

    fn perform_step(
        &self,
        _outputs: &StepOutputs,
        program: &mut ShaderProgram,
    ) -> CompileResult<StepOutput> {
        let mut total = 0;
        for stage in Stage::ALL {
            let (root, reduced) = Self::reduce(program.ast(stage))?;
            debug!("Removed {} brace pairs in {} stage", reduced, stage);
            program.set_ast(stage, root);
            total += reduced;
        }
        Ok(Some(Box::new(total)))
    }
}

#[cfg(test)]
mod tests {
    use smc_ast::{parse, render, StartRule};

    use super::*;

    fn reduce(source: &str) -> (alloc::string::String, usize) {
        let root = parse(source, StartRule::TranslationUnit).unwrap();
        let (root, reduced) = BraceReducer::reduce(&root).unwrap();
        (render(&root, ""), reduced)
    }

    #[test]
    fn test_single_statement_bodies() {
        let (out, reduced) = reduce(
            "void main() { for (int i = 0; i < 4; i++) { x += 1.0; } while (x > 0.0) { x -= 1.0; } }",
        );
        assert_eq!(out, "void main(){for(int i=0;i<4;i++)x+=1.0;while(x>0.0)x-=1.0;}");
        assert_eq!(reduced, 2);
    }

    #[test]
    fn test_do_while_and_empty_bodies() {
        let (out, _) = reduce("void main() { do { x++; } while (x < 3); while (f()) {} }");
        assert_eq!(out, "void main(){do x++;while(x<3);while(f());}");
    }

    #[test]
    fn test_declaration_keeps_braces() {
        let (out, reduced) = reduce("void main() { if (c) { float y = 1.0; } }");
        assert_eq!(out, "void main(){if(c){float y=1.0;}}");
        assert_eq!(reduced, 0);
    }

    #[test]
    fn test_function_body_is_kept() {
        let (out, _) = reduce("void f() { return; }");
        assert_eq!(out, "void f(){return;}");
    }

    #[test]
    fn test_dangling_else_is_preserved() {
        let (out, _) = reduce("void main() { if (a) { if (b) x = 1.0; } else { x = 2.0; } }");
        assert_eq!(out, "void main(){if(a){if(b)x=1.0;}else x=2.0;}");

        let (out, _) = reduce("void main() { if (a) { for (;;) { if (b) break; } } else { x = 2.0; } }");
        assert_eq!(out, "void main(){if(a){for(;;)if(b)break;}else x=2.0;}");
    }

    #[test]
    fn test_closed_if_in_then_arm_is_unwrapped() {
        let (out, _) = reduce(
            "void main() { if (a) { if (b) x = 1.0; else x = 3.0; } else { x = 2.0; } }",
        );
        assert_eq!(out, "void main(){if(a)if(b)x=1.0;else x=3.0;else x=2.0;}");
    }

    #[test]
    fn test_nested_scopes_are_spliced() {
        let (out, reduced) = reduce("void main() { x = 1.0; { x = 2.0; { y = x; } } {} }");
        assert_eq!(out, "void main(){x=1.0;x=2.0;y=x;}");
        assert_eq!(reduced, 3);

        let (out, _) = reduce("void main() { { float x = 2.0; } }");
        assert_eq!(out, "void main(){{float x=2.0;}}");
    }

    #[test]
    fn test_unchanged_tree_keeps_identity() {
        let root = parse("void main() { x = 1.0; }", StartRule::TranslationUnit).unwrap();
        let (reduced, count) = BraceReducer::reduce(&root).unwrap();
        assert!(Arc::ptr_eq(&root, &reduced));
        assert_eq!(count, 0);
    }
}
