//! Function renaming.

use alloc::{boxed::Box, collections::BTreeSet, string::String};

use smc_ast::{NodeRef, Tag, Transformer, TraversalResult};
use tracing::debug;

use crate::{
    analysis::SymbolCensus,
    error::{CompileError, CompileResult},
    names::NameGenerator,
    passes::{MinifyOutput, VariableMinifier},
    program::{ShaderProgram, Stage},
    step::{CompilerStep, StepOutput, StepOutputs},
};

/// Shortens user function names, continuing each stage's numbering from
/// where [`VariableMinifier`] stopped. `main` and any name that is also a
/// variable, struct or type keep their spelling.
pub struct FunctionMinifier;

struct RenameState {
    names: NameGenerator,
    functions: BTreeSet<String>,
}

fn allocate(state: &mut RenameState, node: &NodeRef) -> TraversalResult<()> {
    if state.functions.contains(node.value()) {
        state.names.shorten_symbol(node.value());
    }
    Ok(())
}

fn rename(
    transformer: &Transformer<RenameState>,
    state: &mut RenameState,
    node: &NodeRef,
) -> TraversalResult<Option<NodeRef>> {
    let rebuilt = transformer.transform_children(state, node)?;
    if !state.functions.contains(node.value()) {
        return Ok(Some(rebuilt));
    }
    let short = state.names.shorten_symbol(node.value());
    if rebuilt.value() == short {
        return Ok(Some(rebuilt));
    }
    Ok(Some(rebuilt.with_value(short)))
}

impl FunctionMinifier {
    pub const NAME: &'static str = "FunctionMinifier";

    fn minify_stage(
        root: &NodeRef,
        names: NameGenerator,
        functions: BTreeSet<String>,
    ) -> CompileResult<(NodeRef, NameGenerator)> {
        let transformer = Transformer::new()
            .before(Tag::FunctionDeclaration, allocate)
            .before(Tag::FunctionPrototype, allocate)
            .on(Tag::FunctionDeclaration, rename)
            .on(Tag::FunctionPrototype, rename)
            .on(Tag::FunctionCall, rename);

        let mut state = RenameState { names, functions };
        let root = transformer.apply(&mut state, root)?;
        Ok((root, state.names))
    }
}

impl CompilerStep for FunctionMinifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn dependencies(&self) -> &[&str] {
        &[VariableMinifier::NAME]
    }

    fn perform_step(
        &self,
        outputs: &StepOutputs,
        program: &mut ShaderProgram,
    ) -> CompileResult<StepOutput> {
        let variables = outputs
            .get::<MinifyOutput>(VariableMinifier::NAME)
            .ok_or_else(|| {
                CompileError::configuration("FunctionMinifier ran without VariableMinifier output")
            })?;

        let mut output = MinifyOutput::default();
        for stage in Stage::ALL {
            let census = SymbolCensus::collect(program.ast(stage))?;
            let functions = census.renamable_functions();
            let mut names = NameGenerator::with_start_index(variables.next_index(stage));
            for kept in census.kept_names(&functions) {
                names.reserve(kept.as_str());
            }

            let (root, names) = Self::minify_stage(program.ast(stage), names, functions)?;
            debug!(
                "Renamed {} functions in {} stage",
                names.mappings().len(),
                stage
            );
            program.set_ast(stage, root);
            output.record(stage, &names);
        }
        Ok(Some(Box::new(output)))
    }
}

#[cfg(test)]
mod tests {
    use smc_ast::{parse, StartRule};

    use super::*;

    fn program(vertex: &str, fragment: &str) -> ShaderProgram {
        ShaderProgram::new(
            parse(vertex, StartRule::VertexShader).unwrap(),
            parse(fragment, StartRule::FragmentShader).unwrap(),
        )
    }

    fn outputs_after_variables(program: &mut ShaderProgram) -> StepOutputs {
        let mut outputs = StepOutputs::new();
        let variables = VariableMinifier::new(false)
            .perform_step(&outputs, program)
            .unwrap();
        outputs.record(VariableMinifier::NAME, variables);
        outputs
    }

    #[test]
    fn test_functions_continue_variable_numbering() {
        let mut program = program(
            "float scaled(float v); float scaled(float v) { return v * 0.5; }
             void main() { gl_Position = vec4(scaled(1.0)); }",
            "void main() {}",
        );
        let outputs = outputs_after_variables(&mut program);
        let output = FunctionMinifier
            .perform_step(&outputs, &mut program)
            .unwrap()
            .unwrap();
        let output = output.downcast::<MinifyOutput>().unwrap();

        assert_eq!(
            program.render(Stage::Vertex, ""),
            "float b(float a);float b(float a){return a*0.5;}void main(){gl_Position=vec4(b(1.0));}"
        );
        assert_eq!(output.renamed[&Stage::Vertex]["scaled"], "b");
    }

    #[test]
    fn test_main_and_builtins_are_kept() {
        let mut program = program(
            "void main() { gl_Position = vec4(max(1.0, 2.0)); }",
            "void main() { gl_FragColor = vec4(1.0); }",
        );
        let outputs = outputs_after_variables(&mut program);
        FunctionMinifier
            .perform_step(&outputs, &mut program)
            .unwrap();
        assert_eq!(
            program.render(Stage::Vertex, ""),
            "void main(){gl_Position=vec4(max(1.0,2.0));}"
        );
    }

    #[test]
    fn test_requires_variable_output() {
        let mut program = program("void main() {}", "void main() {}");
        let err = FunctionMinifier
            .perform_step(&StepOutputs::new(), &mut program)
            .unwrap_err();
        assert!(matches!(err, CompileError::Configuration(_)));
    }
}
