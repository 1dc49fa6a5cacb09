//! Variable and struct renaming.

use alloc::{
    boxed::Box,
    collections::{BTreeMap, BTreeSet},
    string::String,
};

use smc_ast::{NodeRef, Tag, Transformer, TraversalResult};
use tracing::debug;

use crate::{
    analysis::SymbolCensus,
    error::CompileResult,
    names::NameGenerator,
    program::{ShaderProgram, Stage},
    step::{CompilerStep, StepOutput, StepOutputs},
};

/// Published by the minifiers: where each stage's name generator stopped
/// and what it renamed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinifyOutput {
    pub vertex_next_index: usize,
    pub fragment_next_index: usize,
    /// Original to short name, per stage
    pub renamed: BTreeMap<Stage, BTreeMap<String, String>>,
}

impl MinifyOutput {
    pub fn next_index(&self, stage: Stage) -> usize {
        match stage {
            Stage::Vertex => self.vertex_next_index,
            Stage::Fragment => self.fragment_next_index,
        }
    }

    pub(crate) fn record(&mut self, stage: Stage, names: &NameGenerator) {
        match stage {
            Stage::Vertex => self.vertex_next_index = names.next_index(),
            Stage::Fragment => self.fragment_next_index = names.next_index(),
        }
        self.renamed.insert(stage, names.mappings().clone());
    }
}

/// Shortens local and global variables, parameters and struct type names.
///
/// Globals visible to the host (uniforms, attributes, varyings, global
/// `in`/`out`) and the structs typing them keep their names unless the
/// minifier is aggressive; then they are renamed identically in both stages.
/// Fragment names continue from the index the vertex stage stopped at.
pub struct VariableMinifier {
    aggressive: bool,
}

struct RenameState {
    names: NameGenerator,
    variables: BTreeSet<String>,
    structs: BTreeSet<String>,
    struct_depth: usize,
}

impl RenameState {
    /// Struct members live in their own namespace; everything else that
    /// names a renamed variable follows it, array sizes in members included.
    fn renames_variable(&self, node: &NodeRef) -> bool {
        (node.tag() != Tag::Declarator || self.struct_depth == 0)
            && self.variables.contains(node.value())
    }
}

/// `node` with `value` replaced, cloned only if the name changes.
fn with_name(node: NodeRef, name: &str) -> NodeRef {
    if node.value() == name {
        node
    } else {
        node.with_value(name)
    }
}

fn enter_struct(state: &mut RenameState, node: &NodeRef) -> TraversalResult<()> {
    if state.structs.contains(node.value()) {
        state.names.shorten_definition(node.value());
    }
    state.struct_depth += 1;
    Ok(())
}

fn leave_struct(state: &mut RenameState, _node: &NodeRef) -> TraversalResult<()> {
    state.struct_depth -= 1;
    Ok(())
}

fn allocate_variable(state: &mut RenameState, node: &NodeRef) -> TraversalResult<()> {
    if state.renames_variable(node) {
        state.names.shorten_symbol(node.value());
    }
    Ok(())
}

fn rename_variable(
    transformer: &Transformer<RenameState>,
    state: &mut RenameState,
    node: &NodeRef,
) -> TraversalResult<Option<NodeRef>> {
    let rebuilt = transformer.transform_children(state, node)?;
    if !state.renames_variable(node) {
        return Ok(Some(rebuilt));
    }
    let short = state.names.shorten_symbol(node.value());
    Ok(Some(with_name(rebuilt, &short)))
}

fn rename_struct_reference(
    transformer: &Transformer<RenameState>,
    state: &mut RenameState,
    node: &NodeRef,
) -> TraversalResult<Option<NodeRef>> {
    let rebuilt = transformer.transform_children(state, node)?;
    if !state.structs.contains(node.value()) {
        return Ok(Some(rebuilt));
    }
    let short = state.names.shorten_definition(node.value());
    Ok(Some(with_name(rebuilt, &short)))
}

impl VariableMinifier {
    pub const NAME: &'static str = "VariableMinifier";

    pub fn new(aggressive: bool) -> Self {
        Self { aggressive }
    }

    /// Rename `variables` and `structs` in one tree.
    fn minify_stage(
        root: &NodeRef,
        names: NameGenerator,
        variables: BTreeSet<String>,
        structs: BTreeSet<String>,
    ) -> CompileResult<(NodeRef, NameGenerator)> {
        let transformer = Transformer::new()
            .before(Tag::StructDefinition, enter_struct)
            .after(Tag::StructDefinition, leave_struct)
            .before(Tag::Declarator, allocate_variable)
            .before(Tag::Parameter, allocate_variable)
            .on(Tag::Declarator, rename_variable)
            .on(Tag::Parameter, rename_variable)
            .on(Tag::Identifier, rename_variable)
            .on(Tag::StructDefinition, rename_struct_reference)
            .on(Tag::TypeName, rename_struct_reference)
            .on(Tag::FunctionCall, rename_struct_reference);

        let mut state = RenameState {
            names,
            variables,
            structs,
            struct_depth: 0,
        };
        let root = transformer.apply(&mut state, root)?;
        Ok((root, state.names))
    }
}

impl CompilerStep for VariableMinifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn perform_step(
        &self,
        _outputs: &StepOutputs,
        program: &mut ShaderProgram,
    ) -> CompileResult<StepOutput> {
        let vertex = SymbolCensus::collect(&program.vertex_ast)?;
        let fragment = SymbolCensus::collect(&program.fragment_ast)?;
        let mut vertex_variables = vertex.renamable_variables(self.aggressive);
        let mut fragment_variables = fragment.renamable_variables(self.aggressive);

        // An interface name pinned in one stage stays pinned in both.
        let pinned_exports: BTreeSet<String> = vertex
            .interface
            .iter()
            .filter(|name| !vertex_variables.contains(*name))
            .chain(
                fragment
                    .interface
                    .iter()
                    .filter(|name| !fragment_variables.contains(*name)),
            )
            .cloned()
            .collect();
        vertex_variables.retain(|name| !pinned_exports.contains(name));
        fragment_variables.retain(|name| !pinned_exports.contains(name));

        // Uniforms match across stages by type, struct names included.
        let mut vertex_structs = vertex.renamable_structs();
        let mut fragment_structs = fragment.renamable_structs();
        let interface_structs: BTreeSet<String> = vertex
            .interface_structs()
            .union(&fragment.interface_structs())
            .cloned()
            .collect();
        let pinned_structs: BTreeSet<String> = interface_structs
            .iter()
            .filter(|name| {
                !self.aggressive
                    || (vertex.structs.contains(*name) && !vertex_structs.contains(*name))
                    || (fragment.structs.contains(*name) && !fragment_structs.contains(*name))
            })
            .cloned()
            .collect();
        vertex_structs.retain(|name| !pinned_structs.contains(name));
        fragment_structs.retain(|name| !pinned_structs.contains(name));

        let mut output = MinifyOutput::default();
        let mut start_index = 0;
        let mut exports: BTreeMap<String, String> = BTreeMap::new();
        for (stage, census, variables, structs) in [
            (Stage::Vertex, &vertex, vertex_variables, vertex_structs),
            (Stage::Fragment, &fragment, fragment_variables, fragment_structs),
        ] {
            let mut names = NameGenerator::with_start_index(start_index);
            for (original, short) in &exports {
                if variables.contains(original) || structs.contains(original) {
                    names.assign(original, short);
                }
            }
            let renamed: BTreeSet<String> = variables.union(&structs).cloned().collect();
            for kept in vertex.kept_names(&renamed).chain(fragment.kept_names(&renamed)) {
                names.reserve(kept.as_str());
            }

            let (root, names) =
                Self::minify_stage(program.ast(stage), names, variables, structs)?;
            debug!(
                "Renamed {} symbols in {} stage",
                names.mappings().len(),
                stage
            );
            program.set_ast(stage, root);

            for name in census.interface.iter().chain(&interface_structs) {
                if let Some(short) = names.mappings().get(name) {
                    exports.insert(name.clone(), short.clone());
                }
            }
            start_index = names.next_index();
            output.record(stage, &names);
        }
        Ok(Some(Box::new(output)))
    }
}

#[cfg(test)]
mod tests {
    use smc_ast::{build, parse, StartRule};

    use super::*;

    fn minify(vertex: &str, fragment: &str, aggressive: bool) -> (ShaderProgram, MinifyOutput) {
        let mut program = ShaderProgram::new(
            parse(vertex, StartRule::VertexShader).unwrap(),
            parse(fragment, StartRule::FragmentShader).unwrap(),
        );
        let output = VariableMinifier::new(aggressive)
            .perform_step(&StepOutputs::new(), &mut program)
            .unwrap()
            .unwrap();
        let output = *output.downcast::<MinifyOutput>().unwrap();
        (program, output)
    }

    #[test]
    fn test_locals_and_parameters_are_shortened() {
        let (program, output) = minify(
            "uniform float scale;
             float twice(float value) { float doubled = value * 2.0; return doubled; }
             void main() { float result = twice(scale); gl_Position = vec4(result); }",
            "void main() {}",
            false,
        );
        assert_eq!(
            program.render(Stage::Vertex, ""),
            "uniform float scale;float twice(float a){float b=a*2.0;return b;}void main(){float c=twice(scale);gl_Position=vec4(c);}"
        );
        assert_eq!(output.vertex_next_index, 3);
        assert_eq!(output.fragment_next_index, 3);
    }

    #[test]
    fn test_fragment_continues_vertex_numbering() {
        let (program, output) = minify(
            "void main() { float x = 1.0; gl_Position = vec4(x); }",
            "void main() { float y = 0.5; gl_FragColor = vec4(y); }",
            false,
        );
        assert_eq!(
            program.render(Stage::Fragment, ""),
            "void main(){float b=0.5;gl_FragColor=vec4(b);}"
        );
        assert_eq!(output.vertex_next_index, 1);
        assert_eq!(output.fragment_next_index, 2);
    }

    #[test]
    fn test_struct_names_use_definition_names() {
        let (program, _) = minify(
            "struct Light { vec3 color; };
             void main() { Light l = Light(vec3(1.0)); gl_Position = vec4(l.color, 1.0); }",
            "void main() {}",
            false,
        );
        assert_eq!(
            program.render(Stage::Vertex, ""),
            "struct _a{vec3 color;};void main(){_a b=_a(vec3(1.0));gl_Position=vec4(b.color,1.0);}"
        );
    }

    #[test]
    fn test_interface_globals_need_aggressive_mode() {
        let vertex = "attribute vec3 position; varying vec3 shade;
                      void main() { shade = position; gl_Position = vec4(position, 1.0); }";
        let fragment = "varying vec3 shade; void main() { gl_FragColor = vec4(shade, 1.0); }";

        let (program, _) = minify(vertex, fragment, false);
        assert!(program.render(Stage::Vertex, "").contains("varying vec3 shade;"));
        assert!(program.render(Stage::Fragment, "").contains("varying vec3 shade;"));

        let (program, output) = minify(vertex, fragment, true);
        let short = &output.renamed[&Stage::Vertex]["shade"];
        assert_eq!(&output.renamed[&Stage::Fragment]["shade"], short);
        assert_eq!(
            program.render(Stage::Fragment, ""),
            alloc::format!("varying vec3 {0};void main(){{gl_FragColor=vec4({0},1.0);}}", short)
        );
    }

    #[test]
    fn test_struct_member_array_size_follows_constant() {
        let (program, _) = minify(
            "const int COUNT = 4;
             struct Bag { float items[COUNT]; };
             uniform Bag bag;
             void main() { gl_Position = vec4(bag.items[0]); }",
            "void main() {}",
            false,
        );
        assert_eq!(
            program.render(Stage::Vertex, ""),
            "const int a=4;struct Bag{float items[a];};uniform Bag bag;void main(){gl_Position=vec4(bag.items[0]);}"
        );
    }

    #[test]
    fn test_uniform_struct_has_one_name_in_both_stages() {
        let vertex = "struct Light { vec3 color; }; uniform Light light;
                      void main() { gl_Position = vec4(light.color, 1.0); }";
        let fragment = "precision mediump float; struct Light { vec3 color; }; uniform Light light;
                        void main() { gl_FragColor = vec4(light.color, 1.0); }";

        let (program, _) = minify(vertex, fragment, false);
        assert_eq!(
            program.render(Stage::Vertex, ""),
            "struct Light{vec3 color;};uniform Light light;void main(){gl_Position=vec4(light.color,1.0);}"
        );
        assert_eq!(
            program.render(Stage::Fragment, ""),
            "precision mediump float;struct Light{vec3 color;};uniform Light light;void main(){gl_FragColor=vec4(light.color,1.0);}"
        );

        let (program, output) = minify(vertex, fragment, true);
        let short = &output.renamed[&Stage::Vertex]["Light"];
        assert_eq!(&output.renamed[&Stage::Fragment]["Light"], short);
        assert_eq!(&output.renamed[&Stage::Fragment]["light"], &output.renamed[&Stage::Vertex]["light"]);
        assert_eq!(
            program.render(Stage::Fragment, ""),
            "precision mediump float;struct _a{vec3 color;};uniform _a b;void main(){gl_FragColor=vec4(b.color,1.0);}"
        );
    }

    #[test]
    fn test_preprocessor_names_are_pinned() {
        let (program, _) = minify(
            "#define SIZE count\nvoid main() { int count = 2; gl_PointSize = float(count); }",
            "void main() {}",
            false,
        );
        assert!(program.render(Stage::Vertex, "").contains("int count=2;"));
    }

    #[test]
    fn test_generated_names_avoid_kept_names() {
        let (program, _) = minify(
            "uniform float a; void main() { float local = a; gl_Position = vec4(local); }",
            "void main() {}",
            false,
        );
        assert_eq!(
            program.render(Stage::Vertex, ""),
            "uniform float a;void main(){float b=a;gl_Position=vec4(b);}"
        );
    }

    #[test]
    fn test_unchanged_tree_keeps_identity() {
        let empty = build::translation_unit(alloc::vec::Vec::new());
        let (root, _) = VariableMinifier::minify_stage(
            &empty,
            NameGenerator::new(),
            BTreeSet::new(),
            BTreeSet::new(),
        )
        .unwrap();
        assert!(alloc::sync::Arc::ptr_eq(&root, &empty));
    }
}
