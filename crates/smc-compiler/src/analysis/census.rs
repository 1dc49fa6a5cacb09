//! Symbol census: which names a shader declares and in which roles.
//!
//! Renaming passes only touch names whose every use they understand. A name
//! that also appears in another role (a called builtin, a type, a
//! preprocessor line) keeps its spelling and is reserved so no generated
//! name can collide with it.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    string::{String, ToString},
    vec::Vec,
};

use smc_ast::{keywords::INTERFACE_QUALIFIERS, NodeRef, Tag, TraversalResult, Visitor};

use crate::error::CompileResult;

/// Entry point; never renamed.
pub const ENTRY_POINT: &str = "main";

/// Names of one shader, grouped by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolCensus {
    /// Declarators outside struct bodies and named parameters
    pub variables: BTreeSet<String>,
    /// Globals declared with an interface qualifier
    pub interface: BTreeSet<String>,
    /// Declared functions (definitions and prototypes)
    pub functions: BTreeSet<String>,
    /// Named struct definitions
    pub structs: BTreeSet<String>,
    /// Types of interface globals
    pub interface_types: BTreeSet<String>,
    /// Member types of each named struct
    pub member_types: BTreeMap<String, BTreeSet<String>>,
    /// Names called as functions or constructors
    pub called: BTreeSet<String>,
    /// Names used as types
    pub types: BTreeSet<String>,
    /// Words appearing in preprocessor directives
    pub preprocessor: BTreeSet<String>,
    /// Every name in the ordinary identifier namespace
    pub names: BTreeSet<String>,
}

#[derive(Default)]
struct CensusState {
    census: SymbolCensus,
    struct_depth: usize,
}

fn enter_struct(state: &mut CensusState, node: &NodeRef) -> TraversalResult<()> {
    if !node.value().is_empty() {
        state.census.structs.insert(node.value().to_string());
        state.census.names.insert(node.value().to_string());
        let members = node
            .list(0)
            .iter()
            .filter_map(|member| member.child(0))
            .map(|ty| ty.value().to_string())
            .collect();
        state
            .census
            .member_types
            .insert(node.value().to_string(), members);
    }
    state.struct_depth += 1;
    Ok(())
}

fn leave_struct(state: &mut CensusState, _node: &NodeRef) -> TraversalResult<()> {
    state.struct_depth -= 1;
    Ok(())
}

fn declaration(
    visitor: &Visitor<CensusState>,
    state: &mut CensusState,
    node: &NodeRef,
) -> TraversalResult<()> {
    let exported = node
        .qualifiers()
        .iter()
        .any(|q| INTERFACE_QUALIFIERS.contains(&q.as_str()));
    if exported && state.struct_depth == 0 {
        if let Some(ty) = node.child(0) {
            state.census.interface_types.insert(ty.value().to_string());
        }
        for declarator in node.list(1) {
            state.census.interface.insert(declarator.value().to_string());
        }
    }
    visitor.visit_children(state, node)
}

fn declarator(state: &mut CensusState, node: &NodeRef) -> TraversalResult<()> {
    if state.struct_depth == 0 {
        state.census.variables.insert(node.value().to_string());
        state.census.names.insert(node.value().to_string());
    }
    Ok(())
}

fn parameter(state: &mut CensusState, node: &NodeRef) -> TraversalResult<()> {
    if !node.value().is_empty() {
        state.census.variables.insert(node.value().to_string());
        state.census.names.insert(node.value().to_string());
    }
    Ok(())
}

fn function(state: &mut CensusState, node: &NodeRef) -> TraversalResult<()> {
    state.census.functions.insert(node.value().to_string());
    state.census.names.insert(node.value().to_string());
    Ok(())
}

fn call(state: &mut CensusState, node: &NodeRef) -> TraversalResult<()> {
    state.census.called.insert(node.value().to_string());
    state.census.names.insert(node.value().to_string());
    Ok(())
}

fn type_name(state: &mut CensusState, node: &NodeRef) -> TraversalResult<()> {
    state.census.types.insert(node.value().to_string());
    state.census.names.insert(node.value().to_string());
    Ok(())
}

fn identifier(state: &mut CensusState, node: &NodeRef) -> TraversalResult<()> {
    state.census.names.insert(node.value().to_string());
    Ok(())
}

fn directive(state: &mut CensusState, node: &NodeRef) -> TraversalResult<()> {
    for word in directive_words(node.value()) {
        state.census.preprocessor.insert(word.to_string());
        state.census.names.insert(word.to_string());
    }
    Ok(())
}

/// Identifier-like words of a directive line.
fn directive_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|word| {
            word.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        })
}

impl SymbolCensus {
    /// Collect the names of the tree rooted at `root`.
    pub fn collect(root: &NodeRef) -> CompileResult<Self> {
        let visitor = Visitor::new()
            .before(Tag::StructDefinition, enter_struct)
            .after(Tag::StructDefinition, leave_struct)
            .on(Tag::Declaration, declaration)
            .before(Tag::Declarator, declarator)
            .before(Tag::Parameter, parameter)
            .before(Tag::FunctionDeclaration, function)
            .before(Tag::FunctionPrototype, function)
            .before(Tag::FunctionCall, call)
            .before(Tag::TypeName, type_name)
            .before(Tag::Identifier, identifier)
            .before(Tag::Preprocessor, directive);

        let mut state = CensusState::default();
        visitor.visit(&mut state, root)?;
        Ok(state.census)
    }

    /// Names used as something other than a plain variable.
    fn pinned_for_variables(&self) -> BTreeSet<String> {
        let mut pinned: BTreeSet<String> = self
            .functions
            .iter()
            .chain(&self.structs)
            .chain(&self.called)
            .chain(&self.types)
            .chain(&self.preprocessor)
            .cloned()
            .collect();
        pinned.insert(ENTRY_POINT.to_string());
        pinned
    }

    /// Variables a renaming pass may shorten. Interface globals are
    /// included only when `aggressive`.
    pub fn renamable_variables(&self, aggressive: bool) -> BTreeSet<String> {
        let pinned = self.pinned_for_variables();
        self.variables
            .iter()
            .filter(|name| !pinned.contains(*name))
            .filter(|name| aggressive || !self.interface.contains(*name))
            .cloned()
            .collect()
    }

    /// Struct names a renaming pass may shorten.
    pub fn renamable_structs(&self) -> BTreeSet<String> {
        self.structs
            .iter()
            .filter(|name| {
                !self.variables.contains(*name)
                    && !self.functions.contains(*name)
                    && !self.preprocessor.contains(*name)
            })
            .cloned()
            .collect()
    }

    /// Structs that type an interface global, directly or through the
    /// members of another such struct. Their names must match across
    /// stages.
    pub fn interface_structs(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut pending: Vec<&String> = self.interface_types.iter().collect();
        while let Some(name) = pending.pop() {
            if self.structs.contains(name) && found.insert(name.clone()) {
                if let Some(members) = self.member_types.get(name) {
                    pending.extend(members);
                }
            }
        }
        found
    }

    /// Declared functions a renaming pass may shorten.
    pub fn renamable_functions(&self) -> BTreeSet<String> {
        self.functions
            .iter()
            .filter(|name| {
                name.as_str() != ENTRY_POINT
                    && !self.variables.contains(*name)
                    && !self.structs.contains(*name)
                    && !self.types.contains(*name)
                    && !self.preprocessor.contains(*name)
            })
            .cloned()
            .collect()
    }

    /// Every name that keeps its spelling when `renamed` are renamed.
    pub fn kept_names<'a>(
        &'a self,
        renamed: &'a BTreeSet<String>,
    ) -> impl Iterator<Item = &'a String> + 'a {
        self.names.iter().filter(move |name| !renamed.contains(*name))
    }
}
