//! Call graph of one shader.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    string::{String, ToString},
    vec::Vec,
};

use smc_ast::{NodeRef, Tag, TraversalResult, Visitor};

use crate::error::CompileResult;

/// Name of the pseudo-function owning calls made outside any function,
/// e.g. in global initializers. Not a legal identifier.
pub const GLOBAL_SCOPE: &str = "<global>";

/// Function name to the names it calls, in call order, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallGraph {
    calls: BTreeMap<String, Vec<String>>,
}

struct CallGraphState {
    graph: CallGraph,
    /// Enclosing function names, innermost last
    current: Vec<String>,
}

impl CallGraphState {
    fn current(&self) -> &str {
        self.current.last().map(String::as_str).unwrap_or(GLOBAL_SCOPE)
    }
}

fn enter_function(state: &mut CallGraphState, node: &NodeRef) -> TraversalResult<()> {
    let name = node.value().to_string();
    state.graph.calls.entry(name.clone()).or_default();
    state.current.push(name);
    Ok(())
}

fn leave_function(state: &mut CallGraphState, _node: &NodeRef) -> TraversalResult<()> {
    state.current.pop();
    Ok(())
}

fn record_call(
    visitor: &Visitor<CallGraphState>,
    state: &mut CallGraphState,
    node: &NodeRef,
) -> TraversalResult<()> {
    let caller = state.current().to_string();
    state
        .graph
        .calls
        .entry(caller)
        .or_default()
        .push(node.value().to_string());
    visitor.visit_children(state, node)
}

impl CallGraph {
    /// Build the call graph of `root`.
    pub fn build(root: &NodeRef) -> CompileResult<Self> {
        let visitor = Visitor::new()
            .before(Tag::FunctionDeclaration, enter_function)
            .after(Tag::FunctionDeclaration, leave_function)
            .on(Tag::FunctionCall, record_call);

        let mut calls = BTreeMap::new();
        calls.insert(GLOBAL_SCOPE.to_string(), Vec::new());
        let mut state = CallGraphState {
            graph: CallGraph { calls },
            current: alloc::vec![GLOBAL_SCOPE.to_string()],
        };
        visitor.visit(&mut state, root)?;
        Ok(state.graph)
    }

    /// Names called by `function`, empty if it has no entry.
    pub fn calls(&self, function: &str) -> &[String] {
        self.calls.get(function).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, function: &str) -> bool {
        self.calls.contains_key(function)
    }

    /// Functions with an entry, including [`GLOBAL_SCOPE`].
    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.calls.keys().map(String::as_str)
    }

    /// Every name reachable from `roots`, roots included.
    pub fn reachable_from(&self, roots: &[&str]) -> BTreeSet<String> {
        let mut alive = BTreeSet::new();
        let mut pending: Vec<&str> = roots.to_vec();
        while let Some(name) = pending.pop() {
            if !alive.insert(name.to_string()) {
                continue;
            }
            pending.extend(self.calls(name).iter().map(String::as_str));
        }
        alive
    }
}

#[cfg(test)]
mod tests {
    use smc_ast::{parse, StartRule};

    use super::*;

    fn build_graph(source: &str) -> CallGraph {
        CallGraph::build(&parse(source, StartRule::TranslationUnit).unwrap()).unwrap()
    }

    #[test]
    fn test_calls_in_order_with_duplicates() {
        let graph = build_graph(
            "float f(float x) { return x; }
             void main() { float a = f(1.0) + f(abs(2.0)); }",
        );
        assert_eq!(graph.calls("main"), ["f", "f", "abs"]);
        assert!(graph.calls("f").is_empty());
        assert!(graph.contains("f"));
    }

    #[test]
    fn test_global_scope_always_exists() {
        let graph = build_graph("void main() {}");
        assert!(graph.contains(GLOBAL_SCOPE));
        assert!(graph.calls(GLOBAL_SCOPE).is_empty());

        let graph = build_graph("float k = seed(); float seed() { return 1.0; }");
        assert_eq!(graph.calls(GLOBAL_SCOPE), ["seed"]);
    }

    #[test]
    fn test_reachability_handles_recursion() {
        let graph = build_graph(
            "void a() { b(); } void b() { a(); } void c() { }
             void main() { a(); }",
        );
        let alive = graph.reachable_from(&["main", GLOBAL_SCOPE]);
        assert!(alive.contains("a"));
        assert!(alive.contains("b"));
        assert!(!alive.contains("c"));
    }
}
