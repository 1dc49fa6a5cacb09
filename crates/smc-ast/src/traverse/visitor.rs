//! Read-only traversal.

use alloc::collections::BTreeMap;

use super::TraversalResult;
use crate::{node::NodeRef, tag::Tag};

/// Hook run before or after a node's children are visited.
pub type VisitHook<S> = fn(&mut S, &NodeRef) -> TraversalResult<()>;

/// Replacement for the generic recursion of a tag. Call
/// [`Visitor::visit_children`] to keep descending.
pub type VisitHandler<S> = fn(&Visitor<S>, &mut S, &NodeRef) -> TraversalResult<()>;

/// Depth-first, tag-dispatched read-only traversal over state `S`.
///
/// Scoped state (e.g. the enclosing function) lives in `S`: push it in a
/// `before` hook and pop it in the matching `after` hook. The `after` hook
/// runs even when the subtree reported an error.
pub struct Visitor<S> {
    before: BTreeMap<Tag, VisitHook<S>>,
    after: BTreeMap<Tag, VisitHook<S>>,
    handlers: BTreeMap<Tag, VisitHandler<S>>,
}

impl<S> Visitor<S> {
    /// Default table: every tag recurses generically.
    pub fn new() -> Self {
        Self {
            before: BTreeMap::new(),
            after: BTreeMap::new(),
            handlers: BTreeMap::new(),
        }
    }

    pub fn before(mut self, tag: Tag, hook: VisitHook<S>) -> Self {
        self.before.insert(tag, hook);
        self
    }

    pub fn after(mut self, tag: Tag, hook: VisitHook<S>) -> Self {
        self.after.insert(tag, hook);
        self
    }

    pub fn on(mut self, tag: Tag, handler: VisitHandler<S>) -> Self {
        self.handlers.insert(tag, handler);
        self
    }

    /// Visit `node` and its subtree.
    pub fn visit(&self, state: &mut S, node: &NodeRef) -> TraversalResult<()> {
        let tag = node.tag();
        if let Some(hook) = self.before.get(&tag) {
            hook(state, node)?;
        }

        let result = match self.handlers.get(&tag) {
            Some(handler) => handler(self, state, node),
            None => self.visit_children(state, node),
        };

        let restored = match self.after.get(&tag) {
            Some(hook) => hook(state, node),
            None => Ok(()),
        };
        result.and(restored)
    }

    /// Generic recursion: visit every child in slot order.
    pub fn visit_children(&self, state: &mut S, node: &NodeRef) -> TraversalResult<()> {
        node.check_layout()?;
        for child in node.children() {
            self.visit(state, child)?;
        }
        Ok(())
    }
}

impl<S> Default for Visitor<S> {
    fn default() -> Self {
        Self::new()
    }
}
