//! Copy-on-write traversal.

use alloc::{collections::BTreeMap, sync::Arc, vec::Vec};

use super::{TraversalError, TraversalResult};
use crate::{
    node::{NodeRef, Slot},
    tag::{SlotKind, Tag},
};

/// Hook run before or after a node is transformed.
pub type TransformHook<S> = fn(&mut S, &NodeRef) -> TraversalResult<()>;

/// Handler for a tag. Returns the node itself when nothing changed, a
/// replacement node, or `None` to delete the node from its parent.
pub type TransformHandler<S> =
    fn(&Transformer<S>, &mut S, &NodeRef) -> TraversalResult<Option<NodeRef>>;

/// Tag-dispatched tree rewriter over state `S`.
///
/// Tags without a handler are rebuilt from their transformed children, and
/// only when at least one child changed; otherwise the original reference is
/// returned so unchanged subtrees keep their identity.
pub struct Transformer<S> {
    before: BTreeMap<Tag, TransformHook<S>>,
    after: BTreeMap<Tag, TransformHook<S>>,
    handlers: BTreeMap<Tag, TransformHandler<S>>,
}

impl<S> Transformer<S> {
    /// Default table: every tag is rebuilt structurally.
    pub fn new() -> Self {
        Self {
            before: BTreeMap::new(),
            after: BTreeMap::new(),
            handlers: BTreeMap::new(),
        }
    }

    pub fn before(mut self, tag: Tag, hook: TransformHook<S>) -> Self {
        self.before.insert(tag, hook);
        self
    }

    pub fn after(mut self, tag: Tag, hook: TransformHook<S>) -> Self {
        self.after.insert(tag, hook);
        self
    }

    pub fn on(mut self, tag: Tag, handler: TransformHandler<S>) -> Self {
        self.handlers.insert(tag, handler);
        self
    }

    /// Transform a whole tree. Deleting the root is an error.
    pub fn apply(&self, state: &mut S, root: &NodeRef) -> TraversalResult<NodeRef> {
        self.transform(state, root)?
            .ok_or(TraversalError::DeletedRoot {
                tag: root.tag(),
                id: root.id(),
            })
    }

    /// Transform one node, dispatching on its tag.
    pub fn transform(&self, state: &mut S, node: &NodeRef) -> TraversalResult<Option<NodeRef>> {
        let tag = node.tag();
        if let Some(hook) = self.before.get(&tag) {
            hook(state, node)?;
        }

        let result = match self.handlers.get(&tag) {
            Some(handler) => handler(self, state, node),
            None => self.transform_children(state, node).map(Some),
        };

        let restored = match self.after.get(&tag) {
            Some(hook) => hook(state, node),
            None => Ok(()),
        };
        let transformed = result?;
        restored?;
        Ok(transformed)
    }

    /// Generic rebuild: transform every child, keep `node` if none changed.
    pub fn transform_children(&self, state: &mut S, node: &NodeRef) -> TraversalResult<NodeRef> {
        node.check_layout()?;

        let mut changed = false;
        let mut slots = Vec::with_capacity(node.slots().len());
        for (index, (slot, kind)) in node.slots().iter().zip(node.tag().layout()).enumerate() {
            match slot {
                Slot::Child(None) => slots.push(Slot::Child(None)),
                Slot::Child(Some(child)) => match self.transform(state, child)? {
                    Some(new_child) => {
                        changed |= !Arc::ptr_eq(&new_child, child);
                        slots.push(Slot::some(new_child));
                    }
                    None if *kind == SlotKind::Optional => {
                        changed = true;
                        slots.push(Slot::Child(None));
                    }
                    None => {
                        return Err(TraversalError::DeletedRequiredChild {
                            tag: node.tag(),
                            id: node.id(),
                            slot: index,
                        })
                    }
                },
                Slot::List(items) => {
                    let (new_items, list_changed) = self.transform_list(state, items)?;
                    changed |= list_changed;
                    slots.push(Slot::List(new_items));
                }
            }
        }

        if changed {
            Ok(node.with_slots(slots))
        } else {
            Ok(node.clone())
        }
    }

    /// Transform every element of a child list, dropping deleted ones.
    /// Also reports whether anything changed.
    pub fn transform_list(
        &self,
        state: &mut S,
        items: &[NodeRef],
    ) -> TraversalResult<(Vec<NodeRef>, bool)> {
        let mut changed = false;
        let mut result = Vec::with_capacity(items.len());
        for item in items {
            match self.transform(state, item)? {
                Some(new_item) => {
                    changed |= !Arc::ptr_eq(&new_item, item);
                    result.push(new_item);
                }
                None => changed = true,
            }
        }
        Ok((result, changed))
    }
}

impl<S> Default for Transformer<S> {
    fn default() -> Self {
        Self::new()
    }
}
