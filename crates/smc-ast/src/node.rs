//! Syntax tree nodes.
//!
//! A node is a tag, a tag-specific token (`value`), an ordered qualifier list
//! and an ordered list of slots. Nodes are shared through [`NodeRef`] and are
//! never mutated after construction: rewriting a node means building a new
//! one with [`Node::with_value`] or [`Node::with_slots`].

use alloc::{collections::BTreeMap, string::String, sync::Arc, vec::Vec};
use core::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    tag::{SlotKind, Tag},
    traverse::{TraversalError, TraversalResult},
};

static NEXT_NODE_ID: AtomicUsize = AtomicUsize::new(0);

/// Process-unique node identity.
///
/// The only valid key for per-node side tables; see [`NodeMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Allocate an id that has never been handed out before.
    pub fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw index of this id.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node{}", self.0)
    }
}

/// Shared, immutable node reference.
pub type NodeRef = Arc<Node>;

/// A single slot of a node.
#[derive(Debug, Clone)]
pub enum Slot {
    /// Single child, absent when `None`
    Child(Option<NodeRef>),
    /// Ordered child list
    List(Vec<NodeRef>),
}

impl Slot {
    /// Slot holding one present child.
    pub fn some(node: NodeRef) -> Self {
        Slot::Child(Some(node))
    }

    /// Slot holding an optional child.
    pub fn opt(node: Option<NodeRef>) -> Self {
        Slot::Child(node)
    }

    fn fits(&self, kind: SlotKind) -> bool {
        match (self, kind) {
            (Slot::Child(Some(_)), SlotKind::Required) => true,
            (Slot::Child(_), SlotKind::Optional) => true,
            (Slot::List(_), SlotKind::List) => true,
            _ => false,
        }
    }
}

/// A syntax tree node.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    tag: Tag,
    value: String,
    qualifiers: Vec<String>,
    slots: Vec<Slot>,
}

impl Node {
    /// Build a node with a fresh id.
    pub fn new(
        tag: Tag,
        value: impl Into<String>,
        qualifiers: Vec<String>,
        slots: Vec<Slot>,
    ) -> NodeRef {
        Arc::new(Node {
            id: NodeId::fresh(),
            tag,
            value: value.into(),
            qualifiers,
            slots,
        })
    }

    /// Build a node without qualifiers or slots.
    pub fn leaf(tag: Tag, value: impl Into<String>) -> NodeRef {
        Self::new(tag, value, Vec::new(), Vec::new())
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Tag-specific token: a name, a literal, an operator or directive text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Storage, precision, parameter and layout qualifiers, in source order.
    pub fn qualifiers(&self) -> &[String] {
        &self.qualifiers
    }

    pub fn has_qualifier(&self, qualifier: &str) -> bool {
        self.qualifiers.iter().any(|q| q == qualifier)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Child held in single-child slot `index`.
    pub fn child(&self, index: usize) -> Option<&NodeRef> {
        match self.slots.get(index) {
            Some(Slot::Child(child)) => child.as_ref(),
            _ => None,
        }
    }

    /// Children held in list slot `index`; empty if the slot is not a list.
    pub fn list(&self, index: usize) -> &[NodeRef] {
        match self.slots.get(index) {
            Some(Slot::List(items)) => items,
            _ => &[],
        }
    }

    /// All present children, in slot order.
    pub fn children(&self) -> impl Iterator<Item = &NodeRef> {
        self.slots.iter().flat_map(|slot| match slot {
            Slot::Child(child) => child.as_slice().iter(),
            Slot::List(items) => items.iter(),
        })
    }

    /// Check the slots against the tag's layout.
    pub fn check_layout(&self) -> TraversalResult<()> {
        let layout = self.tag.layout();
        let fits = layout.len() == self.slots.len()
            && self.slots.iter().zip(layout).all(|(slot, kind)| slot.fits(*kind));
        if fits {
            Ok(())
        } else {
            Err(TraversalError::Arity {
                tag: self.tag,
                id: self.id,
            })
        }
    }

    /// Clone of this node with a different value. Keeps the id.
    pub fn with_value(&self, value: impl Into<String>) -> NodeRef {
        Arc::new(Node {
            value: value.into(),
            ..self.clone()
        })
    }

    /// Clone of this node with different slots. Keeps the id.
    pub fn with_slots(&self, slots: Vec<Slot>) -> NodeRef {
        Arc::new(Node {
            slots,
            ..self.clone()
        })
    }

    /// Clone of this node with slot `index` replaced. Keeps the id.
    pub fn with_slot(&self, index: usize, slot: Slot) -> NodeRef {
        let mut slots = self.slots.clone();
        if let Some(existing) = slots.get_mut(index) {
            *existing = slot;
        }
        self.with_slots(slots)
    }

    /// Compare two trees ignoring node ids.
    pub fn structurally_eq(&self, other: &Node) -> bool {
        self.tag == other.tag
            && self.value == other.value
            && self.qualifiers == other.qualifiers
            && self.slots.len() == other.slots.len()
            && self
                .slots
                .iter()
                .zip(&other.slots)
                .all(|pair| match pair {
                    (Slot::Child(None), Slot::Child(None)) => true,
                    (Slot::Child(Some(a)), Slot::Child(Some(b))) => a.structurally_eq(b),
                    (Slot::List(a), Slot::List(b)) => {
                        a.len() == b.len()
                            && a.iter().zip(b).all(|(x, y)| x.structurally_eq(y))
                    }
                    _ => false,
                })
    }

    /// Number of nodes in this subtree.
    pub fn size(&self) -> usize {
        1 + self.children().map(|child| child.size()).sum::<usize>()
    }
}

/// Side table keyed by node identity.
///
/// Analyses attach results to nodes through this map instead of mutating
/// the nodes themselves.
#[derive(Debug, Clone)]
pub struct NodeMap<T> {
    entries: BTreeMap<NodeId, T>,
}

impl<T> NodeMap<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, node: &Node, value: T) -> Option<T> {
        self.entries.insert(node.id(), value)
    }

    pub fn get(&self, node: &Node) -> Option<&T> {
        self.entries.get(&node.id())
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.entries.contains_key(&node.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for NodeMap<T> {
    fn default() -> Self {
        Self::new()
    }
}
