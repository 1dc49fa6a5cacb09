//! Tag-dispatched tree traversal.
//!
//! [`Visitor`] walks a tree read-only; [`Transformer`] produces a possibly
//! new tree, rebuilding a node only when something underneath it changed.
//! Both are handler tables keyed by [`Tag`]: start from the default table
//! (generic recursion for every tag) and add overrides by composition.

mod transformer;
mod visitor;

use thiserror::Error;

pub use transformer::{TransformHandler, TransformHook, Transformer};
pub use visitor::{VisitHandler, VisitHook, Visitor};

use crate::{node::NodeId, tag::Tag};

/// Result type for traversals.
pub type TraversalResult<T> = Result<T, TraversalError>;

/// Wiring defects detected while walking a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraversalError {
    /// Node slots do not match the layout its tag declares, and no handler
    /// was registered for the tag.
    #[error("{id} ({tag}) does not match the slot layout of its tag")]
    Arity { tag: Tag, id: NodeId },

    /// A handler deleted a child the parent's layout requires.
    #[error("cannot delete required child in slot {slot} of {id} ({tag})")]
    DeletedRequiredChild { tag: Tag, id: NodeId, slot: usize },

    /// A handler deleted the root of the tree being transformed.
    #[error("transform deleted the root {id} ({tag})")]
    DeletedRoot { tag: Tag, id: NodeId },
}
