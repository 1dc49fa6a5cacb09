//! GLSL syntax trees for the shader minifier.
//!
//! This crate defines:
//! - Tagged tree nodes with per-tag slot layouts
//! - A handler-table traversal framework (visitor and transformer)
//! - A parser for the GLSL ES subset the compiler accepts
//! - A generator that renders trees back to compact source

#![no_std]

extern crate alloc;

pub mod build;
pub mod keywords;
mod node;
mod parser;
pub mod precedence;
mod render;
mod tag;
pub mod traverse;

pub use node::{Node, NodeId, NodeMap, NodeRef, Slot};
pub use parser::{parse, ParseError, StartRule};
pub use render::render;
pub use tag::{SlotKind, Tag};
pub use traverse::{
    TransformHandler, Transformer, TraversalError, TraversalResult, VisitHandler, Visitor,
};
