//! Read-only analyses over a single shader tree.

mod call_graph;
mod census;

pub use call_graph::{CallGraph, GLOBAL_SCOPE};
pub use census::{SymbolCensus, ENTRY_POINT};
