//! Compiler steps of the default pipeline.

mod braces;
mod dead_functions;
mod merge_decls;
mod minify_functions;
mod minify_vars;

pub use braces::BraceReducer;
pub use dead_functions::{DeadFunctionRemover, RemovedFunctions};
pub use merge_decls::DeclarationMerger;
pub use minify_functions::FunctionMinifier;
pub use minify_vars::{MinifyOutput, VariableMinifier};
