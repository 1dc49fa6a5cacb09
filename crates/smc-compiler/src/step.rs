//! Compiler steps and the outputs they publish.

use alloc::{
    boxed::Box,
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};
use core::{any::Any, fmt};

use crate::{error::CompileResult, program::ShaderProgram};

/// Value a step publishes for the steps that run after it.
pub type StepOutput = Option<Box<dyn Any>>;

/// One named, independently schedulable transformation of a program.
pub trait CompilerStep {
    /// Unique name; also the key of this step's output.
    fn name(&self) -> &str;

    /// Names of the steps that must have run before this one.
    fn dependencies(&self) -> &[&str] {
        &[]
    }

    /// Run the step, replacing the program's trees as needed.
    ///
    /// `outputs` holds the output of every step that ran before this one,
    /// in any phase.
    fn perform_step(
        &self,
        outputs: &StepOutputs,
        program: &mut ShaderProgram,
    ) -> CompileResult<StepOutput>;
}

/// Append-only record of executed steps and their outputs.
#[derive(Default)]
pub struct StepOutputs {
    outputs: BTreeMap<String, StepOutput>,
    order: Vec<String>,
}

impl StepOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a step with this name has run.
    pub fn contains(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    /// Output of step `name`, if it ran and published a `T`.
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.outputs
            .get(name)
            .and_then(|output| output.as_ref())
            .and_then(|output| output.downcast_ref::<T>())
    }

    /// Step names in execution order.
    pub fn execution_order(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn record(&mut self, name: &str, output: StepOutput) {
        self.order.push(name.to_string());
        self.outputs.insert(name.to_string(), output);
    }
}

impl fmt::Debug for StepOutputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepOutputs")
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}
