//! Phase-grouped step scheduler.
//!
//! Steps are registered into a fixed sequence of phases. Before anything
//! runs, the whole step graph is validated: names must be unique,
//! dependencies must name registered steps in the same or an earlier phase,
//! and the graph must be acyclic. Within a phase, steps run in dependency
//! order with registration order as the tie-break.

use alloc::{
    boxed::Box,
    collections::{BTreeMap, BTreeSet},
    format,
    vec::Vec,
};

use tracing::{debug, info};

use crate::{
    error::{CompileError, CompileResult},
    options::CompilerOptions,
    passes::{
        BraceReducer, DeadFunctionRemover, DeclarationMerger, FunctionMinifier, VariableMinifier,
    },
    program::ShaderProgram,
    step::{CompilerStep, StepOutputs},
};

/// Ordered bucket of steps; phases run strictly in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Optimization,
    Consolidation,
    Minification,
}

impl Phase {
    pub const ALL: [Phase; 3] = [
        Phase::Optimization,
        Phase::Consolidation,
        Phase::Minification,
    ];
}

struct RegisteredStep {
    phase: Phase,
    step: Box<dyn CompilerStep>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Runs registered steps over a [`ShaderProgram`].
#[derive(Default)]
pub struct Compiler {
    steps: Vec<RegisteredStep>,
}

impl Compiler {
    /// Compiler with no steps; compiling is a no-op.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiler with the default pipeline, steps switched by `options`.
    pub fn with_options(options: &CompilerOptions) -> Self {
        let mut compiler = Self::new();
        if options.remove_dead_functions {
            compiler.register_step(Phase::Optimization, DeadFunctionRemover);
        }
        if options.merge_declarations {
            compiler.register_step(Phase::Consolidation, DeclarationMerger);
        }
        if options.reduce_braces {
            compiler.register_step(Phase::Consolidation, BraceReducer);
        }
        if options.minify {
            compiler.register_step(
                Phase::Minification,
                VariableMinifier::new(options.aggressive),
            );
            compiler.register_step(Phase::Minification, FunctionMinifier);
        }
        compiler
    }

    pub fn register_step(&mut self, phase: Phase, step: impl CompilerStep + 'static) {
        self.steps.push(RegisteredStep {
            phase,
            step: Box::new(step),
        });
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Run every step and return the transformed program.
    pub fn compile_program(&self, mut program: ShaderProgram) -> CompileResult<ShaderProgram> {
        self.run_steps(&mut program)?;
        Ok(program)
    }

    /// Run every step over `program` in place and return their outputs.
    ///
    /// # Errors
    ///
    /// Scheduling errors are reported before any step runs; a failing step
    /// aborts the remaining ones.
    pub fn run_steps(&self, program: &mut ShaderProgram) -> CompileResult<StepOutputs> {
        let schedule = self.schedule()?;
        let mut outputs = StepOutputs::new();
        for index in schedule {
            let registered = &self.steps[index];
            let name = registered.step.name();
            debug!("Running step {} ({:?})", name, registered.phase);
            let output = registered.step.perform_step(&outputs, program)?;
            outputs.record(name, output);
        }
        info!("Pipeline complete: {} steps", outputs.len());
        Ok(outputs)
    }

    /// Execution order as indices into `self.steps`.
    fn schedule(&self) -> CompileResult<Vec<usize>> {
        let index_of = self.index_by_name()?;
        self.check_known_dependencies(&index_of)?;
        self.check_cycles(&index_of)?;
        self.check_phases(&index_of)?;

        let mut order = Vec::with_capacity(self.steps.len());
        let mut done = BTreeSet::new();
        for phase in Phase::ALL {
            let mut pending: Vec<usize> = (0..self.steps.len())
                .filter(|&i| self.steps[i].phase == phase)
                .collect();
            while !pending.is_empty() {
                let position = pending
                    .iter()
                    .position(|&i| {
                        self.steps[i]
                            .step
                            .dependencies()
                            .iter()
                            .all(|dep| done.contains(&index_of[dep]))
                    })
                    .ok_or_else(|| {
                        CompileError::configuration(format!(
                            "no runnable step left in phase {:?}",
                            phase
                        ))
                    })?;
                let index = pending.remove(position);
                done.insert(index);
                order.push(index);
            }
        }
        Ok(order)
    }

    fn index_by_name(&self) -> CompileResult<BTreeMap<&str, usize>> {
        let mut index_of = BTreeMap::new();
        for (index, registered) in self.steps.iter().enumerate() {
            let name = registered.step.name();
            if index_of.insert(name, index).is_some() {
                return Err(CompileError::configuration(format!(
                    "step '{}' is registered twice",
                    name
                )));
            }
        }
        Ok(index_of)
    }

    fn check_known_dependencies(&self, index_of: &BTreeMap<&str, usize>) -> CompileResult<()> {
        for registered in &self.steps {
            for dep in registered.step.dependencies() {
                if !index_of.contains_key(dep) {
                    return Err(CompileError::configuration(format!(
                        "step '{}' depends on unknown step '{}'",
                        registered.step.name(),
                        dep
                    )));
                }
            }
        }
        Ok(())
    }

    /// A dependency must run in the same or an earlier phase.
    fn check_phases(&self, index_of: &BTreeMap<&str, usize>) -> CompileResult<()> {
        for registered in &self.steps {
            for dep in registered.step.dependencies() {
                let dep_phase = self.steps[index_of[dep]].phase;
                if dep_phase > registered.phase {
                    return Err(CompileError::configuration(format!(
                        "step '{}' ({:?}) depends on '{}' from later phase {:?}",
                        registered.step.name(),
                        registered.phase,
                        dep,
                        dep_phase
                    )));
                }
            }
        }
        Ok(())
    }

    /// Depth-first walk over all steps in phase then registration order.
    fn check_cycles(&self, index_of: &BTreeMap<&str, usize>) -> CompileResult<()> {
        let mut roots: Vec<usize> = (0..self.steps.len()).collect();
        roots.sort_by_key(|&i| self.steps[i].phase);

        let mut marks = alloc::vec![Mark::Unvisited; self.steps.len()];
        let mut stack = Vec::new();
        for root in roots {
            if marks[root] == Mark::Unvisited {
                self.visit(root, index_of, &mut marks, &mut stack)?;
            }
        }
        Ok(())
    }

    fn visit(
        &self,
        index: usize,
        index_of: &BTreeMap<&str, usize>,
        marks: &mut [Mark],
        stack: &mut Vec<usize>,
    ) -> CompileResult<()> {
        marks[index] = Mark::Visiting;
        stack.push(index);
        for dep in self.steps[index].step.dependencies() {
            let dep_index = index_of[dep];
            match marks[dep_index] {
                Mark::Done => {}
                Mark::Unvisited => self.visit(dep_index, index_of, marks, stack)?,
                Mark::Visiting => {
                    let start = stack.iter().position(|&i| i == dep_index).unwrap_or(0);
                    let path = core::iter::once(index)
                        .chain(stack[start..].iter().copied())
                        .map(|i| self.steps[i].step.name());
                    return Err(CompileError::cycle(path));
                }
            }
        }
        stack.pop();
        marks[index] = Mark::Done;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::{
        rc::Rc,
        string::{String, ToString},
    };
    use core::cell::RefCell;

    use smc_ast::build;

    use super::*;
    use crate::step::StepOutput;

    struct TestStep {
        name: &'static str,
        deps: Vec<&'static str>,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl CompilerStep for TestStep {
        fn name(&self) -> &str {
            self.name
        }

        fn dependencies(&self) -> &[&str] {
            &self.deps
        }

        fn perform_step(
            &self,
            outputs: &StepOutputs,
            _program: &mut ShaderProgram,
        ) -> CompileResult<StepOutput> {
            for dep in &self.deps {
                assert!(outputs.contains(dep), "{} ran before {}", self.name, dep);
            }
            self.log.borrow_mut().push(self.name.to_string());
            Ok(Some(Box::new(self.name.len())))
        }
    }

    fn step(
        name: &'static str,
        deps: &[&'static str],
        log: &Rc<RefCell<Vec<String>>>,
    ) -> TestStep {
        TestStep {
            name,
            deps: deps.to_vec(),
            log: log.clone(),
        }
    }

    fn empty_program() -> ShaderProgram {
        ShaderProgram::new(
            build::translation_unit(Vec::new()),
            build::translation_unit(Vec::new()),
        )
    }

    #[test]
    fn test_no_steps_is_noop() {
        let program = empty_program();
        let vertex = program.vertex_ast.clone();
        let result = Compiler::new().compile_program(program).unwrap();
        assert!(alloc::sync::Arc::ptr_eq(&vertex, &result.vertex_ast));
    }

    #[test]
    fn test_dependency_runs_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut compiler = Compiler::new();
        compiler.register_step(Phase::Optimization, step("B", &["A"], &log));
        compiler.register_step(Phase::Optimization, step("C", &[], &log));
        compiler.register_step(Phase::Optimization, step("A", &[], &log));

        let outputs = compiler.run_steps(&mut empty_program()).unwrap();
        assert_eq!(*log.borrow(), ["C", "A", "B"]);
        assert_eq!(outputs.execution_order(), ["C", "A", "B"]);
        assert_eq!(outputs.get::<usize>("A"), Some(&1));
    }

    #[test]
    fn test_registration_order_breaks_ties() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut compiler = Compiler::new();
        compiler.register_step(Phase::Minification, step("z", &[], &log));
        compiler.register_step(Phase::Optimization, step("y", &[], &log));
        compiler.register_step(Phase::Optimization, step("x", &[], &log));
        compiler.register_step(Phase::Minification, step("w", &["x"], &log));

        compiler.run_steps(&mut empty_program()).unwrap();
        assert_eq!(*log.borrow(), ["y", "x", "z", "w"]);
    }

    #[test]
    fn test_cycle_is_reported_before_any_step_runs() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut compiler = Compiler::new();
        compiler.register_step(Phase::Optimization, step("opStep1", &["minStep"], &log));
        compiler.register_step(Phase::Optimization, step("opStep2", &["opStep1"], &log));
        compiler.register_step(Phase::Minification, step("minStep", &["opStep2"], &log));

        let error = compiler.run_steps(&mut empty_program()).unwrap_err();
        assert_eq!(
            error,
            CompileError::SchedulingCycle {
                path: "opStep2->opStep1->minStep->opStep2".to_string()
            }
        );
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut compiler = Compiler::new();
        compiler.register_step(Phase::Optimization, step("loop", &["loop"], &log));
        let error = compiler.run_steps(&mut empty_program()).unwrap_err();
        assert_eq!(
            error,
            CompileError::SchedulingCycle {
                path: "loop->loop".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_dependency() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut compiler = Compiler::new();
        compiler.register_step(Phase::Optimization, step("a", &["ghost"], &log));
        let error = compiler.run_steps(&mut empty_program()).unwrap_err();
        assert!(matches!(error, CompileError::Configuration(_)));
    }

    #[test]
    fn test_duplicate_name() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut compiler = Compiler::new();
        compiler.register_step(Phase::Optimization, step("a", &[], &log));
        compiler.register_step(Phase::Minification, step("a", &[], &log));
        let error = compiler.run_steps(&mut empty_program()).unwrap_err();
        assert!(matches!(error, CompileError::Configuration(_)));
    }

    #[test]
    fn test_dependency_on_later_phase_is_rejected() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut compiler = Compiler::new();
        compiler.register_step(Phase::Optimization, step("early", &["late"], &log));
        compiler.register_step(Phase::Minification, step("late", &[], &log));
        let error = compiler.run_steps(&mut empty_program()).unwrap_err();
        assert!(matches!(error, CompileError::Configuration(_)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_default_pipeline_respects_options() {
        assert_eq!(Compiler::with_options(&CompilerOptions::default()).step_count(), 5);
        let options = CompilerOptions::default().minify(false).reduce_braces(false);
        assert_eq!(Compiler::with_options(&options).step_count(), 2);
    }
}
