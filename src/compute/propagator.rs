//! Propagators - executors of the transition function.
//!
//! A propagator owns whatever device state it needs and turns an old grid into
//! a new one. The engine picks one per run based on the configured backend.

use super::{EngineError, VoxelGrid, transition_into};
use crate::schema::RuleSpec;

/// Executor of one generation step.
pub trait Propagator: Send {
    /// Short backend name for logging.
    fn name(&self) -> &'static str;

    /// Rule applied by this propagator.
    fn rule(&self) -> &RuleSpec;

    /// Compute the next generation of `old` into `new`.
    ///
    /// Must read only `old`; `new` is fully overwritten.
    fn step(&mut self, old: &VoxelGrid, new: &mut VoxelGrid) -> Result<(), EngineError>;

    /// Release device resources. Called at teardown; must be idempotent.
    fn release(&mut self) {}
}

/// CPU-based propagator using a rayon thread pool.
#[derive(Debug, Clone)]
pub struct CpuPropagator {
    rule: RuleSpec,
}

impl CpuPropagator {
    /// Create new propagator for a rule.
    pub fn new(rule: RuleSpec) -> Self {
        Self { rule }
    }

    /// Run the simulation for the given number of steps, in place.
    ///
    /// `scratch` must match `grid` in shape; it holds garbage afterwards.
    pub fn run(&self, grid: &mut VoxelGrid, scratch: &mut VoxelGrid, steps: u64) {
        for _ in 0..steps {
            transition_into(grid, scratch, &self.rule);
            std::mem::swap(grid, scratch);
        }
    }
}

impl Propagator for CpuPropagator {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn rule(&self) -> &RuleSpec {
        &self.rule
    }

    fn step(&mut self, old: &VoxelGrid, new: &mut VoxelGrid) -> Result<(), EngineError> {
        transition_into(old, new, &self.rule);
        Ok(())
    }
}
