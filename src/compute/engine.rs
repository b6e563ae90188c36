//! Simulation engine - owns the grids, the rule and the stepping loop.
//!
//! A run is created by [`SimulationEngine::setup`] and destroyed by
//! [`SimulationEngine::teardown`]. Each step reads the old grid, writes the new
//! one, publishes it to a [`RenderSink`] and swaps roles.

use std::time::Instant;

use log::{debug, info, warn};

use super::gpu::{GpuError, GpuPropagator};
use super::{
    AllocationError, BufferId, CpuPropagator, Propagator, RenderFrame, RenderSink,
    SimulationClock, SimulationStats, VolumeBuffers,
};
use crate::schema::{Backend, ConfigError, RuleError, RuleSpec, Seed, SimulationConfig};

/// Resource acquisition failures.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// Engine errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Malformed rule: {0}")]
    MalformedRule(#[from] RuleError),

    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(#[from] ResourceError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("GPU step failed: {0}")]
    Gpu(#[from] GpuError),

    #[error("Simulation is not initialized")]
    NotInitialized,
}

/// State owned by one run, between setup and teardown.
struct ActiveRun {
    rule: RuleSpec,
    buffers: VolumeBuffers,
    propagator: Box<dyn Propagator>,
    rng_seed: u64,
    generation: u64,
}

/// Multi-state 3D automaton engine.
pub struct SimulationEngine {
    config: SimulationConfig,
    clock: SimulationClock,
    active: Option<ActiveRun>,
}

impl SimulationEngine {
    /// Validate the configuration and set up the first run.
    pub fn new(config: SimulationConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let mut engine = Self {
            clock: SimulationClock::new(config.time_between_updates),
            config,
            active: None,
        };
        engine.setup()?;
        Ok(engine)
    }

    /// Parse the rule, allocate both grids, create the backend and seed.
    ///
    /// Any existing run is torn down first. On failure no run is kept.
    pub fn setup(&mut self) -> Result<(), EngineError> {
        self.teardown();

        let rule = RuleSpec::parse(&self.config.rule).inspect_err(|e| {
            warn!("Rejected rule '{}': {}", self.config.rule, e);
        })?;

        let axis_size = self.config.axis_size;
        let mut buffers = VolumeBuffers::try_new(axis_size).map_err(ResourceError::from)?;
        let propagator = create_propagator(self.config.backend, rule, axis_size)?;

        let seed = match self.config.seed {
            Some(rng_seed) => Seed::new(self.config.pattern.clone(), rng_seed),
            None => Seed::from_time(self.config.pattern.clone()),
        };
        if let Some(shape) = seed.generate(buffers.old_mut().cells_mut(), axis_size, rule.max_state()) {
            debug!(
                "Blob center=({:.2}, {:.2}, {:.2}) radius={:.2} density={:.3}",
                shape.center.0, shape.center.1, shape.center.2, shape.radius, shape.density
            );
        }

        info!(
            "Simulation ready: rule={} axis={} backend={} seed={}",
            rule,
            axis_size,
            propagator.name(),
            seed.rng_seed
        );

        self.clock = SimulationClock::new(self.config.time_between_updates);
        self.active = Some(ActiveRun {
            rule,
            buffers,
            propagator,
            rng_seed: seed.rng_seed,
            generation: 0,
        });
        Ok(())
    }

    /// Release both grids and backend resources. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if let Some(mut run) = self.active.take() {
            run.propagator.release();
            info!("Simulation released at generation {}", run.generation);
        }
    }

    /// Tear down and set up again: re-parse the rule and reseed fresh grids.
    pub fn restart(&mut self) -> Result<(), EngineError> {
        self.teardown();
        self.setup()
    }

    /// Advance the clock by `dt` seconds and step if the interval elapsed.
    ///
    /// Returns whether a step ran.
    pub fn update<S: RenderSink + ?Sized>(
        &mut self,
        dt: f32,
        sink: &mut S,
    ) -> Result<bool, EngineError> {
        if self.active.is_none() {
            return Err(EngineError::NotInitialized);
        }
        if !self.clock.advance(dt) {
            return Ok(false);
        }
        self.step(sink)?;
        Ok(true)
    }

    /// Compute one generation, publish it and swap buffer roles.
    pub fn step<S: RenderSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), EngineError> {
        let run = self.active.as_mut().ok_or(EngineError::NotInitialized)?;
        let start = Instant::now();

        let (old, new) = run.buffers.split();
        run.propagator.step(old, new)?;
        run.generation += 1;

        sink.publish(&RenderFrame::new(
            run.buffers.new_grid(),
            run.rule.max_state(),
            run.generation,
        ));
        run.buffers.swap();

        debug!(
            "Generation {} computed in {:?}",
            run.generation,
            start.elapsed()
        );
        Ok(())
    }

    /// Run `steps` generations back to back, ignoring the clock.
    pub fn run<S: RenderSink + ?Sized>(&mut self, steps: u64, sink: &mut S) -> Result<(), EngineError> {
        for _ in 0..steps {
            self.step(sink)?;
        }
        Ok(())
    }

    /// Store new rule text. It takes effect on the next setup or restart.
    pub fn set_rule_text(&mut self, text: impl Into<String>) {
        self.config.rule = text.into();
    }

    /// The most recently published generation (the initial grid before any step).
    pub fn latest_frame(&self) -> Option<RenderFrame<'_>> {
        self.active
            .as_ref()
            .map(|run| RenderFrame::new(run.buffers.old(), run.rule.max_state(), run.generation))
    }

    /// Population statistics of the latest generation.
    pub fn stats(&self) -> Option<SimulationStats> {
        self.active
            .as_ref()
            .map(|run| SimulationStats::from_grid(run.buffers.old(), run.rule.max_state()))
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn rule(&self) -> Option<&RuleSpec> {
        self.active.as_ref().map(|run| &run.rule)
    }

    /// Generations computed since the last setup.
    pub fn generation(&self) -> u64 {
        self.active.as_ref().map_or(0, |run| run.generation)
    }

    /// RNG seed used for the current run's initial pattern.
    pub fn seed(&self) -> Option<u64> {
        self.active.as_ref().map(|run| run.rng_seed)
    }

    /// Physical buffers currently playing (old, new).
    pub fn buffer_roles(&self) -> Option<(BufferId, BufferId)> {
        self.active.as_ref().map(|run| run.buffers.roles())
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Get configuration reference.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

impl Drop for SimulationEngine {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn create_propagator(
    backend: Backend,
    rule: RuleSpec,
    axis_size: usize,
) -> Result<Box<dyn Propagator>, EngineError> {
    match backend {
        Backend::Cpu => Ok(Box::new(CpuPropagator::new(rule))),
        Backend::Gpu => {
            let gpu = pollster::block_on(GpuPropagator::new(rule, axis_size))
                .map_err(ResourceError::from)?;
            Ok(Box::new(gpu))
        }
    }
}
