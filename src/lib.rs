//! Volume Life - Multi-state 3D cellular automata.
//!
//! This crate simulates survive/birth automata with decay trails on a cubic
//! voxel grid. Rules are written as `SURVIVE/BIRTH/STATES` (for example
//! `4/4/5`), cells count fully alive neighbors in a 3x3x3 neighborhood, and
//! cells that stop being alive fade through the intermediate states.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, rule parsing and seeding
//! - `compute`: Grids, the transition function, CPU/GPU propagators and the engine
//!
//! # Example
//!
//! ```rust,no_run
//! use volume_life::{
//!     compute::{SimulationEngine, SnapshotSink},
//!     schema::SimulationConfig,
//! };
//!
//! let config = SimulationConfig {
//!     axis_size: 32,
//!     rule: "4/4/5".to_string(),
//!     seed: Some(7),
//!     ..Default::default()
//! };
//! let mut engine = SimulationEngine::new(config).unwrap();
//!
//! // Host frame loop: steps fire once per `time_between_updates`
//! let mut renderer = SnapshotSink::new();
//! for _ in 0..60 {
//!     engine.update(1.0 / 60.0, &mut renderer).unwrap();
//! }
//!
//! println!("Alive cells: {}", engine.stats().unwrap().alive_cells);
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{EngineError, RenderFrame, RenderSink, SimulationEngine, SimulationStats};
pub use schema::{Backend, Pattern, RuleSpec, SimulationConfig};
