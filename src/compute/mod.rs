//! Compute module - Grids, the transition function and the stepping engine.

mod buffers;
mod clock;
mod engine;
mod export;
mod grid;
mod propagator;
mod stats;
mod transition;

pub mod gpu;

pub use buffers::*;
pub use clock::*;
pub use engine::*;
pub use export::*;
pub use grid::*;
pub use propagator::*;
pub use stats::*;
pub use transition::*;
