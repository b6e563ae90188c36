//! Schema module - Configuration, rule and seeding types for Volume Life simulations.

mod config;
mod rule;
mod seed;

pub use config::*;
pub use rule::*;
pub use seed::*;
