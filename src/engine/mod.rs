//! Multi-level selection engine
//!
//! Individual selection happens inside each tribe during play and
//! reproduction; group selection happens between tribes through conflict,
//! norm shifting and migration.

pub mod rng;
pub mod sim_engine;
pub mod stats;
pub mod systems;

pub use rng::{RngProvider, SimRng};
pub use sim_engine::SimEngine;
pub use stats::{EvolutionSummary, GenerationReport, GenerationStats};
