//! Norm Evolution - indirect reciprocity under multi-level selection
//!
//! Tribes of agents play a donation game. Agents inherit bit-encoded action
//! strategies, tribes hold bit-encoded reputation norms, and both evolve:
//! strategies through fitness-proportional reproduction inside a tribe, norms
//! through conflict between tribes.

pub mod core;
pub mod engine;
pub mod genetics;
pub mod population;

pub use crate::core::{EngineConfig, ExperimentConfig, Rep, Result, SimError};
pub use crate::engine::{GenerationReport, GenerationStats, SimEngine};
