pub mod config;
pub mod error;
pub mod math;
pub mod types;

pub use config::{EngineConfig, ExperimentConfig};
pub use error::{Result, SimError};
pub use types::{Act, Payout, Rep, ReputationPolicy, TribeIdx};
