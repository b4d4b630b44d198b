//! Simulation configuration with documented defaults
//!
//! Every tunable of the engine lives in [`EngineConfig`]. It is built once,
//! validated once, and then only read. [`ExperimentConfig`] adds the values
//! that belong to a whole run (generation count and game payoffs) and is what
//! the driver loads from TOML.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::ReputationPolicy;

// === DEFAULTS ===

/// Number of generations per simulation
pub const NUM_GENS: u32 = 10;
/// Donation cost
pub const COST: i64 = 1;
/// Donation benefit
pub const BENEFIT: i64 = 3;
/// Number of tribes in a simulation
pub const NUM_TRIBES: usize = 64;
/// Number of agents per tribe
pub const NUM_AGENTS: usize = 64;
/// Conflict selection strength
pub const BETA: f64 = 1.2;
/// Bit switching selection strength
pub const ETA: f64 = 0.1;
/// Probability of conflict between a pair of tribes
pub const P_CONFLICT: f64 = 0.01;
/// Whether a tribe is limited to a single defeat per generation
pub const SINGLE_DEFEAT: bool = true;
/// Probability that a losing tribe's agent slot takes the winner's strategy
pub const P_MIGRATION: f64 = 0.005;
/// Probability of assess module bit mutation
pub const P_ASSESS_MUTATION: f64 = 0.0001;
/// Whether every assess bit gets a mutation attempt, not only matching ones
pub const MUTATE_ALL_BITS: bool = false;
/// Probability of action module bit mutation
pub const P_ACTION_MUTATION: f64 = 0.01;
/// Probability of assessment error
pub const P_ASSESS_ERROR: f64 = 0.001;
/// Probability of execution error
pub const P_EXEC_ERROR: f64 = 0.001;
/// Whether the adaptive mutation rate replaces the static one
pub const USE_ADAPTIVE_MUTATION: bool = false;
/// Whether the game phase is spread over worker threads
pub const USE_PARALLELISM: bool = true;

/// Engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub num_tribes: usize,
    pub num_agents: usize,

    // === GAME ===
    /// Chance a chosen action is inverted (`pexeerr`)
    pub exec_error_rate: f64,
    /// Chance an assigned reputation is inverted (`passerr`)
    pub assess_error_rate: f64,
    /// Per-bit mutation chance when an action module is inherited (`pactmut`)
    pub action_mutation_rate: f64,

    // === GROUP SELECTION ===
    /// Chance that any pair of tribes fights in a generation (`pcon`)
    pub p_conflict: f64,
    /// Conflict selection strength; `inf` makes the fitter tribe always win
    pub beta: f64,
    /// Norm adoption strength in `[0, 1]`
    pub eta: f64,
    /// Per-slot migration chance from winner to loser (`pmig`)
    pub p_migration: f64,
    /// Static per-bit assess mutation chance during a norm shift (`passmut`)
    pub assess_mutation_rate: f64,
    /// Keep only the dominant winner for each loser (`singledef`)
    pub single_defeat: bool,
    /// Try to mutate every assess bit, not only those matching the winner (`passmutall`)
    pub mutate_all_bits_on_conflict: bool,
    /// Replace `assess_mutation_rate` with the fitness-driven rate (`useam`)
    pub use_adaptive_mutation: bool,
    /// Also hand the adaptive rate to each tribe's agents for action mutation
    pub adaptive_action_mutation: bool,

    // === EXECUTION ===
    /// Run the game phase on the rayon pool (negation of `nomp`)
    pub use_parallelism: bool,
    /// Number of parallel workers; defaults to the rayon pool size
    pub workers: Option<usize>,
    /// Master seed; a random one is drawn (and logged) when absent
    pub seed: Option<u64>,
    pub reputation_policy: ReputationPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_tribes: NUM_TRIBES,
            num_agents: NUM_AGENTS,
            exec_error_rate: P_EXEC_ERROR,
            assess_error_rate: P_ASSESS_ERROR,
            action_mutation_rate: P_ACTION_MUTATION,
            p_conflict: P_CONFLICT,
            beta: BETA,
            eta: ETA,
            p_migration: P_MIGRATION,
            assess_mutation_rate: P_ASSESS_MUTATION,
            single_defeat: SINGLE_DEFEAT,
            mutate_all_bits_on_conflict: MUTATE_ALL_BITS,
            use_adaptive_mutation: USE_ADAPTIVE_MUTATION,
            adaptive_action_mutation: false,
            use_parallelism: USE_PARALLELISM,
            workers: None,
            seed: None,
            reputation_policy: ReputationPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Build a config from the driver's string-keyed parameter maps.
    ///
    /// Float keys: `passerr`, `pactmut`, `pexeerr`, `pcon`, `beta`, `eta`,
    /// `pmig`, `passmut`. Bool keys: `singledef`, `passmutall`, `useam`,
    /// `nomp`. Missing keys keep their defaults; unknown keys are rejected.
    pub fn from_param_maps(
        num_tribes: usize,
        num_agents: usize,
        floats: &HashMap<String, f64>,
        bools: &HashMap<String, bool>,
    ) -> Result<Self> {
        let mut config = Self {
            num_tribes,
            num_agents,
            ..Self::default()
        };

        for (key, &value) in floats {
            config.set_float(key, value)?;
        }
        for (key, &value) in bools {
            config.set_bool(key, value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply a single float parameter by its short key
    pub fn set_float(&mut self, key: &str, value: f64) -> Result<()> {
        match key {
            "passerr" => self.assess_error_rate = value,
            "pactmut" => self.action_mutation_rate = value,
            "pexeerr" => self.exec_error_rate = value,
            "pcon" => self.p_conflict = value,
            "beta" => self.beta = value,
            "eta" => self.eta = value,
            "pmig" => self.p_migration = value,
            "passmut" => self.assess_mutation_rate = value,
            other => return Err(SimError::UnknownParameter(other.to_string())),
        }
        Ok(())
    }

    /// Apply a single bool parameter by its short key
    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        match key {
            "singledef" => self.single_defeat = value,
            "passmutall" => self.mutate_all_bits_on_conflict = value,
            "useam" => self.use_adaptive_mutation = value,
            "nomp" => self.use_parallelism = !value,
            other => return Err(SimError::UnknownParameter(other.to_string())),
        }
        Ok(())
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.num_tribes == 0 {
            return Err(SimError::invalid("num_tribes", self.num_tribes, "need at least one tribe"));
        }
        if self.num_agents < 2 {
            return Err(SimError::invalid(
                "num_agents",
                self.num_agents,
                "a tribe needs at least two agents to play",
            ));
        }

        let probabilities = [
            ("exec_error_rate", self.exec_error_rate),
            ("assess_error_rate", self.assess_error_rate),
            ("action_mutation_rate", self.action_mutation_rate),
            ("p_conflict", self.p_conflict),
            ("eta", self.eta),
            ("p_migration", self.p_migration),
            ("assess_mutation_rate", self.assess_mutation_rate),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::invalid(name, value, "must be within [0, 1]"));
            }
        }

        // +inf is allowed, NaN and negatives are not
        if self.beta.is_nan() || self.beta < 0.0 {
            return Err(SimError::invalid("beta", self.beta, "must be >= 0"));
        }

        if self.workers == Some(0) {
            return Err(SimError::invalid("workers", 0, "must be positive"));
        }

        Ok(())
    }
}

/// Everything needed for one experiment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub generations: u32,
    pub cost: i64,
    pub benefit: i64,
    pub engine: EngineConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            generations: NUM_GENS,
            cost: COST,
            benefit: BENEFIT,
            engine: EngineConfig::default(),
        }
    }
}

impl ExperimentConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ExperimentConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an experiment from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cost < 0 {
            return Err(SimError::invalid("cost", self.cost, "must be >= 0"));
        }
        if self.benefit <= self.cost {
            return Err(SimError::invalid(
                "benefit",
                self.benefit,
                format!("must exceed cost ({})", self.cost),
            ));
        }
        self.engine.validate()
    }
}
