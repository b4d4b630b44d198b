//! Core type definitions used throughout the codebase

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reputation an agent holds in the eyes of its tribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rep {
    Good,
    Bad,
}

impl Rep {
    /// Fair coin between Good and Bad
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen::<bool>() {
            Rep::Good
        } else {
            Rep::Bad
        }
    }

    pub fn inverted(self) -> Self {
        match self {
            Rep::Good => Rep::Bad,
            Rep::Bad => Rep::Good,
        }
    }

    pub fn is_good(self) -> bool {
        self == Rep::Good
    }
}

impl fmt::Display for Rep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rep::Good => write!(f, "GOOD"),
            Rep::Bad => write!(f, "BAD"),
        }
    }
}

/// Action taken by a donor in a single round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Act {
    Donate,
    Refuse,
}

impl Act {
    pub fn from_donated(donated: bool) -> Self {
        if donated {
            Act::Donate
        } else {
            Act::Refuse
        }
    }
}

/// Reputation an agent starts a generation with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReputationPolicy {
    /// Offspring inherit their parent's reputation; reset leaves it alone
    Keep,
    /// Every agent starts the generation as Good
    #[default]
    ResetToGood,
}

impl ReputationPolicy {
    /// Starting reputation for an offspring of a parent holding `inherited`
    pub fn offspring_rep(self, inherited: Rep) -> Rep {
        match self {
            ReputationPolicy::Keep => inherited,
            ReputationPolicy::ResetToGood => Rep::Good,
        }
    }
}

/// Index of a tribe within the engine's current generation
pub type TribeIdx = usize;

/// Payout totals are accumulated as signed integers
pub type Payout = i64;
