//! Per-generation statistics

use serde::{Deserialize, Serialize};

use crate::core::types::Payout;
use crate::genetics::{ALL_C, ALL_D, ASSESS_BITS};
use crate::population::Tribe;

/// Bit frequencies across the whole population
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Tribes whose norm has GOOD at each position
    pub assess_bit_counts: [u32; ASSESS_BITS],
    /// Agents whose action module has each bit set
    pub action_bit_counts: [u32; 4],
    pub all_cooperators: u32,
    pub all_defectors: u32,
}

impl GenerationStats {
    pub fn collect(tribes: &[Tribe]) -> Self {
        let mut stats = Self::default();

        for tribe in tribes {
            let norm = tribe.assess_module();
            for (i, count) in stats.assess_bit_counts.iter_mut().enumerate() {
                if norm.bit(i).is_good() {
                    *count += 1;
                }
            }

            for agent in tribe.agents() {
                let module = agent.action_module();
                for (i, count) in stats.action_bit_counts.iter_mut().enumerate() {
                    if module.bit(i) {
                        *count += 1;
                    }
                }
                match module.encode() {
                    ALL_C => stats.all_cooperators += 1,
                    ALL_D => stats.all_defectors += 1,
                    _ => {}
                }
            }
        }

        stats
    }
}

/// What happened during group selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionSummary {
    pub conflicts: u32,
    pub pairs_applied: u32,
    pub bits_adopted: u32,
    pub bits_mutated: u32,
    pub agents_migrated: u32,
}

/// One generation as seen by the driver
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: u32,
    pub total_payouts: Payout,
    pub evolution: EvolutionSummary,
    pub stats: GenerationStats,
}
