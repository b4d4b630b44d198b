//! SimEngine - runs generations of the tribal donation game
//!
//! A generation is:
//! 1. `play_rounds` - every tribe plays its games and reproduces (optionally
//!    in parallel, one private RNG per worker)
//! 2. `evolve_tribes` - pairwise conflicts, norm shifts and migration,
//!    applied to the next generation in a fixed order
//! 3. `reset` - clear payouts before the next round of play
//!
//! [`SimEngine::run_generation`] performs all three and reports stats.

use std::sync::Arc;

use rand::Rng;
use rayon::prelude::*;

use crate::core::config::EngineConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{Payout, ReputationPolicy, TribeIdx};
use crate::engine::rng::{RngProvider, SimRng};
use crate::engine::stats::{EvolutionSummary, GenerationReport, GenerationStats};
use crate::engine::systems::{self, DefeatLedger};
use crate::population::{pair_mut, Tribe};

pub struct SimEngine {
    config: EngineConfig,
    tribes: Vec<Tribe>,
    /// Stream for sequential play and the whole evolution phase
    rng: SimRng,
    /// Private streams for the parallel game phase, one per worker
    worker_rngs: Vec<SimRng>,
    seed: u64,
    total_payouts: Payout,
    generation: u32,
}

impl SimEngine {
    /// Engine with randomly initialised tribes
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let provider = RngProvider::new(config.seed);
        let mut rng = provider.sequential();

        let tribes = (0..config.num_tribes)
            .map(|_| {
                Tribe::random(
                    config.num_agents,
                    config.assess_error_rate,
                    config.exec_error_rate,
                    config.action_mutation_rate,
                    &mut rng,
                )
            })
            .collect();

        Ok(Self::assemble(config, tribes, provider, rng))
    }

    /// Engine over caller-built tribes. `num_tribes` and `num_agents` in the
    /// config are taken from the tribes themselves.
    pub fn with_tribes(mut config: EngineConfig, tribes: Vec<Tribe>) -> Result<Self> {
        let num_agents = tribes.first().map(Tribe::num_agents).unwrap_or(0);
        if tribes.iter().any(|t| t.num_agents() != num_agents) {
            return Err(SimError::invalid(
                "tribes",
                tribes.len(),
                "all tribes must have the same number of agents",
            ));
        }
        config.num_tribes = tribes.len();
        config.num_agents = num_agents;
        config.validate()?;

        let provider = RngProvider::new(config.seed);
        let rng = provider.sequential();
        Ok(Self::assemble(config, tribes, provider, rng))
    }

    fn assemble(config: EngineConfig, tribes: Vec<Tribe>, provider: RngProvider, rng: SimRng) -> Self {
        let workers = if config.use_parallelism {
            config.workers.unwrap_or_else(rayon::current_num_threads).max(1)
        } else {
            0
        };

        tracing::info!(
            seed = provider.seed(),
            tribes = config.num_tribes,
            agents = config.num_agents,
            parallel = config.use_parallelism,
            workers,
            "simulation engine ready"
        );

        Self {
            worker_rngs: provider.worker_streams(workers),
            seed: provider.seed(),
            config,
            tribes,
            rng,
            total_payouts: 0,
            generation: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tribes(&self) -> &[Tribe] {
        &self.tribes
    }

    /// Seed the run was started from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn total_payouts(&self) -> Payout {
        self.total_payouts
    }

    /// Clear payouts ahead of the next generation
    pub fn reset(&mut self) {
        self.total_payouts = 0;
        let policy = self.config.reputation_policy;
        for tribe in &mut self.tribes {
            tribe.reset(policy);
        }
    }

    /// Play all games of the generation and build each tribe's offspring.
    ///
    /// The returned tribes are not installed; pass them to
    /// [`SimEngine::evolve_tribes`].
    pub fn play_rounds(&mut self, cost: Payout, benefit: Payout) -> Vec<Tribe> {
        let policy = self.config.reputation_policy;
        let (next_gen, total) = if self.config.use_parallelism && !self.worker_rngs.is_empty() {
            self.play_parallel(cost, benefit, policy)
        } else {
            play_partition(&mut self.tribes, cost, benefit, policy, &mut self.rng)
        };

        self.total_payouts += total;
        next_gen
    }

    fn play_parallel(&mut self, cost: Payout, benefit: Payout, policy: ReputationPolicy) -> (Vec<Tribe>, Payout) {
        let chunk_size = self.tribes.len().div_ceil(self.worker_rngs.len()).max(1);

        // PARALLEL: each worker owns a contiguous run of tribes and its own RNG
        let partials: Vec<(Vec<Tribe>, Payout)> = self
            .tribes
            .par_chunks_mut(chunk_size)
            .zip(self.worker_rngs.par_iter_mut())
            .map(|(tribes, rng)| play_partition(tribes, cost, benefit, policy, rng))
            .collect();

        let mut next_gen = Vec::with_capacity(self.tribes.len());
        let mut total = 0;
        for (tribes, partial) in partials {
            next_gen.extend(tribes);
            total += partial;
        }
        (next_gen, total)
    }

    /// Decide a conflict between tribes `a` and `b` of the current
    /// generation, returning `(winner, loser)`.
    pub fn conflict(&mut self, a: TribeIdx, b: TribeIdx) -> (TribeIdx, TribeIdx) {
        if systems::b_wins(&self.tribes[a], &self.tribes[b], self.config.beta, &mut self.rng) {
            (b, a)
        } else {
            (a, b)
        }
    }

    /// Group selection: resolve conflicts between the current tribes and
    /// apply norm shifts and migration to `next_gen`, which then replaces the
    /// current generation.
    ///
    /// `min_payout`/`max_payout` bound a tribe's total payout and feed the
    /// adaptive mutation rate.
    pub fn evolve_tribes(
        &mut self,
        mut next_gen: Vec<Tribe>,
        min_payout: Payout,
        max_payout: Payout,
    ) -> Result<EvolutionSummary> {
        if next_gen.len() != self.tribes.len() {
            return Err(SimError::invalid(
                "next_gen",
                next_gen.len(),
                format!("expected {} tribes", self.tribes.len()),
            ));
        }
        if self.config.use_adaptive_mutation {
            systems::check_payout_bounds(min_payout, max_payout)?;
        }

        let payouts: Vec<Payout> = self.tribes.iter().map(Tribe::total_payouts).collect();
        let mut summary = EvolutionSummary::default();
        let mut ledger = DefeatLedger::new(self.config.single_defeat);

        for a in 0..self.tribes.len() {
            for b in (a + 1)..self.tribes.len() {
                if self.rng.gen::<f64>() < self.config.p_conflict {
                    let (winner, loser) = self.conflict(a, b);
                    tracing::trace!(winner, loser, "conflict");
                    ledger.record(winner, loser, &payouts);
                    summary.conflicts += 1;
                }
            }
        }

        for (winner, loser) in ledger.into_pairs(&payouts) {
            self.shift_assess_mod(&mut next_gen, winner, loser, min_payout, max_payout, &mut summary)?;
            self.migrate_agents(&mut next_gen, winner, loser, &mut summary);
            summary.pairs_applied += 1;
        }

        if self.config.use_adaptive_mutation && self.config.adaptive_action_mutation {
            for (tribe, &payout) in next_gen.iter_mut().zip(payouts.iter()) {
                let rate = systems::calc_adaptive_mutation_rate(payout as f64, min_payout, max_payout)?;
                tribe.set_mutation_rate(rate);
            }
        }

        tracing::debug!(
            generation = self.generation,
            total_payouts = self.total_payouts,
            conflicts = summary.conflicts,
            pairs = summary.pairs_applied,
            adopted = summary.bits_adopted,
            mutated = summary.bits_mutated,
            migrated = summary.agents_migrated,
            "tribes evolved"
        );

        self.tribes = next_gen;
        self.generation += 1;
        Ok(summary)
    }

    /// Move the loser's norm towards the winner's. Payouts come from the
    /// current generation; modules are edited in `next_gen`.
    fn shift_assess_mod(
        &mut self,
        next_gen: &mut [Tribe],
        winner: TribeIdx,
        loser: TribeIdx,
        min_payout: Payout,
        max_payout: Payout,
        summary: &mut EvolutionSummary,
    ) -> Result<()> {
        let (won, lost) = (&self.tribes[winner], &self.tribes[loser]);
        let p_flip = systems::adoption_probability(self.config.eta, won.avg_payout(), lost.avg_payout());

        let mutation_rate = if self.config.use_adaptive_mutation {
            systems::calc_adaptive_mutation_rate(won.total_payouts() as f64, min_payout, max_payout)?
        } else {
            self.config.assess_mutation_rate
        };

        let winner_module = Arc::clone(next_gen[winner].assess_module());
        let outcome = systems::shift_assess_module(
            &winner_module,
            &mut next_gen[loser].assess_module,
            p_flip,
            mutation_rate,
            self.config.mutate_all_bits_on_conflict,
            &mut self.rng,
        );

        tracing::trace!(winner, loser, p_flip, mutation_rate, adopted = outcome.adopted, "norm shift");
        summary.bits_adopted += outcome.adopted as u32;
        summary.bits_mutated += outcome.mutated as u32;
        Ok(())
    }

    fn migrate_agents(
        &mut self,
        next_gen: &mut [Tribe],
        from: TribeIdx,
        to: TribeIdx,
        summary: &mut EvolutionSummary,
    ) {
        let (source, target) = pair_mut(next_gen, from, to);
        let migrated = systems::migrate_agents(source, target, self.config.p_migration, &mut self.rng);
        summary.agents_migrated += migrated as u32;
    }

    /// Bit statistics of the current generation
    pub fn stats(&self) -> GenerationStats {
        GenerationStats::collect(&self.tribes)
    }

    /// Play, evolve and reset one generation
    pub fn run_generation(&mut self, cost: Payout, benefit: Payout) -> Result<GenerationReport> {
        let (min_payout, max_payout) = systems::tribal_payout_bounds(self.config.num_agents, cost, benefit);

        let next_gen = self.play_rounds(cost, benefit);
        let total_payouts = self.total_payouts();
        let generation = self.generation;
        let evolution = self.evolve_tribes(next_gen, min_payout, max_payout)?;
        self.reset();

        Ok(GenerationReport {
            generation,
            total_payouts,
            evolution,
            stats: self.stats(),
        })
    }
}

/// Play and reproduce a run of tribes with one RNG
fn play_partition(
    tribes: &mut [Tribe],
    cost: Payout,
    benefit: Payout,
    policy: ReputationPolicy,
    rng: &mut SimRng,
) -> (Vec<Tribe>, Payout) {
    let mut next_gen = Vec::with_capacity(tribes.len());
    let mut total = 0;
    for tribe in tribes.iter_mut() {
        total += tribe.play_rounds(cost, benefit, rng);
        next_gen.push(tribe.create_next_gen(policy, rng));
    }
    (next_gen, total)
}
