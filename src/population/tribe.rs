//! Tribe - a fixed-size population sharing one assessment norm
//!
//! A generation is played with [`Tribe::play_rounds`], after which
//! [`Tribe::create_next_gen`] builds a brand new tribe by fitness-proportional
//! reproduction. The old tribe is left untouched so its payouts remain
//! available to the group selection phase.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::{Payout, ReputationPolicy};
use crate::genetics::{ActionModule, AssessModule};
use crate::population::agent::Agent;
use crate::population::pair_mut;

#[derive(Debug, Clone)]
pub struct Tribe {
    pub(crate) agents: Vec<Agent>,
    pub(crate) assess_module: Arc<AssessModule>,
    pub(crate) total_payouts: Payout,
}

impl Tribe {
    /// Tribe with a random norm and random action modules
    pub fn random<R: Rng + ?Sized>(
        num_agents: usize,
        assess_error_rate: f64,
        exec_error_rate: f64,
        mutation_rate: f64,
        rng: &mut R,
    ) -> Self {
        let assess_module = Arc::new(AssessModule::random(assess_error_rate, rng));
        let agents = (0..num_agents)
            .map(|_| Agent::new(Arc::new(ActionModule::random(exec_error_rate, rng)), mutation_rate))
            .collect();

        Self {
            agents,
            assess_module,
            total_payouts: 0,
        }
    }

    /// Tribe built from explicit modules, one agent per action module
    pub fn from_modules(
        assess_module: Arc<AssessModule>,
        action_modules: Vec<Arc<ActionModule>>,
        mutation_rate: f64,
    ) -> Self {
        let agents = action_modules
            .into_iter()
            .map(|am| Agent::new(am, mutation_rate))
            .collect();

        Self {
            agents,
            assess_module,
            total_payouts: 0,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    pub fn assess_module(&self) -> &Arc<AssessModule> {
        &self.assess_module
    }

    pub fn total_payouts(&self) -> Payout {
        self.total_payouts
    }

    /// Average payout of an agent in this tribe
    pub fn avg_payout(&self) -> f64 {
        if self.agents.is_empty() {
            return 0.0;
        }
        self.total_payouts as f64 / self.agents.len() as f64
    }

    /// Override every agent's inherited mutation rate
    pub fn set_mutation_rate(&mut self, rate: f64) {
        for agent in &mut self.agents {
            agent.mutation_rate = rate;
        }
    }

    /// Prepare the tribe's agents for the next generation
    pub fn reset(&mut self, policy: ReputationPolicy) {
        self.total_payouts = 0;
        for agent in &mut self.agents {
            agent.reset(policy);
        }
    }

    /// Play every pairing once, in a random order, with random roles.
    ///
    /// Returns the tribe's accumulated total payout.
    pub fn play_rounds<R: Rng + ?Sized>(&mut self, cost: Payout, benefit: Payout, rng: &mut R) -> Payout {
        let mut order: Vec<usize> = (0..self.agents.len()).collect();
        order.shuffle(rng);

        for (pos, &i) in order.iter().enumerate() {
            for &j in &order[pos + 1..] {
                let (donor, recipient) = if rng.gen::<bool>() { (i, j) } else { (j, i) };
                let (donor, recipient) = pair_mut(&mut self.agents, donor, recipient);
                self.total_payouts +=
                    donor.play_round(recipient, cost, benefit, &self.assess_module, rng);
            }
        }

        self.total_payouts
    }

    /// Roulette wheel selection over agent payouts.
    ///
    /// Falls back to a uniform pick when the tribe earned nothing.
    pub fn select_parent<R: Rng + ?Sized>(&self, rng: &mut R) -> &Agent {
        if self.total_payouts <= 0 {
            tracing::debug!(
                total_payouts = self.total_payouts,
                "non-positive tribe payout, selecting parent uniformly"
            );
            return &self.agents[rng.gen_range(0..self.agents.len())];
        }

        let r = rng.gen_range(0..self.total_payouts);
        let mut threshold = 0;
        for agent in &self.agents {
            threshold += agent.payout;
            if threshold >= r {
                return agent;
            }
        }

        // unreachable while total_payouts matches the agents' payouts
        &self.agents[self.agents.len() - 1]
    }

    /// Build the next generation. The norm is carried forward by reference;
    /// each slot inherits a mutated copy of a fitness-selected parent's
    /// action module along with the parent's mutation rate. The offspring's
    /// starting reputation follows `policy`.
    pub fn create_next_gen<R: Rng + ?Sized>(&self, policy: ReputationPolicy, rng: &mut R) -> Tribe {
        let agents = (0..self.agents.len())
            .map(|_| {
                let parent = self.select_parent(rng);
                let module = parent
                    .action_module
                    .clone_with_mutation(parent.mutation_rate, rng);
                let mut child = Agent::new(Arc::new(module), parent.mutation_rate);
                child.reputation = policy.offspring_rep(parent.reputation);
                child
            })
            .collect();

        Tribe {
            agents,
            assess_module: Arc::clone(&self.assess_module),
            total_payouts: 0,
        }
    }
}
