//! Agent - a single player of the donation game

use std::sync::Arc;

use rand::Rng;

use crate::core::types::{Act, Payout, Rep, ReputationPolicy};
use crate::genetics::{ActionModule, AssessModule};

#[derive(Debug, Clone)]
pub struct Agent {
    pub(crate) reputation: Rep,
    pub(crate) action_module: Arc<ActionModule>,
    pub(crate) payout: Payout,
    pub(crate) games_played: u32,
    /// Chance per bit that offspring's action module mutates
    pub(crate) mutation_rate: f64,
}

impl Agent {
    /// New agent with a GOOD reputation and no payout
    pub fn new(action_module: Arc<ActionModule>, mutation_rate: f64) -> Self {
        Self {
            reputation: Rep::Good,
            action_module,
            payout: 0,
            games_played: 0,
            mutation_rate,
        }
    }

    pub fn reputation(&self) -> Rep {
        self.reputation
    }

    pub fn action_module(&self) -> &Arc<ActionModule> {
        &self.action_module
    }

    pub fn payout(&self) -> Payout {
        self.payout
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Prepare for the next generation
    pub fn reset(&mut self, policy: ReputationPolicy) {
        self.payout = 0;
        self.games_played = 0;
        if policy == ReputationPolicy::ResetToGood {
            self.reputation = Rep::Good;
        }
    }

    /// Play one round of the donation game with `self` as donor.
    ///
    /// Both players always receive `cost` so payouts never go negative.
    /// Returns the payout earned by both agents together:
    /// `(benefit - cost) * donated + 2 * cost`.
    pub fn play_round<R: Rng + ?Sized>(
        &mut self,
        recipient: &mut Agent,
        cost: Payout,
        benefit: Payout,
        assess: &AssessModule,
        rng: &mut R,
    ) -> Payout {
        self.games_played += 1;
        recipient.games_played += 1;

        let donor_rep = self.reputation;
        let recipient_rep = recipient.reputation;

        let mut total = 0;
        let donated = self.action_module.choose_donate(donor_rep, recipient_rep, rng);
        if donated {
            recipient.payout += benefit;
            self.payout -= cost;
            total += benefit - cost;
        }

        self.payout += cost;
        recipient.payout += cost;
        total += 2 * cost;

        self.reputation =
            assess.assign_reputation(donor_rep, recipient_rep, Act::from_donated(donated), rng);

        total
    }
}
