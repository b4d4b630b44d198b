//! Tribal conflict resolution
//!
//! Pairs of tribes fight with a payout-biased outcome. Defeats are collected
//! in a [`DefeatLedger`] and turned into an ordered list of (winner, loser)
//! pairs for the norm shift and migration systems.

use std::collections::BTreeMap;

use rand::Rng;

use crate::core::math::fermi;
use crate::core::types::{Payout, TribeIdx};
use crate::population::Tribe;

/// Decide a conflict between tribes `a` and `b`.
///
/// Returns `true` when `b` wins. With `beta = inf` the strictly fitter tribe
/// wins and ties go to `a`; otherwise `b` wins with probability
/// `1 / (1 + e^(-beta * (avg(b) - avg(a))))`.
pub fn b_wins<R: Rng + ?Sized>(a: &Tribe, b: &Tribe, beta: f64, rng: &mut R) -> bool {
    let (avg_a, avg_b) = (a.avg_payout(), b.avg_payout());
    if beta.is_infinite() {
        return avg_b > avg_a;
    }
    rng.gen::<f64>() < fermi(beta, avg_b, avg_a)
}

/// Defeats recorded during one generation
#[derive(Debug, Clone)]
pub enum DefeatLedger {
    /// Every winner keeps all of its losers
    Multi(BTreeMap<TribeIdx, Vec<TribeIdx>>),
    /// Each loser keeps only its dominant winner
    Single(BTreeMap<TribeIdx, TribeIdx>),
}

impl DefeatLedger {
    pub fn new(single_defeat: bool) -> Self {
        if single_defeat {
            DefeatLedger::Single(BTreeMap::new())
        } else {
            DefeatLedger::Multi(BTreeMap::new())
        }
    }

    /// Record that `winner` beat `loser`. `payouts` holds every tribe's total
    /// payout for the generation.
    pub fn record(&mut self, winner: TribeIdx, loser: TribeIdx, payouts: &[Payout]) {
        match self {
            DefeatLedger::Multi(map) => map.entry(winner).or_default().push(loser),
            DefeatLedger::Single(map) => {
                let dominant = map.entry(loser).or_insert(winner);
                if payouts[winner] > payouts[*dominant] {
                    *dominant = winner;
                }
            }
        }
    }

    /// (winner, loser) pairs in application order.
    ///
    /// In multi-defeat mode winners come in ascending order of their own
    /// payout, so the fittest winner edits a shared loser last.
    pub fn into_pairs(self, payouts: &[Payout]) -> Vec<(TribeIdx, TribeIdx)> {
        match self {
            DefeatLedger::Multi(map) => {
                let mut winners: Vec<(TribeIdx, Vec<TribeIdx>)> = map.into_iter().collect();
                // stable: equal payouts keep index order
                winners.sort_by_key(|(winner, _)| payouts[*winner]);
                winners
                    .into_iter()
                    .flat_map(|(winner, losers)| losers.into_iter().map(move |loser| (winner, loser)))
                    .collect()
            }
            DefeatLedger::Single(map) => map.into_iter().map(|(loser, winner)| (winner, loser)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Rep;
    use crate::genetics::{ActionModule, AssessModule};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn tribe_with_payout(total: Payout) -> Tribe {
        let module = Arc::new(ActionModule::all_cooperate(0.0));
        let mut t = Tribe::from_modules(
            Arc::new(AssessModule::uniform(Rep::Good, 0.0)),
            vec![module; 2],
            0.0,
        );
        t.total_payouts = total;
        t
    }

    #[test]
    fn test_infinite_beta_fitter_wins_either_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(41);
        let strong = tribe_with_payout(4);
        let weak = tribe_with_payout(2);
        for _ in 0..20 {
            assert!(b_wins(&weak, &strong, f64::INFINITY, &mut rng));
            assert!(!b_wins(&strong, &weak, f64::INFINITY, &mut rng));
        }
    }

    #[test]
    fn test_infinite_beta_tie_favours_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let a = tribe_with_payout(3);
        let b = tribe_with_payout(3);
        assert!(!b_wins(&a, &b, f64::INFINITY, &mut rng));
    }

    #[test]
    fn test_zero_beta_is_a_coin_flip() {
        let mut rng = ChaCha8Rng::seed_from_u64(43);
        let a = tribe_with_payout(100);
        let b = tribe_with_payout(2);
        let n = 2000;
        let b_count = (0..n).filter(|_| b_wins(&a, &b, 0.0, &mut rng)).count();
        let rate = b_count as f64 / n as f64;
        assert!((rate - 0.5).abs() < 0.05, "rate {}", rate);
    }

    #[test]
    fn test_finite_beta_favours_fitter() {
        let mut rng = ChaCha8Rng::seed_from_u64(44);
        let a = tribe_with_payout(2);
        let b = tribe_with_payout(6);
        // avg diff 2, beta 1.2: p(b) = 1 / (1 + e^-2.4) ~ 0.917
        let n = 2000;
        let b_count = (0..n).filter(|_| b_wins(&a, &b, 1.2, &mut rng)).count();
        let rate = b_count as f64 / n as f64;
        assert!((rate - 0.917).abs() < 0.04, "rate {}", rate);
    }

    #[test]
    fn test_multi_defeat_orders_by_winner_payout() {
        let payouts = [50, 10, 30, 0];
        let mut ledger = DefeatLedger::new(false);
        ledger.record(0, 3, &payouts);
        ledger.record(1, 3, &payouts);
        ledger.record(2, 3, &payouts);
        ledger.record(0, 1, &payouts);

        assert_eq!(ledger.into_pairs(&payouts), vec![(1, 3), (2, 3), (0, 3), (0, 1)]);
    }

    #[test]
    fn test_single_defeat_keeps_dominant_winner() {
        let payouts = [50, 10, 30, 0];
        let mut ledger = DefeatLedger::new(true);
        ledger.record(1, 3, &payouts);
        ledger.record(0, 3, &payouts);
        ledger.record(2, 3, &payouts);
        ledger.record(2, 1, &payouts);

        assert_eq!(ledger.into_pairs(&payouts), vec![(2, 1), (0, 3)]);
    }

    #[test]
    fn test_single_defeat_tie_keeps_first() {
        let payouts = [20, 20, 0];
        let mut ledger = DefeatLedger::new(true);
        ledger.record(1, 2, &payouts);
        ledger.record(0, 2, &payouts);
        assert_eq!(ledger.into_pairs(&payouts), vec![(1, 2)]);
    }
}
