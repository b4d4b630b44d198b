//! Norm shift - a defeated tribe adopts the winner's assessment bits

use std::sync::Arc;

use rand::Rng;

use crate::genetics::AssessModule;

/// Result of shifting one loser's norm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftOutcome {
    pub adopted: usize,
    pub mutated: usize,
}

/// Chance that a differing bit is copied from winner to loser:
/// `eta * poW / (eta * poW + (1 - eta) * poL)`.
pub fn adoption_probability(eta: f64, avg_winner: f64, avg_loser: f64) -> f64 {
    let denom = eta * avg_winner + (1.0 - eta) * avg_loser;
    if denom == 0.0 {
        return if eta > 0.0 { 1.0 } else { 0.0 };
    }
    eta * avg_winner / denom
}

/// Shift `loser` towards `winner` bit by bit.
///
/// Each differing bit is adopted with probability `p_flip`. Bits that
/// matched the winner (every bit when `mutate_all_bits` is set) then get an
/// independent mutation attempt at `mutation_rate`. The loser's module is
/// copied before the first write if another tribe still shares it.
pub fn shift_assess_module<R: Rng + ?Sized>(
    winner: &AssessModule,
    loser: &mut Arc<AssessModule>,
    p_flip: f64,
    mutation_rate: f64,
    mutate_all_bits: bool,
    rng: &mut R,
) -> ShiftOutcome {
    let target = winner.bits();
    let mut bits = loser.bits();
    let mut outcome = ShiftOutcome::default();

    for (bit, &wanted) in bits.iter_mut().zip(target.iter()) {
        let differs = *bit != wanted;
        if differs && rng.gen::<f64>() < p_flip {
            *bit = wanted;
            outcome.adopted += 1;
        }
        if (!differs || mutate_all_bits) && rng.gen::<f64>() < mutation_rate {
            *bit = bit.inverted();
            outcome.mutated += 1;
        }
    }

    if bits != loser.bits() {
        Arc::make_mut(loser).set_bits(bits);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Rep;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_adoption_probability() {
        assert_eq!(adoption_probability(1.0, 2.0, 1.0), 1.0);
        assert_eq!(adoption_probability(0.0, 2.0, 1.0), 0.0);
        assert!((adoption_probability(0.5, 3.0, 1.0) - 0.75).abs() < 1e-12);
        // both tribes earned nothing
        assert_eq!(adoption_probability(0.1, 0.0, 0.0), 1.0);
        assert_eq!(adoption_probability(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_full_adoption_copies_winner() {
        let mut rng = ChaCha8Rng::seed_from_u64(51);
        let winner = AssessModule::uniform(Rep::Good, 0.0);
        let mut loser = Arc::new(AssessModule::uniform(Rep::Bad, 0.0));

        let outcome = shift_assess_module(&winner, &mut loser, 1.0, 0.0, false, &mut rng);

        assert_eq!(outcome.adopted, 8);
        assert_eq!(outcome.mutated, 0);
        assert!(loser.same_bits(&winner));
    }

    #[test]
    fn test_no_adoption_keeps_loser() {
        let mut rng = ChaCha8Rng::seed_from_u64(52);
        let winner = AssessModule::uniform(Rep::Good, 0.0);
        let mut loser = Arc::new(AssessModule::uniform(Rep::Bad, 0.0));
        let before = Arc::clone(&loser);

        let outcome = shift_assess_module(&winner, &mut loser, 0.0, 0.0, false, &mut rng);

        assert_eq!(outcome, ShiftOutcome::default());
        // nothing changed, so no copy was made either
        assert!(Arc::ptr_eq(&loser, &before));
    }

    #[test]
    fn test_shared_module_is_copied_on_write() {
        let mut rng = ChaCha8Rng::seed_from_u64(53);
        let winner = AssessModule::uniform(Rep::Good, 0.0);
        let shared = Arc::new(AssessModule::uniform(Rep::Bad, 0.0));
        let mut loser = Arc::clone(&shared);

        shift_assess_module(&winner, &mut loser, 1.0, 0.0, false, &mut rng);

        assert!(!Arc::ptr_eq(&loser, &shared));
        assert!(shared.same_bits(&AssessModule::uniform(Rep::Bad, 0.0)));
        assert!(loser.same_bits(&winner));
    }

    #[test]
    fn test_mutation_only_touches_matching_bits() {
        use Rep::{Bad as B, Good as G};
        let mut rng = ChaCha8Rng::seed_from_u64(54);
        let winner = AssessModule::new([G, G, G, G, B, B, B, B], 0.0);
        let mut loser = Arc::new(AssessModule::uniform(Rep::Good, 0.0));

        // no adoption, certain mutation: matching bits (first four) flip
        let outcome = shift_assess_module(&winner, &mut loser, 0.0, 1.0, false, &mut rng);

        assert_eq!(outcome.mutated, 4);
        assert_eq!(loser.bits(), [B, B, B, B, G, G, G, G]);
    }

    #[test]
    fn test_mutate_all_bits() {
        use Rep::{Bad as B, Good as G};
        let mut rng = ChaCha8Rng::seed_from_u64(55);
        let winner = AssessModule::new([G, G, G, G, B, B, B, B], 0.0);
        let mut loser = Arc::new(AssessModule::uniform(Rep::Good, 0.0));

        let outcome = shift_assess_module(&winner, &mut loser, 0.0, 1.0, true, &mut rng);

        assert_eq!(outcome.mutated, 8);
        assert_eq!(loser.bits(), [B, B, B, B, B, B, B, B]);
    }
}
