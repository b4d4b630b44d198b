//! Migration - winners' strategies move into the losing tribe

use std::sync::Arc;

use rand::Rng;

use crate::population::Tribe;

/// Give each of `to`'s agent slots the action module of the same slot in
/// `from` with probability `p_migration`. Modules are shared, not cloned.
///
/// Returns the number of slots that changed hands.
pub fn migrate_agents<R: Rng + ?Sized>(from: &Tribe, to: &mut Tribe, p_migration: f64, rng: &mut R) -> usize {
    let mut migrated = 0;
    for (target, source) in to.agents.iter_mut().zip(from.agents.iter()) {
        if rng.gen::<f64>() < p_migration {
            target.action_module = Arc::clone(&source.action_module);
            migrated += 1;
        }
    }
    migrated
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_certain_migration_shares_every_slot() {
        let mut rng = ChaCha8Rng::seed_from_u64(61);
        let winner = Tribe::random(5, 0.0, 0.0, 0.0, &mut rng);
        let mut loser = Tribe::random(5, 0.0, 0.0, 0.0, &mut rng);

        assert_eq!(migrate_agents(&winner, &mut loser, 1.0, &mut rng), 5);

        for (w, l) in winner.agents().iter().zip(loser.agents()) {
            assert!(Arc::ptr_eq(w.action_module(), l.action_module()));
        }
    }

    #[test]
    fn test_zero_migration_changes_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(62);
        let winner = Tribe::random(5, 0.0, 0.0, 0.0, &mut rng);
        let mut loser = Tribe::random(5, 0.0, 0.0, 0.0, &mut rng);
        let before: Vec<_> = loser.agents().iter().map(|a| Arc::clone(a.action_module())).collect();

        assert_eq!(migrate_agents(&winner, &mut loser, 0.0, &mut rng), 0);

        for (b, l) in before.iter().zip(loser.agents()) {
            assert!(Arc::ptr_eq(b, l.action_module()));
        }
    }
}
