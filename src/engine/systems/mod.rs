//! Group selection systems

pub mod adaptive;
mod conflict;
mod migration;
mod norm_shift;

pub use adaptive::{calc_adaptive_mutation_rate, check_payout_bounds, tribal_payout_bounds, LOW_FITNESS_RATE};
pub use conflict::{b_wins, DefeatLedger};
pub use migration::migrate_agents;
pub use norm_shift::{adoption_probability, shift_assess_module, ShiftOutcome};
