//! Adaptive mutation rate
//!
//! Tribes that earn close to nothing mutate at `LOW_FITNESS_RATE`; the rate
//! halves every fifth of the way towards the theoretical maximum payout.

use crate::core::error::{Result, SimError};
use crate::core::math::{almost_equal, EPSILON};
use crate::core::types::Payout;

/// Mutation rate handed to a tribe that earned the minimum possible payout
pub const LOW_FITNESS_RATE: f64 = 0.002;

/// Minimum and maximum total payout a tribe of `num_agents` can earn in one
/// generation: every pair refuses (`2 * cost`) or every pair donates
/// (`benefit + cost`).
pub fn tribal_payout_bounds(num_agents: usize, cost: Payout, benefit: Payout) -> (Payout, Payout) {
    let n = num_agents as Payout;
    let pairs = n * (n - 1) / 2;
    (pairs * 2 * cost, pairs * (benefit + cost))
}

/// Reject payout bounds that leave no room between min and max
pub fn check_payout_bounds(min: Payout, max: Payout) -> Result<()> {
    if min >= max {
        return Err(SimError::InvalidPayoutBounds { min, max });
    }
    Ok(())
}

/// Mutation rate for a tribe that earned `payout` out of `[min, max]`.
pub fn calc_adaptive_mutation_rate(payout: f64, min: Payout, max: Payout) -> Result<f64> {
    check_payout_bounds(min, max)?;

    if almost_equal(payout, min as f64, EPSILON) {
        return Ok(LOW_FITNESS_RATE);
    }

    let earned_fraction = (payout - min as f64) / (max - min) as f64;
    Ok(LOW_FITNESS_RATE * (0.5f64.ln() * 5.0 * earned_fraction).exp())
}
