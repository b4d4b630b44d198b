//! ActionModule - the inherited donation strategy
//!
//! Four bits decide whether a donor gives, one per (donor rep, recipient rep)
//! situation:
//!
//! | Donor | Recipient | Bit |
//! |-------|-----------|-----|
//! | GOOD  | GOOD      | 0   |
//! | GOOD  | BAD       | 1   |
//! | BAD   | GOOD      | 2   |
//! | BAD   | BAD       | 3   |
//!
//! A module never changes once built. Offspring get a fresh module through
//! [`ActionModule::clone_with_mutation`], so agents can share one via `Arc`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::Rep;

/// Encoded value of the unconditional cooperator (`1111`)
pub const ALL_C: u8 = 15;
/// Encoded value of the unconditional defector (`0000`)
pub const ALL_D: u8 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionModule {
    bits: [bool; 4],
    /// Probability the chosen action is inverted when executed
    exec_error_rate: f64,
}

impl ActionModule {
    pub fn new(bits: [bool; 4], exec_error_rate: f64) -> Self {
        Self { bits, exec_error_rate }
    }

    /// Module with four fair-coin bits
    pub fn random<R: Rng + ?Sized>(exec_error_rate: f64, rng: &mut R) -> Self {
        Self::new([rng.gen(), rng.gen(), rng.gen(), rng.gen()], exec_error_rate)
    }

    pub fn all_cooperate(exec_error_rate: f64) -> Self {
        Self::new([true; 4], exec_error_rate)
    }

    pub fn all_defect(exec_error_rate: f64) -> Self {
        Self::new([false; 4], exec_error_rate)
    }

    pub fn exec_error_rate(&self) -> f64 {
        self.exec_error_rate
    }

    fn index(donor: Rep, recipient: Rep) -> usize {
        match (donor, recipient) {
            (Rep::Good, Rep::Good) => 0,
            (Rep::Good, Rep::Bad) => 1,
            (Rep::Bad, Rep::Good) => 2,
            (Rep::Bad, Rep::Bad) => 3,
        }
    }

    /// Decide whether the donor gives. Execution error inverts the table
    /// entry with probability `exec_error_rate`.
    pub fn choose_donate<R: Rng + ?Sized>(&self, donor: Rep, recipient: Rep, rng: &mut R) -> bool {
        let donate = self.bits[Self::index(donor, recipient)];
        if rng.gen::<f64>() < self.exec_error_rate {
            !donate
        } else {
            donate
        }
    }

    /// Copy this module, flipping each bit independently with probability
    /// `mutation_rate`.
    pub fn clone_with_mutation<R: Rng + ?Sized>(&self, mutation_rate: f64, rng: &mut R) -> Self {
        let mut clone = self.clone();
        for bit in clone.bits.iter_mut() {
            if rng.gen::<f64>() < mutation_rate {
                *bit = !*bit;
            }
        }
        clone
    }

    pub fn same_bits(&self, other: &ActionModule) -> bool {
        self.bits == other.bits
    }

    pub fn bit(&self, i: usize) -> bool {
        self.bits[i]
    }

    pub fn bits(&self) -> [bool; 4] {
        self.bits
    }

    /// Bits as an integer, bit 0 most significant
    pub fn encode(&self) -> u8 {
        self.bits
            .iter()
            .fold(0u8, |acc, &b| (acc << 1) | u8::from(b))
    }
}
