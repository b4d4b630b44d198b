//! AssessModule - a tribe's reputation-assignment norm
//!
//! Eight entries map (donor rep, recipient rep, action) to the donor's new
//! reputation, in the order GG-D, GG-R, GB-D, GB-R, BG-D, BG-R, BB-D, BB-R.
//!
//! Tribes hold the module through an `Arc` and several tribes may point at
//! the same one. Anything that edits bits must go through `Arc::make_mut`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{Act, Rep};

pub const ASSESS_BITS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessModule {
    bits: [Rep; ASSESS_BITS],
    /// Probability an assigned reputation is inverted
    assess_error_rate: f64,
}

impl AssessModule {
    pub fn new(bits: [Rep; ASSESS_BITS], assess_error_rate: f64) -> Self {
        Self { bits, assess_error_rate }
    }

    pub fn random<R: Rng + ?Sized>(assess_error_rate: f64, rng: &mut R) -> Self {
        let mut bits = [Rep::Good; ASSESS_BITS];
        for bit in bits.iter_mut() {
            *bit = Rep::random(rng);
        }
        Self::new(bits, assess_error_rate)
    }

    /// Norm that assigns the same reputation in every situation
    pub fn uniform(rep: Rep, assess_error_rate: f64) -> Self {
        Self::new([rep; ASSESS_BITS], assess_error_rate)
    }

    pub fn assess_error_rate(&self) -> f64 {
        self.assess_error_rate
    }

    fn index(donor: Rep, recipient: Rep, act: Act) -> usize {
        let donor_part = if donor.is_good() { 0 } else { 4 };
        let recip_part = if recipient.is_good() { 0 } else { 2 };
        let act_part = match act {
            Act::Donate => 0,
            Act::Refuse => 1,
        };
        donor_part + recip_part + act_part
    }

    /// Look up the donor's new reputation; assessment error inverts it with
    /// probability `assess_error_rate`.
    pub fn assign_reputation<R: Rng + ?Sized>(
        &self,
        donor: Rep,
        recipient: Rep,
        act: Act,
        rng: &mut R,
    ) -> Rep {
        let rep = self.bits[Self::index(donor, recipient, act)];
        if rng.gen::<f64>() < self.assess_error_rate {
            rep.inverted()
        } else {
            rep
        }
    }

    pub fn same_bits(&self, other: &AssessModule) -> bool {
        self.bits == other.bits
    }

    pub fn bit(&self, i: usize) -> Rep {
        self.bits[i]
    }

    pub fn bits(&self) -> [Rep; ASSESS_BITS] {
        self.bits
    }

    pub(crate) fn set_bits(&mut self, bits: [Rep; ASSESS_BITS]) {
        self.bits = bits;
    }

    /// Bits as an integer (GOOD = 1), bit 0 most significant
    pub fn encode(&self) -> u8 {
        self.bits
            .iter()
            .fold(0u8, |acc, &r| (acc << 1) | u8::from(r.is_good()))
    }
}
