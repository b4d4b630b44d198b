//! Genetic modules - bit-encoded strategies passed between generations

pub mod action;
pub mod assess;

pub use action::{ActionModule, ALL_C, ALL_D};
pub use assess::{AssessModule, ASSESS_BITS};
