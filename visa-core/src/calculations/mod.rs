//! Cost calculations for a visa application.
//!
//! The estimator turns a household, a stay duration and a handful of
//! living-cost inputs into a fee breakdown and grand total.

pub mod common;
pub mod estimator;

pub use estimator::{Estimator, estimate};
