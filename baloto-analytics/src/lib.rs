//! Descriptive and predictive statistics over Baloto / MiLoto draw histories.
//!
//! Every analyzer takes the history oldest-first as `&[Draw]` and never
//! mutates it; [`analyze`] runs them all and composes the recommendation.

pub mod config;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod gaps;
pub mod pairs;
pub mod positions;
pub mod sampler;
pub mod secondary;
pub mod sums;
pub mod synthesis;
pub mod trends;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::AnalyticsConfig;
pub use engine::{analyze, AnalyticsResult};
pub use error::AnalyticsError;

/// 0-based slot of `number` in a pool of `pool_size`, `None` when out of range.
pub(crate) fn index_of(number: u8, pool_size: usize) -> Option<usize> {
    let idx = usize::from(number.checked_sub(1)?);
    (idx < pool_size).then_some(idx)
}

pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
