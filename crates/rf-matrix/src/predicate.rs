//! Per-cell transforms applied before coercion and formatting.
//!
//! The store does not validate the domain of a predicate: whatever the
//! predicate's own conversion does with out-of-domain input is written as is.

/// Transform applied to every cell value when a matrix is written.
pub trait CellPredicate: Sync {
    fn apply(&self, value: f64) -> f64;
}

/// Writes values unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl CellPredicate for Identity {
    fn apply(&self, value: f64) -> f64 {
        value
    }
}

/// Turns 0-based time-series indices into 1-based numbers.
///
/// Values go through `u32` first: fractions are dropped and negative input
/// wraps around (`-3.5` is written as `4294967294`).
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeSeriesNumbers;

impl CellPredicate for TimeSeriesNumbers {
    fn apply(&self, value: f64) -> f64 {
        ((value as i64) as u32).wrapping_add(1) as f64
    }
}

impl<F> CellPredicate for F
where
    F: Fn(f64) -> f64 + Sync,
{
    fn apply(&self, value: f64) -> f64 {
        self(value)
    }
}
