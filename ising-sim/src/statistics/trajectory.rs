use crate::spins::Spins;
use crate::statistics::summary::{summarize, Summary};

/// Magnetization time series of one chain, one entry per completed step.
///
/// Append-only: entry `k` is the mean spin right after step `k`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    magnetization: Vec<f64>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.magnetization.reserve(additional);
    }

    /// Read the current magnetization and append it. Does not touch the spins.
    pub fn record(&mut self, spins: &Spins) -> f64 {
        let m = spins.magnetization();
        self.magnetization.push(m);
        m
    }

    pub fn len(&self) -> usize {
        self.magnetization.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnetization.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.magnetization
    }

    pub fn last(&self) -> Option<f64> {
        self.magnetization.last().copied()
    }

    /// `(step_index, magnetization)` pairs in step order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.magnetization.iter().copied().enumerate()
    }

    /// Averages over the second half of the series, `len/2 .. len`.
    pub fn second_half(&self) -> Summary {
        let start = self.magnetization.len() / 2;
        summarize(&self.magnetization[start..])
    }
}
