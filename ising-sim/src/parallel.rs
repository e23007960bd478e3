use crate::simulation::Chain;
use rayon::prelude::*;

/// Dispatch a per-chain closure over chains, optionally in parallel.
///
/// Chains own disjoint spins and RNGs, so each task touches only its own
/// state. When `sequential` is true the chains run on the current thread
/// (no rayon overhead, best when an outer level already saturates the cores).
pub fn par_over_chains<T: Send>(
    chains: &mut [Chain],
    sequential: bool,
    body: impl Fn(usize, &mut Chain) -> T + Send + Sync,
) -> Vec<T> {
    if sequential {
        chains
            .iter_mut()
            .enumerate()
            .map(|(i, chain)| body(i, chain))
            .collect()
    } else {
        chains
            .par_iter_mut()
            .enumerate()
            .map(|(i, chain)| body(i, chain))
            .collect()
    }
}
