use crate::config::InitialState;
use crate::geometry::Lattice;
use crate::spins::{self, Spins};
use crate::statistics::Trajectory;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

/// Copy of the spin grid taken right after step `step`.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub step: usize,
    pub spins: Vec<i8>,
}

/// Mutable state of one Markov chain.
///
/// A chain exclusively owns its spins, its RNG stream and its recorded
/// series; only the lattice geometry is shared between chains.
pub struct Chain {
    pub spins: Spins,
    pub rng: Xoshiro256StarStar,
    pub trajectory: Trajectory,
    pub snapshots: Vec<Snapshot>,
    /// Number of accepted flips over the chain's lifetime.
    pub accepted: usize,
}

impl Chain {
    /// Seed the RNG and draw the initial spins from it.
    pub fn new(lattice: &Lattice, initial_state: InitialState, seed: u64) -> Self {
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        let spins = Spins::initialize(lattice.n_sites, initial_state, &mut rng);
        Self::from_parts(spins, rng)
    }

    /// Start from a prepared configuration.
    pub fn with_spins(spins: Spins, seed: u64) -> Self {
        Self::from_parts(spins, Xoshiro256StarStar::seed_from_u64(seed))
    }

    fn from_parts(spins: Spins, rng: Xoshiro256StarStar) -> Self {
        Self {
            spins,
            rng,
            trajectory: Trajectory::new(),
            snapshots: Vec::new(),
            accepted: 0,
        }
    }

    /// Re-seed, redraw the spins and drop everything recorded so far.
    pub fn reset(&mut self, lattice: &Lattice, initial_state: InitialState, seed: u64) {
        *self = Self::new(lattice, initial_state, seed);
    }

    pub fn steps_completed(&self) -> usize {
        self.trajectory.len()
    }

    pub fn acceptance_rate(&self) -> f64 {
        let n = self.steps_completed();
        if n == 0 {
            return 0.0;
        }
        self.accepted as f64 / n as f64
    }

    pub fn magnetization(&self) -> f64 {
        self.spins.magnetization()
    }

    pub fn energy_per_site(&self, lattice: &Lattice, coupling: f64) -> f64 {
        spins::energy_per_site(lattice, self.spins.as_slice(), coupling)
    }
}
