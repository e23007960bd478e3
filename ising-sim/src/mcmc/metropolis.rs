use crate::error::{Result, SimError};
use crate::geometry::Lattice;
use crate::spins::{local_field, Spins};
use rand::Rng;

/// Result of one single-spin-flip proposal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub site: usize,
    pub delta_energy: f64,
    pub flipped: bool,
}

/// Single-spin-flip Metropolis kernel at fixed coupling and temperature.
///
/// The kernel holds no random state; every call borrows the chain's RNG, so
/// independent chains never share a stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metropolis {
    coupling: f64,
    temperature: f64,
}

impl Metropolis {
    pub fn new(coupling: f64, temperature: f64) -> Result<Self> {
        if !(coupling.is_finite() && coupling > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "coupling must be finite and > 0, got {coupling}"
            )));
        }
        if temperature.is_nan() || temperature <= 0.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "temperature must be > 0, got {temperature}"
            )));
        }
        Ok(Self {
            coupling,
            temperature,
        })
    }

    /// `ΔE = 2 J s_i Σ_j s_j` for reversing the spin at `site`.
    pub fn delta_energy(&self, lattice: &Lattice, spins: &Spins, site: usize) -> Result<f64> {
        let si = spins.get(site)?;
        let h = local_field(lattice, spins, site)?;
        Ok(2.0 * self.coupling * si as f64 * h as f64)
    }

    /// `min(1, exp(-ΔE / kT))`.
    pub fn acceptance_probability(&self, delta_energy: f64) -> f64 {
        if delta_energy <= 0.0 {
            1.0
        } else {
            (-delta_energy / self.temperature).exp()
        }
    }

    /// Evaluate and possibly apply a flip at a given site.
    ///
    /// Downhill and neutral moves are taken without drawing a random number;
    /// uphill moves consume exactly one uniform draw from `[0, 1)`.
    pub fn attempt_flip<R: Rng + ?Sized>(
        &self,
        lattice: &Lattice,
        spins: &mut Spins,
        site: usize,
        rng: &mut R,
    ) -> Result<StepOutcome> {
        let delta_energy = self.delta_energy(lattice, spins, site)?;
        let flipped =
            delta_energy <= 0.0 || rng.gen::<f64>() < self.acceptance_probability(delta_energy);
        if flipped {
            spins.flip(site)?;
        }
        Ok(StepOutcome {
            site,
            delta_energy,
            flipped,
        })
    }

    /// One Metropolis step: a uniformly drawn site, then [`Self::attempt_flip`].
    #[cfg_attr(feature = "profile", inline(never))]
    pub fn step<R: Rng + ?Sized>(
        &self,
        lattice: &Lattice,
        spins: &mut Spins,
        rng: &mut R,
    ) -> Result<StepOutcome> {
        if spins.len() != lattice.n_sites {
            return Err(SimError::InvalidConfiguration(format!(
                "spin count {} does not match lattice site count {}",
                spins.len(),
                lattice.n_sites
            )));
        }
        let site = rng.gen_range(0..lattice.n_sites);
        self.attempt_flip(lattice, spins, site, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;
    use crate::spins::energy_per_site;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn anti_aligned(lattice: &Lattice, site: usize) -> Spins {
        let mut spins = Spins::uniform(lattice.n_sites, -1).unwrap();
        spins.set(site, 1).unwrap();
        spins
    }

    #[test]
    fn test_rejects_non_positive_temperature() {
        assert!(matches!(
            Metropolis::new(1.0, 0.0),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(Metropolis::new(1.0, -2.0).is_err());
        assert!(Metropolis::new(0.0, 1.0).is_err());
        assert!(Metropolis::new(1.0, f64::INFINITY).is_ok());
    }

    #[test]
    fn test_downhill_flip_always_applied() {
        let lat = Lattice::new(2).unwrap();
        let engine = Metropolis::new(1.0, 0.01).unwrap();
        for seed in 0..20 {
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let mut spins = anti_aligned(&lat, 12);
            let out = engine.attempt_flip(&lat, &mut spins, 12, &mut rng).unwrap();
            assert_eq!(out.delta_energy, -8.0);
            assert!(out.flipped);
            assert_eq!(spins.get(12).unwrap(), -1);
            assert_eq!(spins.magnetization(), -1.0);
        }
    }

    #[test]
    fn test_neutral_flip_always_applied() {
        let lat = Lattice::new(2).unwrap();
        let engine = Metropolis::new(1.0, 0.01).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        let mut spins = Spins::uniform(lat.n_sites, 1).unwrap();
        // Two of the four neighbors of (0,0) point down.
        spins.set(lat.neighbor(12, Direction::Up), -1).unwrap();
        spins.set(lat.neighbor(12, Direction::Left), -1).unwrap();
        let out = engine.attempt_flip(&lat, &mut spins, 12, &mut rng).unwrap();
        assert_eq!(out.delta_energy, 0.0);
        assert!(out.flipped);
    }

    #[test]
    fn test_uphill_flip_frozen_at_low_temperature() {
        // exp(-8 / 0.01) underflows to zero, so no draw can beat it.
        let lat = Lattice::new(2).unwrap();
        let engine = Metropolis::new(1.0, 0.01).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        let mut spins = Spins::uniform(lat.n_sites, 1).unwrap();
        for _ in 0..1000 {
            let out = engine.attempt_flip(&lat, &mut spins, 7, &mut rng).unwrap();
            assert_eq!(out.delta_energy, 8.0);
            assert!(!out.flipped);
        }
        assert_eq!(spins.magnetization(), 1.0);
    }

    #[test]
    fn test_acceptance_probability() {
        let engine = Metropolis::new(1.0, 2.0).unwrap();
        assert_eq!(engine.acceptance_probability(-4.0), 1.0);
        assert_eq!(engine.acceptance_probability(0.0), 1.0);
        assert!((engine.acceptance_probability(4.0) - (-2.0f64).exp()).abs() < 1e-15);

        let hot = Metropolis::new(1.0, f64::INFINITY).unwrap();
        assert_eq!(hot.acceptance_probability(8.0), 1.0);
    }

    #[test]
    fn test_uphill_acceptance_rate() {
        // ΔE = 4 at kT = 4: accept with probability e^-1.
        let lat = Lattice::new(2).unwrap();
        let engine = Metropolis::new(0.5, 4.0).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        let n_trials = 20_000;
        let mut accepted = 0usize;
        for _ in 0..n_trials {
            let mut spins = Spins::uniform(lat.n_sites, 1).unwrap();
            let out = engine.attempt_flip(&lat, &mut spins, 0, &mut rng).unwrap();
            assert_eq!(out.delta_energy, 4.0);
            if out.flipped {
                accepted += 1;
            }
        }
        let rate = accepted as f64 / n_trials as f64;
        assert!((rate - (-1.0f64).exp()).abs() < 0.02, "rate = {rate}");
    }

    #[test]
    fn test_step_keeps_spins_binary() {
        let lat = Lattice::new(4).unwrap();
        let engine = Metropolis::new(1.0, 2.5).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);
        let mut spins = Spins::random(lat.n_sites, &mut rng);
        for _ in 0..10_000 {
            let out = engine.step(&lat, &mut spins, &mut rng).unwrap();
            assert!(out.site < lat.n_sites);
        }
        assert!(spins.as_slice().iter().all(|&s| s == 1 || s == -1));
    }

    #[test]
    fn test_delta_energy_matches_total_energy_change() {
        let lat = Lattice::new(3).unwrap();
        let engine = Metropolis::new(0.7, 1.0).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(21);
        let spins = Spins::random(lat.n_sites, &mut rng);
        let n = lat.n_sites as f64;
        let before = energy_per_site(&lat, spins.as_slice(), 0.7) * n;
        for site in 0..lat.n_sites {
            let mut flipped = spins.clone();
            flipped.flip(site).unwrap();
            let after = energy_per_site(&lat, flipped.as_slice(), 0.7) * n;
            let de = engine.delta_energy(&lat, &spins, site).unwrap();
            assert!((de - (after - before)).abs() < 1e-9, "site {site}");
            let h = local_field(&lat, &spins, site).unwrap();
            assert_eq!(de, 2.0 * 0.7 * spins.get(site).unwrap() as f64 * h as f64);
        }

        let single = Lattice::new(0).unwrap();
        let one = Spins::uniform(1, -1).unwrap();
        assert_eq!(engine.delta_energy(&single, &one, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_mismatched_spins_rejected() {
        let lat = Lattice::new(2).unwrap();
        let engine = Metropolis::new(1.0, 1.0).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let mut spins = Spins::uniform(9, 1).unwrap();
        assert!(engine.step(&lat, &mut spins, &mut rng).is_err());
        assert!(matches!(
            engine.attempt_flip(&lat, &mut spins, 30, &mut rng),
            Err(SimError::IndexOutOfRange { index: 30, .. })
        ));
    }
}
