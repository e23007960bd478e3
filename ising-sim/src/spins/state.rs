use crate::config::InitialState;
use crate::error::{Result, SimError};
use rand::Rng;

/// Spin configuration of one chain: one `+1`/`-1` value per lattice site.
///
/// The running spin sum is kept in step with every write so the
/// magnetization can be read without rescanning the lattice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spins {
    values: Vec<i8>,
    sum: i64,
}

impl Spins {
    /// Independent ±1 spins with probability 1/2 each.
    pub fn random<R: Rng + ?Sized>(n_sites: usize, rng: &mut R) -> Self {
        let values: Vec<i8> = (0..n_sites)
            .map(|_| if rng.gen::<f32>() < 0.5 { -1 } else { 1 })
            .collect();
        Self::from_trusted(values)
    }

    pub fn uniform(n_sites: usize, value: i8) -> Result<Self> {
        check_spin(value)?;
        Ok(Self::from_trusted(vec![value; n_sites]))
    }

    pub fn from_values(values: Vec<i8>) -> Result<Self> {
        if let Some(&bad) = values.iter().find(|&&s| s != 1 && s != -1) {
            return Err(SimError::InvalidSpin(bad));
        }
        Ok(Self::from_trusted(values))
    }

    pub fn initialize<R: Rng + ?Sized>(
        n_sites: usize,
        state: InitialState,
        rng: &mut R,
    ) -> Self {
        match state {
            InitialState::Random => Self::random(n_sites, rng),
            InitialState::AllUp => Self::from_trusted(vec![1; n_sites]),
            InitialState::AllDown => Self::from_trusted(vec![-1; n_sites]),
        }
    }

    fn from_trusted(values: Vec<i8>) -> Self {
        let sum = values.iter().map(|&s| s as i64).sum();
        Self { values, sum }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<i8> {
        self.values
            .get(index)
            .copied()
            .ok_or(SimError::IndexOutOfRange {
                index,
                n_sites: self.values.len(),
            })
    }

    /// The only mutator; every other write goes through here.
    pub fn set(&mut self, index: usize, value: i8) -> Result<()> {
        check_spin(value)?;
        let n_sites = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(SimError::IndexOutOfRange { index, n_sites })?;
        self.sum += (value - *slot) as i64;
        *slot = value;
        Ok(())
    }

    /// Reverse the spin at `index` and return its new value.
    pub fn flip(&mut self, index: usize) -> Result<i8> {
        let flipped = -self.get(index)?;
        self.set(index, flipped)?;
        Ok(flipped)
    }

    pub fn sum(&self) -> i64 {
        self.sum
    }

    /// Mean spin, in `[-1, 1]`.
    pub fn magnetization(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.sum as f64 / self.values.len() as f64
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.values
    }
}

fn check_spin(value: i8) -> Result<()> {
    if value == 1 || value == -1 {
        Ok(())
    } else {
        Err(SimError::InvalidSpin(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_random_spins_are_binary_and_mixed() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(42);
        let spins = Spins::random(2601, &mut rng);
        assert_eq!(spins.len(), 2601);
        assert!(spins.as_slice().iter().all(|&s| s == 1 || s == -1));
        let n_up = spins.as_slice().iter().filter(|&&s| s == 1).count();
        assert!(n_up > 1100 && n_up < 1500, "n_up = {n_up}");
    }

    #[test]
    fn test_set_tracks_sum() {
        let mut spins = Spins::uniform(9, 1).unwrap();
        assert_eq!(spins.sum(), 9);
        assert_eq!(spins.magnetization(), 1.0);

        spins.set(4, -1).unwrap();
        assert_eq!(spins.sum(), 7);
        spins.set(4, -1).unwrap();
        assert_eq!(spins.sum(), 7);

        assert_eq!(spins.flip(0).unwrap(), -1);
        assert_eq!(spins.sum(), 5);
        let direct: i64 = spins.as_slice().iter().map(|&s| s as i64).sum();
        assert_eq!(spins.sum(), direct);
    }

    #[test]
    fn test_bounds_and_values_checked() {
        let mut spins = Spins::uniform(4, -1).unwrap();
        assert!(matches!(
            spins.get(4),
            Err(SimError::IndexOutOfRange { index: 4, n_sites: 4 })
        ));
        assert!(matches!(
            spins.set(7, 1),
            Err(SimError::IndexOutOfRange { .. })
        ));
        assert!(matches!(spins.set(0, 0), Err(SimError::InvalidSpin(0))));
        assert!(matches!(
            Spins::from_values(vec![1, 2, -1]),
            Err(SimError::InvalidSpin(2))
        ));
        assert_eq!(spins.sum(), -4);
    }

    #[test]
    fn test_initial_states() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        let up = Spins::initialize(25, InitialState::AllUp, &mut rng);
        let down = Spins::initialize(25, InitialState::AllDown, &mut rng);
        assert_eq!(up.magnetization(), 1.0);
        assert_eq!(down.magnetization(), -1.0);
    }
}
