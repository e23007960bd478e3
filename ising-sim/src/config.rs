use crate::error::{Result, SimError};
use crate::geometry::MAX_SIDE_COUNT;
use rand::Rng;
use validator::{Validate, ValidationError};

/// Spin configuration a chain starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialState {
    #[default]
    Random,
    AllUp,
    AllDown,
}

impl TryFrom<&str> for InitialState {
    type Error = String;
    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        match s {
            "random" => Ok(Self::Random),
            "up" => Ok(Self::AllUp),
            "down" => Ok(Self::AllDown),
            _ => Err(format!(
                "unknown initial_state '{s}', expected 'random', 'up' or 'down'"
            )),
        }
    }
}

fn validate_sim_config(cfg: &SimConfig) -> std::result::Result<(), ValidationError> {
    if cfg.side_count < 0 {
        return Err(ValidationError::new("side_count must be >= 0"));
    }
    if cfg.side_count > MAX_SIDE_COUNT {
        return Err(ValidationError::new("side_count too large"));
    }
    if cfg.n_steps < 1 {
        return Err(ValidationError::new("n_steps must be >= 1"));
    }
    if !(cfg.coupling.is_finite() && cfg.coupling > 0.0) {
        return Err(ValidationError::new("coupling must be finite and > 0"));
    }
    if cfg.temperature.is_nan() || cfg.temperature <= 0.0 {
        return Err(ValidationError::new("temperature must be > 0"));
    }
    if cfg.snapshot_interval == Some(0) {
        return Err(ValidationError::new("snapshot_interval must be >= 1"));
    }
    Ok(())
}

/// Parameters of one Metropolis run.
#[derive(Debug, Clone, PartialEq, Validate)]
#[validate(schema(function = "validate_sim_config"))]
pub struct SimConfig {
    /// Half-extent `N` of the `(2N+1) x (2N+1)` lattice.
    pub side_count: i32,
    /// Number of single-spin-flip steps (not sweeps).
    pub n_steps: usize,
    /// Ferromagnetic coupling `J`.
    pub coupling: f64,
    /// Temperature `kT`, in the same units as `J`.
    pub temperature: f64,
    /// `None` draws a fresh seed from the thread RNG.
    pub seed: Option<u64>,
    pub initial_state: InitialState,
    /// Keep a copy of the spin grid every `k` steps.
    pub snapshot_interval: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            side_count: 25,
            n_steps: 100_000,
            coupling: 1.0,
            temperature: 1.0,
            seed: None,
            initial_state: InitialState::Random,
            snapshot_interval: None,
        }
    }
}

impl SimConfig {
    /// Run validation and map failures onto [`SimError::InvalidConfiguration`].
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| SimError::InvalidConfiguration(format!("{e}")))
    }

    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::thread_rng().gen())
    }
}
