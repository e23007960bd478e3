use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

/// Errors surfaced by lattice construction, the Metropolis chain and sinks.
///
/// A rejected flip is never an error. Everything here aborts the run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Rejected before the first step (bad temperature, side count, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A site or neighbor index fell outside `[0, n_sites)`.
    #[error("index {index} out of range for lattice with {n_sites} sites")]
    IndexOutOfRange { index: usize, n_sites: usize },

    #[error("coordinate ({x}, {y}) outside lattice with side_count {side_count}")]
    CoordinateOutOfRange { x: i32, y: i32, side_count: i32 },

    #[error("spin value must be +1 or -1, got {0}")]
    InvalidSpin(i8),

    /// Stopped between steps; the series recorded so far is kept.
    #[error("interrupted after {completed} steps")]
    Interrupted { completed: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
