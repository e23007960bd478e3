pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod parallel;
pub mod simulation;
pub mod sink;
pub mod spins;
pub mod statistics;

pub use config::{InitialState, SimConfig};
pub use error::{Result, SimError};
pub use geometry::{Coord, Direction, Lattice};
pub use mcmc::{Metropolis, StepOutcome};
pub use simulation::{run_chain, run_chains_parallel, simulate, simulate_ensemble, Chain, Snapshot};
pub use sink::{write_csv_file, CsvSink, TrajectorySink};
pub use spins::Spins;
pub use statistics::{Summary, Trajectory};
