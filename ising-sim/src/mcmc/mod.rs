pub mod metropolis;

pub use metropolis::{Metropolis, StepOutcome};
