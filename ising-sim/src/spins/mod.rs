pub mod energy;
mod state;

pub use energy::{energy_per_site, local_field};
pub use state::Spins;
