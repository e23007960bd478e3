pub mod onsager;
pub mod summary;
pub mod trajectory;
mod stats;

pub use onsager::{critical_temperature, spontaneous_magnetization};
pub use summary::{summarize, Summary};
pub use trajectory::Trajectory;
