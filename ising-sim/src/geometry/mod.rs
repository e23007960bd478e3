pub mod lattice;
pub mod offsets;

pub use lattice::{Coord, Lattice, MAX_SIDE_COUNT};
pub use offsets::{wrap, Direction};
