use super::offsets::{wrap, Direction};
use crate::error::{Result, SimError};

/// Largest `side_count` whose site count still fits the `u32` neighbor table.
pub const MAX_SIDE_COUNT: i32 = 32_767;

/// Integer lattice coordinate, each component in `[-side_count, side_count]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighboring coordinate one unit along `dir`, folded back onto the torus.
    pub fn step(self, dir: Direction, side_count: i32) -> Self {
        let (dx, dy) = dir.offset();
        Self {
            x: wrap(self.x + dx, side_count),
            y: wrap(self.y + dy, side_count),
        }
    }
}

/// Periodic `(2N+1) x (2N+1)` square lattice centered on the origin, with a
/// precomputed neighbor table.
///
/// Sites are indexed row-major over `x` then `y`, so site `i` sits at
/// `x = i / width - N`, `y = i % width - N`. The neighbor table stores four
/// entries per site; element `i * 4 + dir.slot()` is the index of the
/// neighbor of `i` in direction `dir`.
#[derive(Debug, Clone)]
pub struct Lattice {
    /// Half-extent `N`.
    pub side_count: i32,
    /// Sites per row, `2N + 1`.
    pub width: usize,
    /// Total number of sites, `width²`.
    pub n_sites: usize,
    coords: Vec<Coord>,
    neighbors: Vec<u32>,
}

impl Lattice {
    /// Build the coordinate bijection and resolve every neighbor once.
    pub fn new(side_count: i32) -> Result<Self> {
        if side_count < 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "side_count must be >= 0, got {side_count}"
            )));
        }
        if side_count > MAX_SIDE_COUNT {
            return Err(SimError::InvalidConfiguration(format!(
                "side_count must be <= {MAX_SIDE_COUNT}, got {side_count}"
            )));
        }

        let width = 2 * side_count as usize + 1;
        let n_sites = width * width;

        let mut coords = Vec::with_capacity(n_sites);
        for x in -side_count..=side_count {
            for y in -side_count..=side_count {
                coords.push(Coord::new(x, y));
            }
        }

        let mut lattice = Self {
            side_count,
            width,
            n_sites,
            coords,
            neighbors: vec![0u32; n_sites * 4],
        };

        for i in 0..n_sites {
            let here = lattice.coords[i];
            for dir in Direction::ALL {
                let j = lattice.index_of(here.step(dir, side_count))?;
                lattice.neighbors[i * 4 + dir.slot()] = j as u32;
            }
        }

        Ok(lattice)
    }

    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        (-self.side_count..=self.side_count).contains(&coord.x)
            && (-self.side_count..=self.side_count).contains(&coord.y)
    }

    pub fn coordinate_of(&self, index: usize) -> Result<Coord> {
        self.coords
            .get(index)
            .copied()
            .ok_or(SimError::IndexOutOfRange {
                index,
                n_sites: self.n_sites,
            })
    }

    pub fn index_of(&self, coord: Coord) -> Result<usize> {
        if !self.contains(coord) {
            return Err(SimError::CoordinateOutOfRange {
                x: coord.x,
                y: coord.y,
                side_count: self.side_count,
            });
        }
        let row = (coord.x + self.side_count) as usize;
        let col = (coord.y + self.side_count) as usize;
        Ok(row * self.width + col)
    }

    /// Table lookup without a bounds check on `index`; panics if out of range.
    #[inline]
    pub fn neighbor(&self, index: usize, dir: Direction) -> usize {
        self.neighbors[index * 4 + dir.slot()] as usize
    }

    /// Bounds-checked neighbor lookup.
    pub fn neighbor_index(&self, index: usize, dir: Direction) -> Result<usize> {
        if index >= self.n_sites {
            return Err(SimError::IndexOutOfRange {
                index,
                n_sites: self.n_sites,
            });
        }
        Ok(self.neighbor(index, dir))
    }

    /// All four neighbors of `index`, in [`Direction::ALL`] order.
    pub fn neighbors(&self, index: usize) -> Result<[usize; 4]> {
        let mut out = [0usize; 4];
        for dir in Direction::ALL {
            out[dir.slot()] = self.neighbor_index(index, dir)?;
        }
        Ok(out)
    }
}
