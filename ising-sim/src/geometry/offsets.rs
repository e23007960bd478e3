/// One of the four nearest-neighbor directions on the square lattice.
///
/// Offsets follow `up = (0,+1)`, `down = (0,-1)`, `left = (+1,0)`,
/// `right = (-1,0)`; `up`/`down` and `left`/`right` are mutual inverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in neighbor-table slot order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Directions whose bonds are counted once per site (one per axis).
    pub const FORWARD: [Direction; 2] = [Self::Up, Self::Left];

    /// Unit displacement `(dx, dy)`.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (1, 0),
            Self::Right => (-1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Position of this direction in a site's row of the neighbor table.
    #[inline]
    pub fn slot(self) -> usize {
        self as usize
    }
}

/// Fold a coordinate that stepped one unit past the edge back onto
/// `[-side_count, side_count]`.
///
/// This is a single reflection, not a modulus: it is only correct for inputs
/// at most one unit outside the range.
#[inline]
pub fn wrap(v: i32, side_count: i32) -> i32 {
    if v > side_count {
        -side_count
    } else if v < -side_count {
        side_count
    } else {
        v
    }
}
