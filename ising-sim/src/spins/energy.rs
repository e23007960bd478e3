use crate::error::Result;
use crate::geometry::{Direction, Lattice};
use crate::spins::Spins;

/// Sum of the neighbor spins of site `i`.
///
/// A bond from a site to itself (only possible on the single-site lattice)
/// carries no interaction and is skipped. Indices go through the checked
/// resolver, so a corrupt table surfaces as an error instead of a panic.
#[inline]
pub fn local_field(lattice: &Lattice, spins: &Spins, i: usize) -> Result<i32> {
    let mut h = 0i32;
    for dir in Direction::ALL {
        let j = lattice.neighbor_index(i, dir)?;
        if j != i {
            h += spins.get(j)? as i32;
        }
    }
    Ok(h)
}

/// Energy per site, `E / N = -(J / N) Σ_<ij> s_i s_j`.
///
/// Each bond is visited once through the forward directions.
#[allow(clippy::needless_range_loop)]
pub fn energy_per_site(lattice: &Lattice, spins: &[i8], coupling: f64) -> f64 {
    let n_sites = lattice.n_sites;
    let mut total = 0i64;

    for i in 0..n_sites {
        let si = spins[i] as i64;
        for dir in Direction::FORWARD {
            let j = lattice.neighbor(i, dir);
            if j != i {
                total += si * spins[j] as i64;
            }
        }
    }

    -coupling * total as f64 / n_sites as f64
}
