use crate::lattice::Lattice2D;

/// Ratio of unit cell areas, `|a2 × b2| / |a1 × b1|`.
///
/// Both lattices are validated on construction, so the ratio is always finite and positive.
pub fn area_ratio(lattice_1: &Lattice2D, lattice_2: &Lattice2D) -> f64 {
    lattice_2.cell_area() / lattice_1.cell_area()
}
