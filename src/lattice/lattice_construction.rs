use crate::error::Result;
use crate::lattice::Lattice2D;
use nalgebra::Matrix2;

/// Standard lattice construction utilities for common 2D lattices

/// Create a square lattice with given lattice parameter
pub fn square_lattice(a: f64) -> Result<Lattice2D> {
    Lattice2D::new(Matrix2::new(a, 0.0, 0.0, a))
}

/// Create a rectangular lattice with given lattice parameters
pub fn rectangular_lattice(a: f64, b: f64) -> Result<Lattice2D> {
    Lattice2D::new(Matrix2::new(a, 0.0, 0.0, b))
}

/// Create a hexagonal lattice with given lattice parameter (120° between a and b)
pub fn hexagonal_lattice(a: f64) -> Result<Lattice2D> {
    Lattice2D::new(Matrix2::new(a, 0.0, -a / 2.0, a * 3.0_f64.sqrt() / 2.0))
}

/// Create an oblique lattice with given parameters and angle (in degrees)
pub fn oblique_lattice(a: f64, b: f64, gamma_degrees: f64) -> Result<Lattice2D> {
    let (sin_gamma, cos_gamma) = gamma_degrees.to_radians().sin_cos();
    Lattice2D::new(Matrix2::new(a, 0.0, b * cos_gamma, b * sin_gamma))
}
