use nalgebra::{Matrix2, Matrix3, Vector2};
use serde::{Deserialize, Serialize};

use crate::config::LATTICE_TOLERANCE;
use crate::error::{MatchError, Result};
use crate::lattice::transform_matrix::TransformMatrix;

/// A 2D Bravais lattice given by its primitive basis.
///
/// The basis vectors `a` and `b` are the rows of the matrix, matching the row convention of
/// crystal-structure files. Values are immutable: scaling, rotating or building a supercell
/// returns a new lattice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[[f64; 2]; 2]", into = "[[f64; 2]; 2]")]
pub struct Lattice2D {
    /// Real-space basis vectors (rows).
    basis: Matrix2<f64>,
    /// Unsigned unit cell area |a × b|.
    cell_area: f64,
}

impl Lattice2D {
    /// Construct a lattice from a basis matrix whose rows are the vectors `a` and `b`.
    ///
    /// Fails for non-finite entries, for an area that overflows and for (near) linearly
    /// dependent vectors. Degeneracy is judged on `|a × b| / (|a| |b|)`, so the check does
    /// not depend on the length unit.
    pub fn new(basis: Matrix2<f64>) -> Result<Self> {
        if basis.iter().any(|v| !v.is_finite()) {
            return Err(MatchError::invalid_input(format!(
                "lattice basis contains non-finite values: {:?}",
                basis.as_slice()
            )));
        }

        let cell_area = basis.determinant().abs();
        if !cell_area.is_finite() {
            return Err(MatchError::invalid_input(format!(
                "lattice cell area overflows: {:?}",
                basis.as_slice()
            )));
        }

        let norm_product = basis.row(0).norm() * basis.row(1).norm();
        if cell_area <= LATTICE_TOLERANCE * norm_product {
            return Err(MatchError::invalid_input(
                "base vectors are either linearly dependent or too close to zero",
            ));
        }

        Ok(Lattice2D { basis, cell_area })
    }

    pub fn from_vectors(a: Vector2<f64>, b: Vector2<f64>) -> Result<Self> {
        Self::new(Matrix2::from_rows(&[a.transpose(), b.transpose()]))
    }

    pub fn from_rows(rows: [[f64; 2]; 2]) -> Result<Self> {
        Self::new(Matrix2::new(rows[0][0], rows[0][1], rows[1][0], rows[1][1]))
    }

    /// Take the in-plane part (upper-left 2x2 block) of a 3D lattice matrix with row vectors.
    pub fn from_in_plane(lattice_3d: &Matrix3<f64>) -> Result<Self> {
        Self::new(lattice_3d.fixed_view::<2, 2>(0, 0).into_owned())
    }

    pub fn basis(&self) -> &Matrix2<f64> {
        &self.basis
    }

    pub fn vector_a(&self) -> Vector2<f64> {
        self.basis.row(0).transpose()
    }

    pub fn vector_b(&self) -> Vector2<f64> {
        self.basis.row(1).transpose()
    }

    pub fn cell_area(&self) -> f64 {
        self.cell_area
    }

    /// Lengths |a| and |b|
    pub fn lattice_parameters(&self) -> (f64, f64) {
        (self.vector_a().norm(), self.vector_b().norm())
    }

    /// Angle between a and b (in radians)
    pub fn lattice_angle(&self) -> f64 {
        let (a, b) = self.lattice_parameters();
        (self.vector_a().dot(&self.vector_b()) / (a * b))
            .clamp(-1.0, 1.0)
            .acos()
    }

    /// Scale both basis vectors uniformly.
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        Self::new(self.basis * factor)
    }

    /// Rotate both basis vectors counter-clockwise by `angle_degrees`.
    pub fn rotated(&self, angle_degrees: f64) -> Result<Self> {
        if !angle_degrees.is_finite() {
            return Err(MatchError::invalid_input(format!(
                "rotation angle must be finite, got {angle_degrees}"
            )));
        }
        Self::new(rotate_rows(&self.basis, angle_degrees))
    }

    /// Apply an integer transformation: `basis · M`.
    pub fn transformed(&self, matrix: &TransformMatrix) -> Self {
        Lattice2D {
            basis: self.basis * matrix.as_f64(),
            cell_area: self.cell_area * matrix.determinant() as f64,
        }
    }

    pub fn to_rows(&self) -> [[f64; 2]; 2] {
        [
            [self.basis[(0, 0)], self.basis[(0, 1)]],
            [self.basis[(1, 0)], self.basis[(1, 1)]],
        ]
    }
}

impl TryFrom<[[f64; 2]; 2]> for Lattice2D {
    type Error = MatchError;

    fn try_from(rows: [[f64; 2]; 2]) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<Lattice2D> for [[f64; 2]; 2] {
    fn from(lattice: Lattice2D) -> Self {
        lattice.to_rows()
    }
}

/// Counter-clockwise rotation by `angle_degrees`, acting on column vectors.
pub fn rotation_matrix(angle_degrees: f64) -> Matrix2<f64> {
    let (sin_theta, cos_theta) = angle_degrees.to_radians().sin_cos();
    Matrix2::new(cos_theta, -sin_theta, sin_theta, cos_theta)
}

/// Rotate every row vector of `basis` counter-clockwise: `basis · Rᵀ`.
pub fn rotate_rows(basis: &Matrix2<f64>, angle_degrees: f64) -> Matrix2<f64> {
    basis * rotation_matrix(angle_degrees).transpose()
}
