use std::fmt;

use nalgebra::{Matrix2, Matrix3};
use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Integer supercell matrix in canonical upper-triangular form
///
/// ```text
/// | x1 x2 |    x1, x3 > 0
/// | 0  x3 |    0 <= x2 <= x3 - 1
/// ```
///
/// The determinant `x1 * x3` is the number of primitive cells in the supercell. Applied to a
/// lattice as `basis · M`. Serializes as the nested array `[[x1, x2], [0, x3]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[[i64; 2]; 2]", into = "[[i64; 2]; 2]")]
pub struct TransformMatrix {
    x1: u32,
    x2: u32,
    x3: u32,
}

impl TransformMatrix {
    /// Build a matrix, checking the canonical form.
    pub fn new(x1: u32, x2: u32, x3: u32) -> Result<Self> {
        if x1 == 0 || x3 == 0 {
            return Err(MatchError::invalid_input(format!(
                "diagonal entries must be positive, got x1 = {x1}, x3 = {x3}"
            )));
        }
        if x2 >= x3 {
            return Err(MatchError::invalid_input(format!(
                "off-diagonal entry must satisfy 0 <= x2 < x3, got x2 = {x2}, x3 = {x3}"
            )));
        }
        Ok(TransformMatrix { x1, x2, x3 })
    }

    /// Caller guarantees the canonical form.
    pub(crate) const fn from_canonical(x1: u32, x2: u32, x3: u32) -> Self {
        debug_assert!(x1 > 0 && x3 > 0 && x2 < x3);
        TransformMatrix { x1, x2, x3 }
    }

    pub const fn identity() -> Self {
        TransformMatrix {
            x1: 1,
            x2: 0,
            x3: 1,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Entries (x1, x2, x3)
    pub fn entries(&self) -> (u32, u32, u32) {
        (self.x1, self.x2, self.x3)
    }

    pub fn determinant(&self) -> u64 {
        self.x1 as u64 * self.x3 as u64
    }

    pub fn matrix(&self) -> Matrix2<i64> {
        Matrix2::new(self.x1 as i64, self.x2 as i64, 0, self.x3 as i64)
    }

    pub fn as_f64(&self) -> Matrix2<f64> {
        Matrix2::new(self.x1 as f64, self.x2 as f64, 0.0, self.x3 as f64)
    }

    /// Embed in 3D with a unit z row and column, the scaling matrix a 3D supercell builder expects.
    pub fn to_scaling_matrix_3d(&self) -> Matrix3<i64> {
        Matrix3::new(
            self.x1 as i64,
            self.x2 as i64,
            0,
            0,
            self.x3 as i64,
            0,
            0,
            0,
            1,
        )
    }

    pub fn to_rows(&self) -> [[i64; 2]; 2] {
        [[self.x1 as i64, self.x2 as i64], [0, self.x3 as i64]]
    }
}

impl TryFrom<[[i64; 2]; 2]> for TransformMatrix {
    type Error = MatchError;

    fn try_from(rows: [[i64; 2]; 2]) -> Result<Self> {
        if rows[1][0] != 0 {
            return Err(MatchError::invalid_input(format!(
                "supercell matrix must be upper triangular, got {rows:?}"
            )));
        }
        let entry = |value: i64| {
            u32::try_from(value).map_err(|_| {
                MatchError::invalid_input(format!("entry {value} out of range in {rows:?}"))
            })
        };
        Self::new(entry(rows[0][0])?, entry(rows[0][1])?, entry(rows[1][1])?)
    }
}

impl From<TransformMatrix> for [[i64; 2]; 2] {
    fn from(matrix: TransformMatrix) -> Self {
        matrix.to_rows()
    }
}

impl fmt::Display for TransformMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[{}, {}], [0, {}]]", self.x1, self.x2, self.x3)
    }
}
