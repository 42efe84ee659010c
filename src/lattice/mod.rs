// Lattice module: 2D lattice bases and the integer supercell matrices applied to them
// Everything here is an immutable value type; transformations return new values

// ======================== MODULE DECLARATIONS ========================
pub mod lattice2d;
pub mod lattice_construction;
pub mod transform_matrix;


// ======================== 2D LATTICE STRUCTURE ========================
pub use lattice2d::{
    Lattice2D,       // struct - validated 2D basis, vectors a and b as rows
    rotate_rows,     // fn(basis: &Matrix2<f64>, angle_degrees: f64) -> Matrix2<f64> - rotates each row vector
    rotation_matrix, // fn(angle_degrees: f64) -> Matrix2<f64> - counter-clockwise rotation
};
// Lattice2D impl methods:
//   new(basis: Matrix2<f64>) -> Result<Self>         - validates finiteness and non-zero area
//   from_vectors(a: Vector2<f64>, b: Vector2<f64>) -> Result<Self>
//   from_rows(rows: [[f64; 2]; 2]) -> Result<Self>
//   from_in_plane(lattice_3d: &Matrix3<f64>) -> Result<Self> - upper-left 2x2 block of a 3D lattice
//   basis(&self) -> &Matrix2<f64>                                 - basis matrix (rows a, b)
//   vector_a(&self), vector_b(&self) -> Vector2<f64>
//   cell_area(&self) -> f64                                       - unsigned area |a x b|
//   lattice_parameters(&self) -> (f64, f64)                       - lengths |a|, |b|
//   lattice_angle(&self) -> f64                                   - angle between a and b in radians
//   scaled(&self, factor: f64) -> Result<Self>        - uniform scaling
//   rotated(&self, angle_degrees: f64) -> Result<Self>           - counter-clockwise rotation
//   transformed(&self, matrix: &TransformMatrix) -> Self          - supercell basis · M

// ======================== SUPERCELL MATRICES ========================
pub use transform_matrix::TransformMatrix; // struct - [[x1, x2], [0, x3]] with x1, x3 > 0 and 0 <= x2 < x3
// TransformMatrix impl methods:
//   new(x1: u32, x2: u32, x3: u32) -> Result<Self>    - validates the canonical form
//   identity() -> Self, is_identity(&self) -> bool
//   entries(&self) -> (u32, u32, u32)
//   determinant(&self) -> u64                                     - x1 * x3
//   matrix(&self) -> Matrix2<i64>, as_f64(&self) -> Matrix2<f64>
//   to_scaling_matrix_3d(&self) -> Matrix3<i64>                   - padded with a unit z row/column

// ======================== LATTICE CONSTRUCTION UTILITIES ========================
pub use lattice_construction::{
    hexagonal_lattice,   // fn(a: f64) -> Result<Lattice2D>
    oblique_lattice,     // fn(a: f64, b: f64, gamma_degrees: f64) -> Result<Lattice2D>
    rectangular_lattice, // fn(a: f64, b: f64) -> Result<Lattice2D>
    square_lattice,      // fn(a: f64) -> Result<Lattice2D>
};
