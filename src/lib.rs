//! Epitaxial lattice matching library
//!
//! Given the primitive bases of two 2D crystal lattices, this library finds a pair of
//! integer supercell matrices and a relative rotation angle that bring both lattices
//! into closest coincidence, measured by the RMS mismatch of the transformed bases.
//!
//! ```no_run
//! use lattice_match::lattice::square_lattice;
//! use lattice_match::matching::{AngleSweep, LatticeMatcher};
//!
//! # fn main() -> lattice_match::Result<()> {
//! let substrate = square_lattice(5.653)?;
//! let film = square_lattice(6.481)?;
//! let matcher = LatticeMatcher::new(100, 0.01, AngleSweep::new(1.0)?);
//! let result = matcher.match_lattices(&substrate, &film)?;
//! println!("{:?} / {:?} at {}°", result.matrix_1, result.matrix_2, result.angle_degrees);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod lattice;
pub mod matching;

pub use error::{MatchError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
