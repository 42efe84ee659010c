use log::debug;
use nalgebra::{Matrix2, Matrix3};
use serde::{Deserialize, Serialize};

use crate::config::{MatchConfig, validate_max_error, validate_max_supercell_size};
use crate::error::{MatchError, Result};
use crate::lattice::{Lattice2D, TransformMatrix, rotate_rows};
use crate::matching::area_ratio::area_ratio;
use crate::matching::optimizer::{AngleSweep, find_best_match};
use crate::matching::rationalize::{RationalApproximation, rationalize_ratio};
use crate::matching::supercell_enumeration::enumerate_supercell_matrices;

/// Best transformation pair found for two lattices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Supercell matrix applied to lattice 1
    pub matrix_1: TransformMatrix,
    /// Supercell matrix applied to lattice 2
    pub matrix_2: TransformMatrix,
    /// Rotation applied to the lattice 1 supercell, in [0°, 360°)
    pub angle_degrees: f64,
    /// RMS mismatch between the two resulting bases
    pub rms_error: f64,
    /// Area ratio rationalization the candidates were built from
    pub approximation: RationalApproximation,
    pub candidates_evaluated: usize,
}

impl MatchResult {
    /// False when the area ratio could not be rationalized within the requested tolerance.
    pub fn tolerance_met(&self) -> bool {
        self.approximation.within_tolerance
    }

    /// Both matrices padded to 3D, in lattice order
    pub fn scaling_matrices_3d(&self) -> (Matrix3<i64>, Matrix3<i64>) {
        (
            self.matrix_1.to_scaling_matrix_3d(),
            self.matrix_2.to_scaling_matrix_3d(),
        )
    }

    /// The two bases compared by the search: rotated lattice 1 supercell and lattice 2 supercell.
    pub fn transformed_bases(
        &self,
        lattice_1: &Lattice2D,
        lattice_2: &Lattice2D,
    ) -> (Matrix2<f64>, Matrix2<f64>) {
        (
            rotate_rows(lattice_1.transformed(&self.matrix_1).basis(), self.angle_degrees),
            *lattice_2.transformed(&self.matrix_2).basis(),
        )
    }
}

/// Finds supercell matrices and a rotation that bring two lattices into coincidence
///
/// The pipeline is: area ratio → rational approximation `p/q` → canonical supercell
/// matrices of determinant `p` (lattice 1) and `q` (lattice 2) → exhaustive search over
/// matrix pairs and the rotation sweep for the smallest RMS mismatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeMatcher {
    max_supercell_size: u32,
    max_error: f64,
    sweep: AngleSweep,
}

impl LatticeMatcher {
    /// Create a matcher. Parameters are checked when matching.
    pub fn new(max_supercell_size: u32, max_error: f64, sweep: AngleSweep) -> Self {
        LatticeMatcher {
            max_supercell_size,
            max_error,
            sweep,
        }
    }

    pub fn from_config(config: &MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.max_supercell_size,
            config.max_error,
            AngleSweep::new(config.angle_step_degrees)?,
        ))
    }

    pub fn max_supercell_size(&self) -> u32 {
        self.max_supercell_size
    }

    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    pub fn sweep(&self) -> &AngleSweep {
        &self.sweep
    }

    /// Run the full matching pipeline.
    ///
    /// Fails with [`MatchError::InvalidInput`] for out-of-range parameters or a non-finite
    /// best mismatch, and with [`MatchError::NoCandidateFound`] when the rationalized ratio
    /// has a zero term.
    /// A ratio that could not be rationalized within `max_error` still produces a result,
    /// with [`MatchResult::tolerance_met`] returning `false`.
    pub fn match_lattices(
        &self,
        lattice_1: &Lattice2D,
        lattice_2: &Lattice2D,
    ) -> Result<MatchResult> {
        validate_max_supercell_size(self.max_supercell_size)?;
        validate_max_error(self.max_error)?;

        let ratio = area_ratio(lattice_1, lattice_2);
        debug!("Area ratio (lattice 2 / lattice 1): {ratio}");

        let approximation = rationalize_ratio(ratio, self.max_supercell_size, self.max_error)?;
        let (p, q) = approximation.as_pair();

        let candidates_1 = enumerate_supercell_matrices(p);
        let candidates_2 = enumerate_supercell_matrices(q);
        debug!(
            "{} candidates for lattice 1 (n = {p}), {} for lattice 2 (n = {q}), {} angles at {}°",
            candidates_1.len(),
            candidates_2.len(),
            self.sweep.len(),
            self.sweep.step_degrees()
        );

        let best = find_best_match(
            lattice_1,
            lattice_2,
            &candidates_1,
            &candidates_2,
            self.sweep,
        )
        .ok_or(MatchError::NoCandidateFound {
            numerator: p,
            denominator: q,
        })?;
        if !best.rms_error.is_finite() {
            return Err(MatchError::invalid_input(format!(
                "mismatch of {} / {} at {}° is not finite; lattice scale out of range",
                best.matrix_1, best.matrix_2, best.angle_degrees
            )));
        }

        let result = MatchResult {
            matrix_1: best.matrix_1,
            matrix_2: best.matrix_2,
            angle_degrees: best.angle_degrees,
            rms_error: best.rms_error,
            approximation,
            candidates_evaluated: candidates_1.len() * candidates_2.len() * self.sweep.len(),
        };
        debug!(
            "Best match: {} / {} at {}° with rms error {:.6e}",
            result.matrix_1, result.matrix_2, result.angle_degrees, result.rms_error
        );
        Ok(result)
    }
}

/// Match two lattices in one call, see [`LatticeMatcher::match_lattices`].
pub fn match_lattices(
    lattice_1: &Lattice2D,
    lattice_2: &Lattice2D,
    max_supercell_size: u32,
    max_error: f64,
    sweep: AngleSweep,
) -> Result<MatchResult> {
    LatticeMatcher::new(max_supercell_size, max_error, sweep).match_lattices(lattice_1, lattice_2)
}
