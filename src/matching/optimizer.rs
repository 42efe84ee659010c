use log::trace;
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

use crate::config::{FULL_TURN_DEGREES, validate_angle_step};
use crate::error::Result;
use crate::lattice::{Lattice2D, TransformMatrix, rotate_rows, rotation_matrix};

// Keeps a step that divides the full turn from producing a duplicate 360° sample
const ANGLE_COUNT_SLACK: f64 = 1e-9;

/// Discretized rotation sweep over [0°, 360°)
///
/// Samples the angles `k * step` for every `k` with `k * step < 360°`. The step is the
/// angular resolution of the search and must be chosen explicitly: a finer step resolves
/// the relative rotation better at proportionally higher cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSweep {
    step_degrees: f64,
}

impl AngleSweep {
    pub fn new(step_degrees: f64) -> Result<Self> {
        validate_angle_step(step_degrees)?;
        Ok(AngleSweep { step_degrees })
    }

    /// Only the unrotated orientation (0°).
    pub fn fixed() -> Self {
        AngleSweep {
            step_degrees: FULL_TURN_DEGREES,
        }
    }

    pub fn step_degrees(&self) -> f64 {
        self.step_degrees
    }

    /// Number of sampled angles
    pub fn len(&self) -> usize {
        ((FULL_TURN_DEGREES / self.step_degrees - ANGLE_COUNT_SLACK).ceil() as usize).max(1)
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn angle(&self, index: usize) -> f64 {
        index as f64 * self.step_degrees
    }

    pub fn angles(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |k| self.angle(k))
    }
}

/// One point of the search space together with its mismatch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateEvaluation {
    pub matrix_1: TransformMatrix,
    pub matrix_2: TransformMatrix,
    pub angle_degrees: f64,
    pub rms_error: f64,
}

/// Root mean square of the element-wise differences of two 2x2 matrices.
pub fn rms_mismatch(a: &Matrix2<f64>, b: &Matrix2<f64>) -> f64 {
    ((a - b).norm_squared() / 4.0).sqrt()
}

/// Mismatch between `rotate(lattice_1 · matrix_1, angle)` and `lattice_2 · matrix_2`.
pub fn evaluate_candidate(
    lattice_1: &Lattice2D,
    lattice_2: &Lattice2D,
    matrix_1: &TransformMatrix,
    matrix_2: &TransformMatrix,
    angle_degrees: f64,
) -> CandidateEvaluation {
    let supercell_1 = rotate_rows(lattice_1.transformed(matrix_1).basis(), angle_degrees);
    let supercell_2 = lattice_2.transformed(matrix_2);
    CandidateEvaluation {
        matrix_1: *matrix_1,
        matrix_2: *matrix_2,
        angle_degrees,
        rms_error: rms_mismatch(&supercell_1, supercell_2.basis()),
    }
}

/// Lazy evaluation of every `(matrix_1, matrix_2, angle)` triple.
///
/// Iteration order is `matrix_1` (outermost), then `matrix_2`, then angle. Each item is
/// computed independently of all others.
#[derive(Debug, Clone)]
pub struct CandidateEvaluations<'a> {
    candidates_1: &'a [TransformMatrix],
    candidates_2: &'a [TransformMatrix],
    supercells_1: Vec<Matrix2<f64>>,
    supercells_2: Vec<Matrix2<f64>>,
    sweep: AngleSweep,
    // Transposed rotations, one per sampled angle
    rotations: Vec<Matrix2<f64>>,
    index: usize,
    total: usize,
}

impl<'a> CandidateEvaluations<'a> {
    pub fn new(
        lattice_1: &Lattice2D,
        lattice_2: &Lattice2D,
        candidates_1: &'a [TransformMatrix],
        candidates_2: &'a [TransformMatrix],
        sweep: AngleSweep,
    ) -> Self {
        let supercells_1 = candidates_1
            .iter()
            .map(|m| *lattice_1.transformed(m).basis())
            .collect();
        let supercells_2 = candidates_2
            .iter()
            .map(|m| *lattice_2.transformed(m).basis())
            .collect();
        let rotations = sweep
            .angles()
            .map(|angle| rotation_matrix(angle).transpose())
            .collect();

        CandidateEvaluations {
            candidates_1,
            candidates_2,
            supercells_1,
            supercells_2,
            sweep,
            rotations,
            index: 0,
            total: candidates_1.len() * candidates_2.len() * sweep.len(),
        }
    }
}

impl Iterator for CandidateEvaluations<'_> {
    type Item = CandidateEvaluation;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.total {
            return None;
        }

        let n_angles = self.rotations.len();
        let per_matrix_1 = self.candidates_2.len() * n_angles;
        let i = self.index / per_matrix_1;
        let j = (self.index % per_matrix_1) / n_angles;
        let k = self.index % n_angles;
        self.index += 1;

        let rotated_1 = self.supercells_1[i] * self.rotations[k];
        Some(CandidateEvaluation {
            matrix_1: self.candidates_1[i],
            matrix_2: self.candidates_2[j],
            angle_degrees: self.sweep.angle(k),
            rms_error: rms_mismatch(&rotated_1, &self.supercells_2[j]),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CandidateEvaluations<'_> {}

pub fn candidate_evaluations<'a>(
    lattice_1: &Lattice2D,
    lattice_2: &Lattice2D,
    candidates_1: &'a [TransformMatrix],
    candidates_2: &'a [TransformMatrix],
    sweep: AngleSweep,
) -> CandidateEvaluations<'a> {
    CandidateEvaluations::new(lattice_1, lattice_2, candidates_1, candidates_2, sweep)
}

/// Reduction step of the search: the challenger wins only with a strictly smaller error,
/// so among equal errors the one seen first is kept.
pub fn keep_first_minimum(
    best: CandidateEvaluation,
    challenger: CandidateEvaluation,
) -> CandidateEvaluation {
    if challenger.rms_error.total_cmp(&best.rms_error).is_lt() {
        challenger
    } else {
        best
    }
}

/// Exhaustive search for the triple with the smallest RMS mismatch.
///
/// Returns `None` when either candidate list is empty.
pub fn find_best_match(
    lattice_1: &Lattice2D,
    lattice_2: &Lattice2D,
    candidates_1: &[TransformMatrix],
    candidates_2: &[TransformMatrix],
    sweep: AngleSweep,
) -> Option<CandidateEvaluation> {
    candidate_evaluations(lattice_1, lattice_2, candidates_1, candidates_2, sweep).reduce(
        |best, challenger| {
            let kept = keep_first_minimum(best, challenger);
            if kept != best {
                trace!(
                    "New best: {} / {} at {:.3}° (rms {:.6e})",
                    kept.matrix_1, kept.matrix_2, kept.angle_degrees, kept.rms_error
                );
            }
            kept
        },
    )
}
