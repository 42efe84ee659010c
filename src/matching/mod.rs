// Matching module: finds commensurate supercells of two 2D lattices
// Pipeline: area ratio -> rational approximation -> supercell enumeration -> mismatch search

// ======================== MODULE DECLARATIONS ========================
pub mod area_ratio;
pub mod matcher;
pub mod optimizer;
pub mod rationalize;
pub mod supercell_enumeration;

mod _tests_matcher;

// ======================== AREA RATIO ========================
pub use area_ratio::area_ratio; // fn(lattice_1: &Lattice2D, lattice_2: &Lattice2D) -> f64 - |a2 x b2| / |a1 x b1|

// ======================== RATIONALIZATION ========================
pub use rationalize::{
    RationalApproximation, // struct - numerator/denominator with relative error and tolerance flag
    rationalize_ratio, // fn(ratio: f64, max_denominator: u32, max_error: f64) -> Result<RationalApproximation>
};

// ======================== SUPERCELL ENUMERATION ========================
pub use supercell_enumeration::{
    count_supercell_matrices,     // fn(n: u32) -> u64 - divisor sum of n
    enumerate_supercell_matrices, // fn(n: u32) -> Vec<TransformMatrix> - all canonical matrices with det n
    supercell_matrices,           // fn(n: u32) -> impl Iterator<Item = TransformMatrix> - lazy variant
};

// ======================== MISMATCH SEARCH ========================
pub use optimizer::{
    AngleSweep,           // struct - explicit angular resolution over [0°, 360°)
    CandidateEvaluation,  // struct - (matrix_1, matrix_2, angle) with its rms error
    CandidateEvaluations, // struct - lazy iterator over the search space
    candidate_evaluations, // fn(...) -> CandidateEvaluations - matrix_1 outer, matrix_2, angle inner
    evaluate_candidate,   // fn(...) -> CandidateEvaluation - single triple
    find_best_match,      // fn(...) -> Option<CandidateEvaluation> - first strict minimum
    keep_first_minimum,   // fn(best, challenger) -> CandidateEvaluation - reduction step
    rms_mismatch,         // fn(a: &Matrix2<f64>, b: &Matrix2<f64>) -> f64
};

// AngleSweep impl methods:
//   new(step_degrees: f64) -> Result<Self>            - step in (0, 360]
//   fixed() -> Self                                               - only 0°
//   len(&self) -> usize, angle(&self, index) -> f64, angles(&self) -> impl Iterator<Item = f64>

// ======================== ORCHESTRATION ========================
pub use matcher::{
    LatticeMatcher, // struct - max supercell size, tolerance and sweep
    MatchResult,    // struct - matrices, angle, rms error, rationalization
    match_lattices, // fn(l1, l2, max_supercell_size, max_error, sweep) -> Result<MatchResult>
};
