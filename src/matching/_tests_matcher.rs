#[cfg(test)]
mod _tests_matcher {
    use super::super::matcher::{LatticeMatcher, MatchResult, match_lattices};
    use super::super::optimizer::AngleSweep;
    use crate::config::MatchConfig;
    use crate::error::MatchError;
    use crate::lattice::{
        Lattice2D, TransformMatrix, hexagonal_lattice, oblique_lattice, rectangular_lattice,
        square_lattice,
    };
    use nalgebra::Matrix3;

    const TOL: f64 = 1e-9;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn coarse() -> AngleSweep {
        AngleSweep::new(1.0).unwrap()
    }

    fn fine() -> AngleSweep {
        AngleSweep::new(0.1).unwrap()
    }

    fn unit_square() -> Lattice2D {
        Lattice2D::from_rows([[1.0, 0.0], [0.0, 1.0]]).unwrap()
    }

    fn assert_equal_area_supercells(
        result: &MatchResult,
        lattice_1: &Lattice2D,
        lattice_2: &Lattice2D,
    ) {
        let area_1 = lattice_1.cell_area() * result.matrix_1.determinant() as f64;
        let area_2 = lattice_2.cell_area() * result.matrix_2.determinant() as f64;
        assert!(
            (area_1 - area_2).abs() / area_2 < 0.01,
            "Supercell areas differ: {} vs {}",
            area_1,
            area_2
        );
    }

    // ==================== Identical lattices ====================

    #[test]
    fn test_identical_lattices_match_with_identity() {
        init_logger();
        let lattices = [
            unit_square(),
            square_lattice(5.653).unwrap(),
            hexagonal_lattice(2.46).unwrap(),
            rectangular_lattice(4.02, 4.46).unwrap(),
            oblique_lattice(1.0, 1.7, 71.0).unwrap(),
        ];
        for lattice in lattices {
            for max_supercell_size in [1, 20, 100] {
                let result = match_lattices(&lattice, &lattice, max_supercell_size, 0.01, coarse())
                    .unwrap();
                assert!(result.rms_error < TOL, "rms = {}", result.rms_error);
                assert!(result.matrix_1.is_identity(), "matrix_1 = {}", result.matrix_1);
                assert!(result.matrix_2.is_identity(), "matrix_2 = {}", result.matrix_2);
                assert_eq!(result.angle_degrees, 0.0);
                assert!(result.tolerance_met());
            }
        }
    }

    // ==================== Scaled lattices ====================

    #[test]
    fn test_unit_lattice_against_doubled_lattice() {
        init_logger();
        let lattice_1 = unit_square();
        let lattice_2 = Lattice2D::from_rows([[2.0, 0.0], [0.0, 2.0]]).unwrap();

        let result = match_lattices(&lattice_1, &lattice_2, 20, 0.01, coarse()).unwrap();

        assert!(result.rms_error < TOL, "rms = {}", result.rms_error);
        assert_eq!(result.matrix_1.determinant(), 4);
        assert_eq!(result.matrix_1, TransformMatrix::new(2, 0, 2).unwrap());
        assert!(result.matrix_2.is_identity());
        assert_eq!(result.approximation.as_pair(), (4, 1));
        assert_equal_area_supercells(&result, &lattice_1, &lattice_2);

        let (t1, t2) = result.transformed_bases(&lattice_1, &lattice_2);
        assert!((t1 - t2).norm() < TOL);
    }

    #[test]
    fn test_scaled_lattices_find_square_multiplicity() {
        init_logger();
        for lattice in [
            square_lattice(1.0).unwrap(),
            hexagonal_lattice(3.18).unwrap(),
        ] {
            for k in [2u32, 3, 4] {
                let scaled = lattice.scaled(k as f64).unwrap();
                let result = match_lattices(&lattice, &scaled, 20, 0.01, coarse()).unwrap();

                assert!(
                    result.rms_error < 1e-8,
                    "rms = {} for scale {}",
                    result.rms_error,
                    k
                );
                assert_eq!(result.matrix_1.determinant(), (k * k) as u64);
                assert_eq!(result.matrix_1, TransformMatrix::new(k, 0, k).unwrap());
                assert!(result.matrix_2.is_identity());
            }
        }
    }

    #[test]
    fn test_larger_lattice_first_puts_supercell_on_lattice_2() {
        let lattice_1 = square_lattice(3.0).unwrap();
        let lattice_2 = square_lattice(1.0).unwrap();

        let result = match_lattices(&lattice_1, &lattice_2, 20, 0.01, coarse()).unwrap();

        assert!(result.rms_error < TOL);
        assert!(result.matrix_1.is_identity());
        assert_eq!(result.matrix_2, TransformMatrix::new(3, 0, 3).unwrap());
        assert_eq!(result.approximation.as_pair(), (1, 9));
    }

    // ==================== Rotation recovery ====================

    #[test]
    fn test_recovers_thirty_degree_rotation() {
        init_logger();
        let lattice_1 = unit_square();
        let lattice_2 = unit_square().scaled(2.0).unwrap().rotated(30.0).unwrap();

        for sweep in [coarse(), fine()] {
            let result = match_lattices(&lattice_1, &lattice_2, 20, 0.01, sweep).unwrap();
            assert!(
                (result.angle_degrees - 30.0).abs() <= sweep.step_degrees(),
                "Angle = {} with step {}",
                result.angle_degrees,
                sweep.step_degrees()
            );
            assert!(result.rms_error < 1e-8, "rms = {}", result.rms_error);
            assert_eq!(result.matrix_1.determinant(), 4);
            assert!(result.matrix_2.is_identity());
        }
    }

    #[test]
    fn test_fine_resolution_converges_between_coarse_steps() {
        let lattice_1 = unit_square();
        let lattice_2 = unit_square().scaled(2.0).unwrap().rotated(30.5).unwrap();

        let coarse_result = match_lattices(&lattice_1, &lattice_2, 20, 0.01, coarse()).unwrap();
        let fine_result = match_lattices(&lattice_1, &lattice_2, 20, 0.01, fine()).unwrap();

        assert!(
            (coarse_result.angle_degrees - 30.5).abs() <= 0.5 + TOL,
            "Coarse angle = {}",
            coarse_result.angle_degrees
        );
        assert!(coarse_result.rms_error > 1e-3);
        assert!((fine_result.angle_degrees - 30.5).abs() < 1e-6);
        assert!(fine_result.rms_error < 1e-8);
        assert!(fine_result.rms_error < coarse_result.rms_error);
        assert_eq!(
            fine_result.candidates_evaluated,
            10 * coarse_result.candidates_evaluated
        );
    }

    #[test]
    fn test_fixed_orientation_sweep() {
        let lattice_1 = unit_square();
        let lattice_2 = unit_square().scaled(2.0).unwrap().rotated(30.0).unwrap();

        let result =
            match_lattices(&lattice_1, &lattice_2, 20, 0.01, AngleSweep::fixed()).unwrap();
        assert_eq!(result.angle_degrees, 0.0);
        assert!(result.rms_error > 0.1);
    }

    // ==================== Real materials ====================

    #[test]
    fn test_gaas_on_cdte() {
        init_logger();
        let gaas = square_lattice(5.653).unwrap();
        let cdte = square_lattice(6.481).unwrap();

        let result = match_lattices(&gaas, &cdte, 100, 0.01, coarse()).unwrap();

        assert_eq!(result.approximation.as_pair(), (17, 13));
        assert!(result.tolerance_met());
        assert_eq!(result.matrix_1.determinant(), 17);
        assert_eq!(result.matrix_2.determinant(), 13);
        assert_equal_area_supercells(&result, &gaas, &cdte);
        assert!(result.angle_degrees >= 0.0 && result.angle_degrees < 360.0);
        assert!(result.rms_error.is_finite());
        assert_eq!(result.candidates_evaluated, 18 * 14 * 360);
    }

    #[test]
    fn test_tolerance_not_met_is_flagged_not_failed() {
        let ga = square_lattice(2.66).unwrap();
        let sb2te3 = square_lattice(4.32).unwrap();

        let sweep = AngleSweep::new(10.0).unwrap();
        let result = match_lattices(&ga, &sb2te3, 20, 0.01, sweep).unwrap();

        assert!(!result.tolerance_met());
        assert_eq!(result.approximation.as_pair(), (13, 5));
        assert!(result.approximation.relative_error > 0.01);
    }

    // ==================== Failure paths ====================

    #[test]
    fn test_no_candidate_when_ratio_rationalizes_to_zero() {
        init_logger();
        let small = square_lattice(1.0).unwrap();
        let huge = square_lattice(100.0).unwrap();

        let result = match_lattices(&small, &huge, 20, 0.01, coarse());
        assert!(
            matches!(
                result,
                Err(MatchError::NoCandidateFound {
                    numerator: 1,
                    denominator: 0
                })
            ),
            "Expected no candidates, got {:?}",
            result
        );

        let result = match_lattices(&huge, &small, 20, 0.01, coarse());
        match result {
            Err(err) => assert!(err.is_no_candidate(), "Unexpected error {}", err),
            Ok(r) => panic!("Expected no match, got {:?}", r),
        }
    }

    #[test]
    fn test_invalid_parameters() {
        let lattice = square_lattice(1.0).unwrap();
        for (max_supercell_size, max_error) in [(0, 0.01), (10, 0.0), (10, 1.0), (10, f64::NAN)] {
            let result =
                match_lattices(&lattice, &lattice, max_supercell_size, max_error, coarse());
            assert!(
                matches!(result, Err(MatchError::InvalidInput(_))),
                "({}, {}) should be rejected, got {:?}",
                max_supercell_size,
                max_error,
                result
            );
        }
    }

    #[test]
    fn test_non_finite_inputs_never_reach_a_result() {
        init_logger();
        let lattice = square_lattice(2.0).unwrap();
        assert!(matches!(
            lattice.rotated(f64::NAN),
            Err(MatchError::InvalidInput(_))
        ));
        assert!(matches!(
            lattice.rotated(f64::INFINITY),
            Err(MatchError::InvalidInput(_))
        ));
        assert!(matches!(
            Lattice2D::from_rows([[1e200, 0.0], [0.0, 1e200]]),
            Err(MatchError::InvalidInput(_))
        ));

        // Finite lattices whose difference overflows when squared
        let lattice_1 = square_lattice(1e154).unwrap();
        let lattice_2 = lattice_1.rotated(180.0).unwrap();
        let result = match_lattices(&lattice_1, &lattice_2, 20, 0.01, AngleSweep::fixed());
        assert!(
            matches!(result, Err(MatchError::InvalidInput(_))),
            "Overflowing mismatch should be rejected, got {:?}",
            result
        );
    }

    // ==================== Purity & interfaces ====================

    #[test]
    fn test_repeated_calls_are_identical() {
        let lattice_1 = hexagonal_lattice(2.46).unwrap();
        let lattice_2 = square_lattice(3.1).unwrap().rotated(12.0).unwrap();
        let matcher = LatticeMatcher::new(20, 0.01, AngleSweep::new(2.0).unwrap());

        let first = matcher.match_lattices(&lattice_1, &lattice_2).unwrap();
        let second = matcher.match_lattices(&lattice_1, &lattice_2).unwrap();
        assert_eq!(first, second);
        // Inputs are untouched
        assert!((lattice_2.cell_area() - 3.1 * 3.1).abs() < TOL);
    }

    #[test]
    fn test_matcher_from_config() {
        let config = MatchConfig::from_str(
            r#"
max_supercell_size = 20
max_error = 0.01
angle_step_degrees = 1.0
"#,
        )
        .unwrap();
        let matcher = LatticeMatcher::from_config(&config).unwrap();
        assert_eq!(matcher.max_supercell_size(), 20);
        assert_eq!(matcher.sweep().len(), 360);

        let lattice_1 = unit_square();
        let lattice_2 = unit_square().scaled(2.0).unwrap();
        let via_config = matcher.match_lattices(&lattice_1, &lattice_2).unwrap();
        let direct = match_lattices(&lattice_1, &lattice_2, 20, 0.01, coarse()).unwrap();
        assert_eq!(via_config, direct);

        let bad = MatchConfig::new(20, 0.01, 0.0);
        assert!(matches!(
            LatticeMatcher::from_config(&bad),
            Err(MatchError::Config(_))
        ));
    }

    #[test]
    fn test_result_feeds_3d_supercell_builder() {
        let lattice_1 = unit_square();
        let lattice_2 = unit_square().scaled(2.0).unwrap();
        let result = match_lattices(&lattice_1, &lattice_2, 20, 0.01, coarse()).unwrap();

        let (m1, m2) = result.scaling_matrices_3d();
        assert_eq!(m1, Matrix3::new(2, 0, 0, 0, 2, 0, 0, 0, 1));
        assert_eq!(m2, Matrix3::identity());

        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["matrix_1"], serde_json::json!([[2, 0], [0, 2]]));
        assert_eq!(json["matrix_2"], serde_json::json!([[1, 0], [0, 1]]));
        let back: MatchResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
