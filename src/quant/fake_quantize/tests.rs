//! Tests for fake quantization.

use super::*;
use crate::error::QatError;
use crate::Tensor;
use approx::assert_abs_diff_eq;
use proptest::prelude::*;

// ========================================================================
// PROPERTY TESTS - Fake quantization correctness
// ========================================================================

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(200))]

    /// STE backward should always pass gradients unchanged
    #[test]
    fn prop_ste_backward_identity(
        grad in prop::collection::vec(-10.0f32..10.0, 1..32),
    ) {
        let grad_tensor = Tensor::from_vec(grad.clone(), true);
        let fq = FakeQuantize::from_range(FakeQuantConfig::q8(), -1.0, 1.0).unwrap();

        let backward = fq.backward(&grad_tensor);

        prop_assert_eq!(backward.len(), grad.len());
        for (i, &g) in grad.iter().enumerate() {
            prop_assert!(
                (backward.data()[i] - g).abs() < 1e-6,
                "STE should preserve gradient at index {}", i
            );
        }
    }

    /// Outputs should sit on the integer grid of the nudged range
    #[test]
    fn prop_fake_quantize_produces_grid_values(
        values in prop::collection::vec(-5.0f32..5.0, 4..32),
        min in -4.0f32..-0.1,
        max in 0.1f32..4.0,
        bits in 4usize..9,
    ) {
        let fq = FakeQuantize::from_range(FakeQuantConfig::new(bits, false).unwrap(), min, max).unwrap();
        let output = fq.forward(&Tensor::from_vec(values, false));

        for &val in output.data() {
            let level = (val - fq.nudged_min) / fq.scale();
            prop_assert!(
                (level - level.round()).abs() < 1e-3,
                "Value {} is not on the grid (level={}, scale={})",
                val, level, fq.scale()
            );
        }
    }

    /// Output should be bounded by the nudged range
    #[test]
    fn prop_fake_quantize_bounded_output(
        values in prop::collection::vec(-100.0f32..100.0, 4..32),
        min in -10.0f32..0.0,
        max in 0.0f32..10.0,
        bits in 2usize..9,
        narrow_range in any::<bool>(),
    ) {
        let fq = FakeQuantize::from_range(FakeQuantConfig::new(bits, narrow_range).unwrap(), min, max)
            .unwrap();
        let output = fq.forward(&Tensor::from_vec(values, false));

        for &val in output.data() {
            prop_assert!(
                val >= fq.nudged_min - 1e-5 && val <= fq.nudged_max + 1e-5,
                "Output {} should be in [{}, {}]",
                val, fq.nudged_min, fq.nudged_max
            );
        }
    }

    /// Zero must be exactly representable whenever the range contains it
    #[test]
    fn prop_zero_is_exact(
        min in -10.0f32..0.0,
        max in 0.01f32..10.0,
        bits in 2usize..9,
    ) {
        let fq = FakeQuantize::from_range(FakeQuantConfig::new(bits, false).unwrap(), min, max).unwrap();
        let output = fq.forward(&Tensor::from_vec(vec![0.0], false));
        prop_assert!(output.data()[0].abs() < 1e-6, "0.0 mapped to {}", output.data()[0]);
    }

    /// In-range values should move by at most half a step
    #[test]
    fn prop_in_range_error_bounded(
        values in prop::collection::vec(-1.0f32..1.0, 1..32),
    ) {
        let fq = FakeQuantize::from_range(FakeQuantConfig::q8(), -1.0, 1.0).unwrap();
        let output = fq.forward(&Tensor::from_vec(values.clone(), false));

        for (&orig, &out) in values.iter().zip(output.data().iter()) {
            if orig >= fq.nudged_min && orig <= fq.nudged_max {
                prop_assert!((orig - out).abs() <= fq.scale() / 2.0 + 1e-5);
            }
        }
    }

    /// Number of quantization levels should be correct
    #[test]
    fn prop_num_levels_correct(bits in 2usize..12) {
        prop_assert_eq!(FakeQuantConfig::new(bits, false).unwrap().num_levels(), 1 << bits);
        prop_assert_eq!(FakeQuantConfig::new(bits, true).unwrap().num_levels(), (1 << bits) - 1);
    }
}

// ========================================================================
// UNIT TESTS
// ========================================================================

#[test]
fn test_fake_quant_config_new() {
    let config = FakeQuantConfig::new(4, false).unwrap();
    assert_eq!(config.bits, 4);
    assert!(!config.narrow_range);
    assert_eq!(config.qmin, 0);
    assert_eq!(config.qmax, 15);

    let narrow = FakeQuantConfig::new(8, true).unwrap();
    assert_eq!(narrow.qmin, 1);
    assert_eq!(narrow.qmax, 255);
}

#[test]
fn test_fake_quant_config_default() {
    let config = FakeQuantConfig::default();
    assert_eq!(config, FakeQuantConfig::q8());
    assert_eq!(config.num_levels(), 256);
}

#[test]
fn test_nudging_shifts_zero_point() {
    // scale = 4/255, zero point from min = 63.75 -> 64
    let fq = FakeQuantize::from_range(FakeQuantConfig::q8(), -1.0, 3.0).unwrap();

    assert_abs_diff_eq!(fq.scale(), 4.0 / 255.0, epsilon = 1e-7);
    assert_eq!(fq.zero_point(), 64);
    assert_abs_diff_eq!(fq.nudged_min, -64.0 * 4.0 / 255.0, epsilon = 1e-6);
    assert_abs_diff_eq!(fq.nudged_max, 191.0 * 4.0 / 255.0, epsilon = 1e-5);
}

#[test]
fn test_nudging_range_without_zero() {
    // A strictly positive range is pulled down so that it starts at zero
    let fq = FakeQuantize::from_range(FakeQuantConfig::q8(), 2.0, 4.0).unwrap();

    assert_eq!(fq.zero_point(), 0);
    assert_abs_diff_eq!(fq.nudged_min, 0.0, epsilon = 1e-7);
    assert_abs_diff_eq!(fq.nudged_max, 2.0, epsilon = 1e-5);
}

#[test]
fn test_forward_clamps_and_rounds() {
    let fq = FakeQuantize::from_range(FakeQuantConfig::q8(), 0.0, 6.0).unwrap();
    let input = Tensor::from_vec(vec![-1.0, 0.0, 3.0, 6.0, 9.0], true);

    let output = fq.forward(&input);

    assert!(output.requires_grad());
    assert_abs_diff_eq!(output.data()[0], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(output.data()[1], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(output.data()[2], 3.0, epsilon = 6.0 / 255.0);
    assert_abs_diff_eq!(output.data()[3], 6.0, epsilon = 1e-5);
    assert_abs_diff_eq!(output.data()[4], 6.0, epsilon = 1e-5);
}

#[test]
fn test_degenerate_range_uses_min_scale() {
    let fq = FakeQuantize::from_range(FakeQuantConfig::q8(), 0.0, 0.0).unwrap();
    assert_abs_diff_eq!(fq.scale(), MIN_SCALE);

    let output = fq.forward(&Tensor::from_vec(vec![5.0, -5.0], false));
    for &val in output.data() {
        assert!(val.abs() < 1e-6);
    }
}

#[test]
fn test_invalid_range_rejected() {
    let inverted = FakeQuantize::from_range(FakeQuantConfig::q8(), 1.0, -1.0);
    assert!(matches!(inverted, Err(QatError::InvalidRange { .. })));

    let nan = FakeQuantize::from_range(FakeQuantConfig::q8(), f32::NAN, 1.0);
    assert!(matches!(nan, Err(QatError::InvalidRange { .. })));

    let inf = FakeQuantize::from_range(FakeQuantConfig::q8(), 0.0, f32::INFINITY);
    assert!(matches!(inf, Err(QatError::InvalidRange { .. })));
}

#[test]
fn test_clamped_ste_backward() {
    let fq = FakeQuantize::from_range(FakeQuantConfig::q8(), 0.0, 6.0).unwrap();
    let grad = Tensor::from_vec(vec![1.0, 1.0, 1.0], true);
    let input = Tensor::from_vec(vec![0.5, 10.0, -10.0], false);

    let backward = fq.backward_clamped(&grad, &input).unwrap();

    assert_abs_diff_eq!(backward.data()[0], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(backward.data()[1], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(backward.data()[2], 0.0, epsilon = 1e-6);
}

#[test]
fn test_clamped_ste_backward_shape_mismatch() {
    let fq = FakeQuantize::from_range(FakeQuantConfig::q8(), 0.0, 6.0).unwrap();
    let grad = Tensor::from_vec(vec![1.0, 1.0], true);
    let input = Tensor::from_vec(vec![0.5], false);

    let err = fq.backward_clamped(&grad, &input).unwrap_err();
    assert!(matches!(err, QatError::ShapeMismatch { .. }));
}

#[test]
fn test_fake_quantize_convenience_function() {
    let input = Tensor::from_vec(vec![0.0, 1.0, -1.0], false);

    let output = fake_quantize(&input, -1.0, 1.0, 8, false).unwrap();

    assert_eq!(output.len(), 3);
    assert_abs_diff_eq!(output.data()[0], 0.0, epsilon = 1e-6);
    assert!(fake_quantize(&input, 1.0, -1.0, 8, false).is_err());
}

#[test]
fn test_ste_backward_convenience_function() {
    let grad = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);

    let backward = ste_backward(&grad);

    for i in 0..3 {
        assert_abs_diff_eq!(backward.data()[i], grad.data()[i], epsilon = 1e-6);
    }
}

#[test]
fn test_quantize_dequantize_round_trip() {
    let input = Tensor::from_vec(vec![0.0, 0.5, 1.0, -0.5, -1.0], false);
    let fq = FakeQuantize::from_range(FakeQuantConfig::q8(), -1.0, 1.0).unwrap();

    let output = fq.forward(&input);

    for (i, (&orig, &out)) in input.data().iter().zip(output.data().iter()).enumerate() {
        let error = (orig - out).abs();
        assert!(error < 0.01, "Error {error} at index {i} too large: {orig} vs {out}");
    }
}

#[test]
fn test_num_levels() {
    let fq4 = FakeQuantize::from_range(FakeQuantConfig::q4(), -1.0, 1.0).unwrap();
    assert_eq!(fq4.num_levels(), 16);

    let narrow = FakeQuantize::from_range(FakeQuantConfig::new(8, true).unwrap(), -1.0, 1.0).unwrap();
    assert_eq!(narrow.num_levels(), 255);
}

#[test]
fn test_config_rejects_unsupported_bits() {
    for bits in [0, 1, MAX_BITS + 1, 31, 32, 64] {
        let err = FakeQuantConfig::new(bits, false).unwrap_err();
        assert!(matches!(err, QatError::InvalidConfig { ref field, .. } if field == "num_bits"));
    }
    assert!(FakeQuantConfig::new(MIN_BITS, true).is_ok());
    assert!(FakeQuantConfig::new(MAX_BITS, false).is_ok());
}

#[test]
fn test_fake_quantize_rejects_unsupported_bits() {
    let input = Tensor::from_vec(vec![0.0, 1.0, -1.0], false);

    for bits in [0, 1, 32] {
        let err = fake_quantize(&input, -1.0, 1.0, bits, false).unwrap_err();
        assert_eq!(err.code(), "Q002");
    }
}

#[test]
fn test_overflowing_range_rejected() {
    // max - min overflows f32 even though both bounds are finite
    let err = FakeQuantize::from_range(FakeQuantConfig::q8(), -3.0e38, 3.0e38).unwrap_err();
    assert!(matches!(err, QatError::InvalidRange { .. }));

    let err = FakeQuantize::from_range(FakeQuantConfig::q8(), -f32::MAX, f32::MAX).unwrap_err();
    assert!(matches!(err, QatError::InvalidRange { .. }));
}

#[test]
fn test_empty_grid_rejected() {
    let config = FakeQuantConfig {
        bits: 0,
        narrow_range: false,
        qmin: 0,
        qmax: 0,
    };
    let err = FakeQuantize::from_range(config, -1.0, 1.0).unwrap_err();
    assert!(matches!(err, QatError::InvalidRange { .. }));
}

#[test]
fn test_large_finite_range_accepted() {
    let fq = FakeQuantize::from_range(FakeQuantConfig::q8(), -1.0e38, 1.0e38).unwrap();
    assert!(fq.nudged_min.is_finite() && fq.nudged_max.is_finite());

    let output = fq.forward(&Tensor::from_vec(vec![f32::MAX, -f32::MAX, 0.0], false));
    assert!(output.data().iter().all(|v| v.is_finite()));
}
