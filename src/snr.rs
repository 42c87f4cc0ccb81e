use crate::error::{Result, SnrError};
use crate::models::SnrResult;

/// Mean of squared samples.
pub fn signal_power(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    sum_sq / samples.len() as f64
}

/// Mean of squared per-sample differences between `reference` and `test`.
pub fn noise_power(reference: &[f32], test: &[f32]) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = reference
        .iter()
        .zip(test)
        .map(|(&r, &t)| {
            let d = r as f64 - t as f64;
            d * d
        })
        .sum();
    sum_sq / reference.len() as f64
}

/// Compute the SNR of `test` against `reference` in decibels.
///
/// Both slices must have the same, non-zero length (see [`crate::align::align`]).
///
/// Noise power is compared against zero exactly, without a tolerance: only
/// bit-identical signals yield [`SnrResult::PerfectReconstruction`]. A tiny
/// but nonzero difference produces a large finite value instead.
///
/// A silent reference measured against a nonzero difference has no meaningful
/// ratio and is reported as [`SnrError::DegenerateSignal`], as are signals
/// containing NaN or infinite samples.
pub fn compute_snr(reference: &[f32], test: &[f32]) -> Result<SnrResult> {
    if reference.len() != test.len() {
        return Err(SnrError::LengthMismatch {
            reference: reference.len(),
            test: test.len(),
        });
    }
    if reference.is_empty() {
        return Err(SnrError::DegenerateSignal(
            "cannot measure SNR of an empty signal".to_string(),
        ));
    }

    let noise = noise_power(reference, test);
    if !noise.is_finite() {
        return Err(SnrError::DegenerateSignal(
            "signal contains non-finite samples".to_string(),
        ));
    }
    if noise == 0.0 {
        return Ok(SnrResult::PerfectReconstruction);
    }

    let signal = signal_power(reference);
    if !signal.is_finite() {
        return Err(SnrError::DegenerateSignal(
            "signal contains non-finite samples".to_string(),
        ));
    }
    if signal == 0.0 {
        return Err(SnrError::DegenerateSignal(
            "reference signal is silent".to_string(),
        ));
    }

    Ok(SnrResult::Finite(10.0 * (signal / noise).log10()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identical_constant_signal_is_perfect() {
        let a = [1.0f32, 1.0, 1.0, 1.0];
        assert_eq!(compute_snr(&a, &a).unwrap(), SnrResult::PerfectReconstruction);
    }

    #[test]
    fn test_half_amplitude_is_six_db() {
        let reference = [1.0f32, -1.0, 1.0, -1.0];
        let test = [0.5f32, -0.5, 0.5, -0.5];
        assert_relative_eq!(signal_power(&reference), 1.0);
        assert_relative_eq!(noise_power(&reference, &test), 0.25);

        match compute_snr(&reference, &test).unwrap() {
            SnrResult::Finite(db) => assert_relative_eq!(db, 6.0206, epsilon = 1e-3),
            other => panic!("expected finite SNR, got {:?}", other),
        }
    }

    #[test]
    fn test_matches_power_ratio_formula() {
        let reference: Vec<f32> = (0..64).map(|i| ((i as f32) * 0.3).sin()).collect();
        let test: Vec<f32> = reference
            .iter()
            .enumerate()
            .map(|(i, &s)| s + if i % 2 == 0 { 0.01 } else { -0.02 })
            .collect();

        let expected = 10.0 * (signal_power(&reference) / noise_power(&reference, &test)).log10();
        match compute_snr(&reference, &test).unwrap() {
            SnrResult::Finite(db) => assert_relative_eq!(db, expected, epsilon = 1e-9),
            other => panic!("expected finite SNR, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_snr_when_noise_dominates() {
        let reference = [0.1f32, 0.1];
        let test = [-0.9f32, -0.9];
        match compute_snr(&reference, &test).unwrap() {
            SnrResult::Finite(db) => assert!(db < 0.0, "expected negative SNR, got {}", db),
            other => panic!("expected finite SNR, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_noise_check_is_exact() {
        // A one-ulp difference must stay on the finite path.
        let reference = [0.5f32, 0.5];
        let test = [0.5f32, f32::from_bits(0.5f32.to_bits() + 1)];
        match compute_snr(&reference, &test).unwrap() {
            SnrResult::Finite(db) => assert!(db > 100.0, "expected very high SNR, got {}", db),
            other => panic!("expected finite SNR, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_degenerate() {
        assert!(matches!(
            compute_snr(&[], &[]),
            Err(SnrError::DegenerateSignal(_))
        ));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        assert!(matches!(
            compute_snr(&[1.0, 2.0], &[1.0]),
            Err(SnrError::LengthMismatch { reference: 2, test: 1 })
        ));
    }

    #[test]
    fn test_silent_reference_with_noise_is_degenerate() {
        let reference = [0.0f32; 4];
        let test = [0.1f32; 4];
        assert!(matches!(
            compute_snr(&reference, &test),
            Err(SnrError::DegenerateSignal(_))
        ));
    }

    #[test]
    fn test_silent_signals_are_identical() {
        let silence = [0.0f32; 8];
        assert_eq!(
            compute_snr(&silence, &silence).unwrap(),
            SnrResult::PerfectReconstruction
        );
    }

    #[test]
    fn test_non_finite_samples_are_degenerate() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let reference = [bad, 0.5];
            let clean = [0.0f32, 0.5];
            assert!(matches!(
                compute_snr(&reference, &clean),
                Err(SnrError::DegenerateSignal(_))
            ));
            assert!(matches!(
                compute_snr(&clean, &reference),
                Err(SnrError::DegenerateSignal(_))
            ));
            // Self-comparison must not pass for a perfect or finite result either.
            assert!(matches!(
                compute_snr(&reference, &reference),
                Err(SnrError::DegenerateSignal(_))
            ));
        }
    }
}
