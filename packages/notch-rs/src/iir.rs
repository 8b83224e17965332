//! Two-pole/two-zero IIR notch filters
//!
//! A conjugate zero pair sits on the unit circle at the notch angle, giving a
//! null at the target frequency. A conjugate pole pair at the same angle with
//! radius r = 1 - pi * width / fs sets the 3 dB bandwidth: a smaller radius
//! gives a wider notch and a faster-decaying transient.

use crate::error::{NotchError, Result};
use crate::filter::convolve;
use crate::roots;
use crate::types::{FilterPair, NotchPair, TransferFunction};
use rustfft::num_complex::Complex;
use std::f64::consts::PI;

/// Tolerance on the imaginary residue left after expanding conjugate pairs
const IMAGINARY_TOLERANCE: f64 = 1e-9;

/// Pole radius for a notch of the given 3 dB width
pub fn pole_radius(notch_width: f64, sample_rate: f64) -> f64 {
    1.0 - PI * (notch_width / sample_rate)
}

/// Compute the coefficients of a single notch filter
///
/// # Arguments
/// * `notch_freq` - Frequency to remove (Hz), strictly between 0 and Nyquist
/// * `notch_width` - 3 dB width of the notch (Hz), below `sample_rate / pi`
/// * `sample_rate` - Sampling rate (Hz)
///
/// # Returns
/// Numerator `[1, -2cos(theta), 1]` over denominator `[1, -2r cos(theta), r^2]`
pub fn notch_coefficients(
    notch_freq: f64,
    notch_width: f64,
    sample_rate: f64,
) -> Result<TransferFunction> {
    validate_notch(notch_freq, notch_width, sample_rate)?;

    let theta = 2.0 * PI * notch_freq / sample_rate;
    let radius = pole_radius(notch_width, sample_rate);
    if radius <= 0.0 || radius >= 1.0 {
        return Err(NotchError::UnstableDesign { radius });
    }

    let zero = Complex::from_polar(1.0, theta);
    let pole = Complex::from_polar(radius, theta);

    let numerator = expand_conjugate_pair(zero)?;
    let denominator = expand_conjugate_pair(pole)?;
    let tf = TransferFunction::new(numerator.to_vec(), denominator.to_vec());

    let max_radius = roots::max_pole_radius(&tf)?;
    if max_radius >= 1.0 {
        return Err(NotchError::UnstableDesign { radius: max_radius });
    }

    log::debug!(
        "Notch at {} Hz (width {} Hz): theta={:.6} rad, pole radius={:.6}",
        notch_freq,
        notch_width,
        theta,
        radius
    );

    Ok(tf)
}

/// Real coefficients of (1 - p z^-1)(1 - p* z^-1)
fn expand_conjugate_pair(p: Complex<f64>) -> Result<[f64; 3]> {
    let c0 = Complex::new(1.0, 0.0);
    let c1 = -(p + p.conj());
    let c2 = p * p.conj();

    let residue = c1.im.abs().max(c2.im.abs());
    if residue > IMAGINARY_TOLERANCE {
        return Err(NotchError::Numerical(format!(
            "Conjugate pair expansion left imaginary residue {:e}",
            residue
        )));
    }

    Ok([c0.re, c1.re, c2.re])
}

fn validate_notch(notch_freq: f64, notch_width: f64, sample_rate: f64) -> Result<()> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(NotchError::InvalidConfig(format!(
            "Sample rate must be positive, got {} Hz",
            sample_rate
        )));
    }
    let nyquist = sample_rate / 2.0;
    if !notch_freq.is_finite() || notch_freq <= 0.0 || notch_freq >= nyquist {
        return Err(NotchError::InvalidConfig(format!(
            "Notch frequency ({} Hz) must lie strictly between 0 and Nyquist ({} Hz)",
            notch_freq, nyquist
        )));
    }
    if !notch_width.is_finite() || notch_width <= 0.0 {
        return Err(NotchError::InvalidConfig(format!(
            "Notch width must be positive, got {} Hz",
            notch_width
        )));
    }
    Ok(())
}

/// Design one notch filter per interference frequency
pub fn create_notch_pair(
    notches: NotchPair,
    notch_width: f64,
    sample_rate: f64,
) -> Result<FilterPair> {
    let first = notch_coefficients(notches.first, notch_width, sample_rate)?;
    let second = notch_coefficients(notches.second, notch_width, sample_rate)?;
    Ok(FilterPair::new(first, second))
}

/// Overall transfer function of two filters in cascade
///
/// Numerators and denominators are convolved separately, so the result is the
/// product H1(z) * H2(z).
pub fn combine_filters(first: &TransferFunction, second: &TransferFunction) -> TransferFunction {
    TransferFunction::new(
        convolve(&first.numerator, &second.numerator),
        convolve(&first.denominator, &second.denominator),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: f64 = 1024.0;

    #[test]
    fn test_coefficients_closed_form() {
        let tf = notch_coefficients(60.0, 5.0, FS).unwrap();
        let theta = 2.0 * PI * 60.0 / FS;
        let r = 1.0 - PI * 5.0 / FS;

        let expected_num = [1.0, -2.0 * theta.cos(), 1.0];
        let expected_den = [1.0, -2.0 * r * theta.cos(), r * r];
        for (a, b) in tf.numerator.iter().zip(expected_num.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        for (a, b) in tf.denominator.iter().zip(expected_den.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_poles_inside_unit_circle() {
        for &(f0, width) in &[(10.0, 1.0), (57.755, 5.0), (88.824, 5.0), (500.0, 300.0)] {
            let tf = notch_coefficients(f0, width, FS).unwrap();
            let radius = roots::max_pole_radius(&tf).unwrap();
            assert!(radius < 1.0, "f0={} width={} radius={}", f0, width, radius);
            assert!((radius - pole_radius(width, FS)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_stable_across_valid_range() {
        let nyquist = FS / 2.0;
        let max_width = FS / PI;
        let mut widths: Vec<f64> = (1..100).map(|j| j as f64 * max_width / 100.0).collect();
        widths.extend([0.01, 0.1, max_width * 0.999]);

        let mut largest = 0.0f64;
        for i in 1..100 {
            let f0 = i as f64 * nyquist / 100.0;
            for &width in &widths {
                let tf = notch_coefficients(f0, width, FS).unwrap();
                let radius = roots::max_pole_radius(&tf).unwrap();
                assert!(radius < 1.0, "f0={} width={} radius={}", f0, width, radius);
                assert!((radius - pole_radius(width, FS)).abs() < 1e-6);
                largest = largest.max(radius);
            }
        }
        assert!(largest < 1.0);
    }

    #[test]
    fn test_deep_null_and_unity_passband() {
        let tf = notch_coefficients(60.0, 5.0, FS).unwrap();
        assert!(tf.evaluate(60.0, FS).norm() < 1e-9);
        assert!((tf.evaluate(200.0, FS).norm() - 1.0).abs() < 0.05);
        assert!((tf.evaluate(0.0, FS).norm() - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_three_db_width() {
        let tf = notch_coefficients(100.0, 4.0, FS).unwrap();
        let edge = tf.evaluate(102.0, FS).norm();
        assert!((edge - std::f64::consts::FRAC_1_SQRT_2).abs() < 0.05, "edge gain {}", edge);
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        assert!(matches!(
            notch_coefficients(0.0, 5.0, FS),
            Err(NotchError::InvalidConfig(_))
        ));
        assert!(matches!(
            notch_coefficients(512.0, 5.0, FS),
            Err(NotchError::InvalidConfig(_))
        ));
        assert!(matches!(
            notch_coefficients(60.0, -1.0, FS),
            Err(NotchError::InvalidConfig(_))
        ));
        assert!(matches!(
            notch_coefficients(60.0, 5.0, 0.0),
            Err(NotchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_excessive_width_is_unstable_design() {
        // width >= fs / pi drives the pole radius to zero or below
        let result = notch_coefficients(60.0, FS / PI + 1.0, FS);
        assert!(matches!(result, Err(NotchError::UnstableDesign { .. })));
    }

    #[test]
    fn test_combined_response_is_product() {
        let pair = create_notch_pair(NotchPair::new(57.755, 88.824), 5.0, FS).unwrap();
        let combined = pair.combined();
        assert_eq!(combined.numerator.len(), 5);
        assert_eq!(combined.denominator.len(), 5);
        assert!((combined.denominator[0] - 1.0).abs() < 1e-15);

        for k in 0..256 {
            let f = k as f64 * 2.0;
            let product = pair.first.evaluate(f, FS) * pair.second.evaluate(f, FS);
            let direct = combined.evaluate(f, FS);
            assert!((product - direct).norm() < 1e-9, "mismatch at {} Hz", f);
        }
    }

    #[test]
    fn test_combined_filter_is_stable() {
        let pair = create_notch_pair(NotchPair::new(50.0, 100.0), 5.0, FS).unwrap();
        assert!(roots::is_stable(&pair.combined()).unwrap());
    }
}
