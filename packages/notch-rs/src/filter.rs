//! Linear filtering, convolution and frequency-response evaluation
//!
//! Filtering uses the direct form II transposed difference equation with zero
//! initial state, so every output has the same length as its input.

use crate::error::{NotchError, Result};
use crate::types::{CascadeOutput, FilterPair, FrequencyResponse, TransferFunction};
use rustfft::num_complex::Complex;
use std::f64::consts::PI;

/// Filter `x` with numerator `b` and denominator `a`
///
/// Both coefficient vectors are normalized by `a[0]`.
pub fn lfilter(b: &[f64], a: &[f64], x: &[f64]) -> Result<Vec<f64>> {
    if b.is_empty() {
        return Err(NotchError::InvalidConfig(
            "Numerator must have at least one coefficient".to_string(),
        ));
    }
    let a0 = match a.first() {
        Some(&a0) if a0 != 0.0 => a0,
        Some(_) => {
            return Err(NotchError::InvalidConfig(
                "First denominator coefficient must be non-zero".to_string(),
            ))
        }
        None => {
            return Err(NotchError::InvalidConfig(
                "Denominator must have at least one coefficient".to_string(),
            ))
        }
    };

    let order = b.len().max(a.len());
    let mut bn = vec![0.0; order];
    let mut an = vec![0.0; order];
    for (dst, &src) in bn.iter_mut().zip(b) {
        *dst = src / a0;
    }
    for (dst, &src) in an.iter_mut().zip(a) {
        *dst = src / a0;
    }

    let mut state = vec![0.0; order - 1];
    let mut y = Vec::with_capacity(x.len());

    for &input in x {
        let output = bn[0] * input + state.first().copied().unwrap_or(0.0);
        for k in 0..order.saturating_sub(1) {
            let carry = state.get(k + 1).copied().unwrap_or(0.0);
            state[k] = bn[k + 1] * input - an[k + 1] * output + carry;
        }
        y.push(output);
    }

    Ok(y)
}

impl TransferFunction {
    /// Filter a sample sequence through this transfer function
    pub fn apply(&self, x: &[f64]) -> Result<Vec<f64>> {
        lfilter(&self.numerator, &self.denominator, x)
    }

    /// Complex response at `frequency` Hz
    pub fn evaluate(&self, frequency: f64, sample_rate: f64) -> Complex<f64> {
        let w = 2.0 * PI * frequency / sample_rate;
        let numer = polyval_unit_circle(&self.numerator, w);
        let denom = polyval_unit_circle(&self.denominator, w);
        numer / denom
    }
}

/// sum_k c[k] e^{-jwk}
fn polyval_unit_circle(coeffs: &[f64], w: f64) -> Complex<f64> {
    coeffs
        .iter()
        .enumerate()
        .map(|(k, &c)| Complex::from_polar(c, -w * k as f64))
        .sum()
}

/// Run `x` through both stages, keeping the first-stage output
pub fn apply_cascade(filters: &FilterPair, x: &[f64]) -> Result<CascadeOutput> {
    let partial = filters.first.apply(x)?;
    let full = filters.second.apply(&partial)?;
    Ok(CascadeOutput { partial, full })
}

/// Full linear convolution, length `a.len() + b.len() - 1`
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// |H| on `points` equally spaced frequencies in [0, fs/2)
pub fn frequency_response(
    tf: &TransferFunction,
    sample_rate: f64,
    points: usize,
) -> FrequencyResponse {
    let step = sample_rate / (2.0 * points as f64);
    let frequencies: Vec<f64> = (0..points).map(|k| k as f64 * step).collect();
    let magnitudes = frequencies
        .iter()
        .map(|&f| tf.evaluate(f, sample_rate).norm())
        .collect();

    FrequencyResponse {
        frequencies,
        magnitudes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_filter_returns_input() {
        let x = vec![0.3, -1.2, 4.5, 0.0, 2.25];
        let y = TransferFunction::new(vec![1.0, 0.0, 0.0], vec![1.0, 0.0, 0.0])
            .apply(&x)
            .unwrap();
        assert_eq!(y.len(), x.len());
        for (a, b) in x.iter().zip(y.iter()) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_fir_matches_direct_convolution() {
        let b = [5.0, 4.0, 1.0, 2.0];
        let x = [1.0, 2.0, 3.0, 4.0, 3.0, 5.0, 6.0];
        let y = lfilter(&b, &[1.0], &x).unwrap();
        assert_eq!(y, vec![5.0, 14.0, 24.0, 36.0, 38.0, 47.0, 61.0]);
    }

    #[test]
    fn test_recursive_filter_impulse_response() {
        // y[n] = x[n] + 0.5 y[n-1]
        let mut impulse = vec![0.0; 6];
        impulse[0] = 1.0;
        let y = lfilter(&[1.0], &[1.0, -0.5], &impulse).unwrap();
        for (n, v) in y.iter().enumerate() {
            assert!((v - 0.5f64.powi(n as i32)).abs() < 1e-15);
        }
    }

    #[test]
    fn test_denominator_is_normalized() {
        let x = [1.0, 1.0, 1.0];
        let y = lfilter(&[2.0], &[2.0], &x).unwrap();
        assert_eq!(y, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_zero_leading_denominator_rejected() {
        assert!(lfilter(&[1.0], &[0.0, 1.0], &[1.0]).is_err());
        assert!(lfilter(&[1.0], &[], &[1.0]).is_err());
        assert!(lfilter(&[], &[1.0], &[1.0]).is_err());
    }

    #[test]
    fn test_convolve_lengths_and_values() {
        assert_eq!(convolve(&[1.0, 2.0], &[1.0, 3.0]), vec![1.0, 5.0, 6.0]);
        assert_eq!(convolve(&[1.0, 0.0, 1.0], &[1.0, 0.0, 1.0]).len(), 5);
        assert!(convolve(&[], &[1.0]).is_empty());
    }

    #[test]
    fn test_cascade_exposes_both_stages() {
        let pair = FilterPair::new(
            TransferFunction::fir(vec![2.0]),
            TransferFunction::fir(vec![3.0]),
        );
        let out = apply_cascade(&pair, &[1.0, -1.0]).unwrap();
        assert_eq!(out.partial, vec![2.0, -2.0]);
        assert_eq!(out.full, vec![6.0, -6.0]);
    }

    #[test]
    fn test_frequency_response_grid() {
        let response = frequency_response(&TransferFunction::identity(), 1000.0, 4);
        assert_eq!(response.frequencies, vec![0.0, 125.0, 250.0, 375.0]);
        assert!(response.magnitudes.iter().all(|&m| (m - 1.0).abs() < 1e-15));
    }
}
