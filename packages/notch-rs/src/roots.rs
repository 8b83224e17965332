//! Pole analysis through companion-matrix eigenvalues

use crate::error::{NotchError, Result};
use crate::types::TransferFunction;
use nalgebra::DMatrix;
use rustfft::num_complex::Complex;

/// Roots of c[0]*z^n + c[1]*z^(n-1) + ... + c[n]
///
/// Leading zero coefficients are ignored. A constant polynomial has no roots.
pub fn polynomial_roots(coeffs: &[f64]) -> Result<Vec<Complex<f64>>> {
    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(NotchError::Numerical(
            "Polynomial has non-finite coefficients".to_string(),
        ));
    }

    let first = coeffs.iter().position(|&c| c != 0.0);
    let coeffs = match first {
        Some(idx) => &coeffs[idx..],
        None => return Ok(Vec::new()),
    };

    let degree = coeffs.len() - 1;
    if degree == 0 {
        return Ok(Vec::new());
    }

    let lead = coeffs[0];
    let mut companion = DMatrix::<f64>::zeros(degree, degree);
    for (col, &c) in coeffs[1..].iter().enumerate() {
        companion[(0, col)] = -c / lead;
    }
    for row in 1..degree {
        companion[(row, row - 1)] = 1.0;
    }

    Ok(companion.complex_eigenvalues().iter().copied().collect())
}

/// Largest pole magnitude of a transfer function (0 for FIR filters)
pub fn max_pole_radius(tf: &TransferFunction) -> Result<f64> {
    let poles = polynomial_roots(&tf.denominator)?;
    Ok(poles.iter().map(|p| p.norm()).fold(0.0, f64::max))
}

/// True when every pole lies strictly inside the unit circle
pub fn is_stable(tf: &TransferFunction) -> Result<bool> {
    Ok(max_pole_radius(tf)? < 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_roots() {
        // (z - 2)(z + 3) = z^2 + z - 6
        let mut roots: Vec<f64> = polynomial_roots(&[1.0, 1.0, -6.0])
            .unwrap()
            .iter()
            .map(|r| r.re)
            .collect();
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((roots[0] + 3.0).abs() < 1e-10);
        assert!((roots[1] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_complex_conjugate_roots() {
        // z^2 + 1 has roots +/- j
        let roots = polynomial_roots(&[1.0, 0.0, 1.0]).unwrap();
        assert_eq!(roots.len(), 2);
        for r in roots {
            assert!(r.re.abs() < 1e-10);
            assert!((r.im.abs() - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_constant_polynomial_has_no_roots() {
        assert!(polynomial_roots(&[1.0]).unwrap().is_empty());
        assert!(polynomial_roots(&[0.0, 0.0, 2.0]).unwrap().is_empty());
    }

    #[test]
    fn test_fir_is_stable() {
        let tf = TransferFunction::fir(vec![0.25, 0.5, 0.25]);
        assert_eq!(max_pole_radius(&tf).unwrap(), 0.0);
        assert!(is_stable(&tf).unwrap());
    }

    #[test]
    fn test_pole_outside_unit_circle_is_unstable() {
        let tf = TransferFunction::new(vec![1.0], vec![1.0, -1.5]);
        assert!(!is_stable(&tf).unwrap());
    }
}
