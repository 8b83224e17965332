//! Tapering windows for FIR design
//!
//! All windows are generated in symmetric form (first and last samples equal),
//! which is what linear-phase filter design needs.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window family and its shape parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Window {
    /// Rectangular window
    Boxcar,
    Hann,
    Hamming,
    /// Kaiser window; larger `beta` widens the main lobe and lowers the side lobes
    Kaiser { beta: f64 },
}

impl Window {
    /// Symmetric window of length `len`
    pub fn generate(&self, len: usize) -> Vec<f64> {
        match len {
            0 => return Vec::new(),
            1 => return vec![1.0],
            _ => {}
        }

        let denom = (len - 1) as f64;
        match *self {
            Window::Boxcar => vec![1.0; len],
            Window::Hann => (0..len)
                .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f64 / denom).cos())
                .collect(),
            Window::Hamming => (0..len)
                .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f64 / denom).cos())
                .collect(),
            Window::Kaiser { beta } => kaiser(len, beta),
        }
    }
}

/// Symmetric Kaiser window
pub fn kaiser(len: usize, beta: f64) -> Vec<f64> {
    match len {
        0 => return Vec::new(),
        1 => return vec![1.0],
        _ => {}
    }

    let alpha = (len - 1) as f64 / 2.0;
    let norm = bessel_i0(beta);
    (0..len)
        .map(|n| {
            let ratio = (n as f64 - alpha) / alpha;
            let arg = (1.0 - ratio * ratio).max(0.0).sqrt();
            bessel_i0(beta * arg) / norm
        })
        .collect()
}

/// Zeroth-order modified Bessel function of the first kind
///
/// Power series sum_k ((x/2)^k / k!)^2, which converges for every finite x.
pub fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    loop {
        term *= (half / k) * (half / k);
        sum += term;
        if term <= sum * 1e-17 {
            break;
        }
        k += 1.0;
    }
    sum
}
