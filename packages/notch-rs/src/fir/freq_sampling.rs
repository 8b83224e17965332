//! Frequency-sampling FIR design
//!
//! The desired magnitude, given at a handful of breakpoints, is linearly
//! interpolated onto a dense uniform mesh, given linear phase, inverted with a
//! real inverse DFT and truncated to the tap budget. The window suppresses the
//! Gibbs ripple the truncation introduces.

use crate::error::{NotchError, Result};
use crate::windows::Window;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;

/// Design a linear-phase FIR filter from gain breakpoints
///
/// # Arguments
/// * `num_taps` - Odd number of taps
/// * `freq` - Breakpoint frequencies (Hz), non-decreasing, from 0 to Nyquist
/// * `gain` - Desired gain at each breakpoint
/// * `window` - Taper applied to the truncated impulse response
/// * `sample_rate` - Sampling rate (Hz)
pub fn firwin2(
    num_taps: usize,
    freq: &[f64],
    gain: &[f64],
    window: &Window,
    sample_rate: f64,
) -> Result<Vec<f64>> {
    super::validate_num_taps(num_taps)?;
    let nyquist = sample_rate / 2.0;
    let mut freq = normalize_breakpoints(freq, gain, nyquist)?;

    // A frequency may appear twice to describe a jump; separate the pair so
    // interpolation stays well defined.
    for k in 0..freq.len() - 1 {
        if freq[k] == freq[k + 1] {
            freq[k] -= f64::EPSILON;
            freq[k + 1] += f64::EPSILON;
        }
    }

    let nfreqs = 1 + num_taps.next_power_of_two();
    let nfft = 2 * (nfreqs - 1);
    let delay = (num_taps - 1) as f64 / 2.0;

    // Half spectrum with linear phase, mirrored into a Hermitian full spectrum
    let mut buffer = vec![Complex::new(0.0, 0.0); nfft];
    for k in 0..nfreqs {
        let x = k as f64 / (nfreqs - 1) as f64;
        let magnitude = interp(x, &freq, gain);
        let value = Complex::from_polar(magnitude, -delay * PI * x);
        buffer[k] = value;
        if k > 0 && k < nfreqs - 1 {
            buffer[nfft - k] = value.conj();
        }
    }
    buffer[0].im = 0.0;
    buffer[nfreqs - 1].im = 0.0;

    let mut planner = FftPlanner::<f64>::new();
    let ifft = planner.plan_fft_inverse(nfft);
    ifft.process(&mut buffer);

    let scale = 1.0 / nfft as f64;
    let taps = buffer
        .iter()
        .take(num_taps)
        .zip(window.generate(num_taps))
        .map(|(c, w)| c.re * scale * w)
        .collect();

    Ok(taps)
}

/// Validate breakpoints and scale them to [0, 1] (1 = Nyquist)
fn normalize_breakpoints(freq: &[f64], gain: &[f64], nyquist: f64) -> Result<Vec<f64>> {
    if freq.len() < 2 {
        return Err(NotchError::InvalidConfig(
            "Frequency sampling needs at least two breakpoints".to_string(),
        ));
    }
    if freq.len() != gain.len() {
        return Err(NotchError::InvalidConfig(format!(
            "{} breakpoints but {} gains",
            freq.len(),
            gain.len()
        )));
    }
    if freq[0] != 0.0 || (freq[freq.len() - 1] - nyquist).abs() > 1e-9 * nyquist {
        return Err(NotchError::InvalidConfig(format!(
            "Breakpoints must start at 0 and end at Nyquist ({} Hz)",
            nyquist
        )));
    }
    if freq.windows(2).any(|w| w[1] < w[0]) {
        return Err(NotchError::InvalidConfig(
            "Breakpoint frequencies must be non-decreasing".to_string(),
        ));
    }
    if freq.windows(3).any(|w| w[0] == w[1] && w[1] == w[2]) {
        return Err(NotchError::InvalidConfig(
            "A breakpoint frequency may be repeated at most twice".to_string(),
        ));
    }
    if gain.iter().any(|g| !g.is_finite()) {
        return Err(NotchError::InvalidConfig(
            "Gains must be finite".to_string(),
        ));
    }

    Ok(freq.iter().map(|f| f / nyquist).collect())
}

/// Piecewise-linear interpolation of (xp, fp) at x, clamped at both ends
fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let last = xp.len() - 1;
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[last] {
        return fp[last];
    }

    let j = xp.partition_point(|&v| v <= x) - 1;
    let span = xp[j + 1] - xp[j];
    if span <= 0.0 {
        return fp[j + 1];
    }
    fp[j] + (fp[j + 1] - fp[j]) * (x - xp[j]) / span
}
