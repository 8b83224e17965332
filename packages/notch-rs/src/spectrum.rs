use crate::error::{NotchError, Result};
use crate::types::Spectrum;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Magnitude of the DFT of `samples` with its frequency axis
///
/// Bin k sits at k * fs / N, so the axis spans [0, fs) with the same length as
/// the input. The upper half mirrors the lower half for real input.
pub fn calc_freq_spectrum(samples: &[f64], sample_rate: f64) -> Result<Spectrum> {
    if samples.is_empty() {
        return Err(NotchError::InsufficientSamples {
            got: 0,
            required: 1,
        });
    }
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(NotchError::InvalidConfig(format!(
            "Sample rate must be positive, got {} Hz",
            sample_rate
        )));
    }

    let n = samples.len();
    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&x| Complex::new(x, 0.0)).collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let resolution = sample_rate / n as f64;
    let frequencies = (0..n).map(|k| k as f64 * resolution).collect();
    let magnitudes = buffer.iter().map(|c| c.norm()).collect();

    Ok(Spectrum {
        frequencies,
        magnitudes,
    })
}
