//! FIR band-stop design strategies
//!
//! Three ways of building a linear-phase filter that removes a narrow band
//! around each notch frequency. All of them share the run's tap budget so their
//! outputs can be compared directly.

pub mod freq_sampling;
pub mod remez;
pub mod window_method;

use crate::config::{AnalysisConfig, EquirippleConfig, FrequencySamplingConfig, WindowDesignConfig};
use crate::error::{NotchError, Result};
use crate::types::{FilterPair, NotchPair, PipelineKind, TransferFunction};
use remez::{Band, RemezOptions};

/// Tap counts must be odd (type I, no forced zero at Nyquist) and at least 3
pub fn validate_num_taps(num_taps: usize) -> Result<()> {
    if num_taps < 3 || num_taps % 2 == 0 {
        return Err(NotchError::InvalidConfig(format!(
            "Tap count must be odd and at least 3, got {}",
            num_taps
        )));
    }
    Ok(())
}

/// Windowed-sinc band-stop filters, one per notch
pub fn create_window_filters(
    notches: NotchPair,
    sample_rate: f64,
    notch_width: f64,
    num_taps: usize,
    config: &WindowDesignConfig,
) -> Result<FilterPair> {
    let w = notch_width / config.edge_divisor;
    let design = |f: f64| -> Result<TransferFunction> {
        let taps =
            window_method::firwin_bandstop(num_taps, f - w, f + w, &config.window, sample_rate)?;
        Ok(TransferFunction::fir(taps))
    };

    Ok(FilterPair::new(design(notches.first)?, design(notches.second)?))
}

/// Equiripple (Parks-McClellan) band-stop filters, one per notch
///
/// Bands per notch: pass `[0, f - w]`, stop `[f - g, f + g]`, pass
/// `[f + w, fs/2]`, where w = notch_width / edge_divisor and g is the stop
/// half width.
pub fn create_optimal_filters(
    notches: NotchPair,
    sample_rate: f64,
    notch_width: f64,
    num_taps: usize,
    config: &EquirippleConfig,
) -> Result<FilterPair> {
    if config.gains.len() != 3 || config.weights.len() != 3 {
        return Err(NotchError::InvalidConfig(format!(
            "Equiripple design needs 3 gains and 3 weights, got {} and {}",
            config.gains.len(),
            config.weights.len()
        )));
    }

    let nyquist = sample_rate / 2.0;
    let w = notch_width / config.edge_divisor;
    let g = config.stop_half_width;
    let options = RemezOptions {
        grid_density: config.grid_density,
        max_iterations: config.max_iterations,
    };

    let design = |f: f64| -> Result<TransferFunction> {
        if !(g > 0.0 && g < w && f - w > 0.0 && f + w < nyquist) {
            return Err(NotchError::InvalidConfig(format!(
                "Equiripple bands around {} Hz need 0 < {} < {} and {} < {} Hz",
                f,
                f - w,
                f - g,
                f + w,
                nyquist
            )));
        }
        let bands = [
            Band::new(0.0, f - w, config.gains[0], config.weights[0]),
            Band::new(f - g, f + g, config.gains[1], config.weights[1]),
            Band::new(f + w, nyquist, config.gains[2], config.weights[2]),
        ];
        let taps = remez::remez(num_taps, &bands, sample_rate, options)?;
        Ok(TransferFunction::fir(taps))
    };

    Ok(FilterPair::new(design(notches.first)?, design(notches.second)?))
}

/// Frequency-sampling band-stop filters, one per notch
///
/// Breakpoints `[0, f - w, f, f + w, fs/2]` with w = notch_width / edge_divisor.
pub fn create_freq_sampling_filters(
    notches: NotchPair,
    sample_rate: f64,
    notch_width: f64,
    num_taps: usize,
    config: &FrequencySamplingConfig,
) -> Result<FilterPair> {
    if config.gains.len() != 5 {
        return Err(NotchError::InvalidConfig(format!(
            "Frequency sampling design needs 5 gains, got {}",
            config.gains.len()
        )));
    }

    let nyquist = sample_rate / 2.0;
    let w = notch_width / config.edge_divisor;
    let design = |f: f64| -> Result<TransferFunction> {
        let freq = [0.0, f - w, f, f + w, nyquist];
        let taps =
            freq_sampling::firwin2(num_taps, &freq, &config.gains, &config.window, sample_rate)?;
        Ok(TransferFunction::fir(taps))
    };

    Ok(FilterPair::new(design(notches.first)?, design(notches.second)?))
}

/// Design the filter pair of one pipeline from the run configuration
pub fn design_pair(kind: PipelineKind, config: &AnalysisConfig) -> Result<FilterPair> {
    let (notches, fs, width, taps) = (
        config.notches,
        config.sample_rate,
        config.notch_width,
        config.num_taps,
    );

    match kind {
        PipelineKind::Iir => crate::iir::create_notch_pair(notches, width, fs),
        PipelineKind::Window => create_window_filters(notches, fs, width, taps, &config.window),
        PipelineKind::Equiripple => {
            create_optimal_filters(notches, fs, width, taps, &config.equiripple)
        }
        PipelineKind::FrequencySampling => {
            create_freq_sampling_filters(notches, fs, width, taps, &config.freq_sampling)
        }
    }
}
