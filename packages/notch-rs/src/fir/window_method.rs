//! Windowed-sinc band-stop design

use crate::error::{NotchError, Result};
use crate::windows::Window;
use std::f64::consts::PI;

/// Normalized sinc, sin(pi x) / (pi x)
pub(crate) fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Linear-phase band-stop filter rejecting `[low, high]` Hz
///
/// The ideal response (pass DC to `low`, stop to `high`, pass to Nyquist) is
/// truncated to `num_taps`, tapered by `window` and scaled to unit gain at DC.
pub fn firwin_bandstop(
    num_taps: usize,
    low: f64,
    high: f64,
    window: &Window,
    sample_rate: f64,
) -> Result<Vec<f64>> {
    super::validate_num_taps(num_taps)?;

    let nyquist = sample_rate / 2.0;
    if !(low > 0.0 && low < high && high < nyquist) {
        return Err(NotchError::InvalidConfig(format!(
            "Band-stop cutoffs must satisfy 0 < {} < {} < {} Hz",
            low, high, nyquist
        )));
    }

    let c1 = low / nyquist;
    let c2 = high / nyquist;
    let alpha = (num_taps - 1) as f64 / 2.0;

    // Passbands [0, c1] and [c2, 1]
    let mut taps: Vec<f64> = (0..num_taps)
        .map(|n| {
            let m = n as f64 - alpha;
            c1 * sinc(c1 * m) + sinc(m) - c2 * sinc(c2 * m)
        })
        .collect();

    for (tap, w) in taps.iter_mut().zip(window.generate(num_taps)) {
        *tap *= w;
    }

    let dc_gain: f64 = taps.iter().sum();
    if dc_gain.abs() < f64::EPSILON {
        return Err(NotchError::Numerical(
            "Windowed band-stop filter has zero DC gain".to_string(),
        ));
    }
    for tap in taps.iter_mut() {
        *tap /= dc_gain;
    }

    Ok(taps)
}
