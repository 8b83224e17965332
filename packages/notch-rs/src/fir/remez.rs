//! Parks-McClellan equiripple design
//!
//! Remez exchange over a dense frequency grid for odd-length, even-symmetric
//! (type I) filters. Frequencies are handled normalized to the sample rate, so
//! the grid spans [0, 0.5]. Each iteration fits the weighted Chebyshev
//! alternation through the current extremal set with barycentric Lagrange
//! interpolation, then moves the set to the new error extrema. The final
//! amplitude response is sampled and converted to taps.
//!
//! Long filters start from the extremal set of a converged half-length design.
//! Short ones start from points spread over the bands.

use crate::error::{NotchError, Result};
use std::f64::consts::PI;

/// Relative spread of the extremal errors at which the exchange stops
const CONVERGENCE_TOLERANCE: f64 = 1e-4;

/// Cosine-term count from which the exchange is seeded by a shorter design
const MIN_SCALED_TERMS: usize = 41;

/// One approximation band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Lower edge (Hz)
    pub low: f64,
    /// Upper edge (Hz)
    pub high: f64,
    /// Desired gain across the band
    pub desired: f64,
    /// Error weight across the band
    pub weight: f64,
}

impl Band {
    pub fn new(low: f64, high: f64, desired: f64, weight: f64) -> Self {
        Self {
            low,
            high,
            desired,
            weight,
        }
    }
}

/// Exchange algorithm settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemezOptions {
    /// Grid points per extremal frequency
    pub grid_density: usize,
    pub max_iterations: usize,
}

impl Default for RemezOptions {
    fn default() -> Self {
        Self {
            grid_density: 16,
            max_iterations: 25,
        }
    }
}

/// Dense grid with the desired response and weight at each point
struct DenseGrid {
    freq: Vec<f64>,
    desired: Vec<f64>,
    weight: Vec<f64>,
    /// First index and point count of each band
    bands: Vec<(usize, usize)>,
}

/// Interpolation state through the current extremal set
struct Alternation {
    x: Vec<f64>,
    ad: Vec<f64>,
    y: Vec<f64>,
}

impl Alternation {
    /// Amplitude response at normalized frequency `freq`
    fn amplitude(&self, freq: f64) -> f64 {
        let xc = (2.0 * PI * freq).cos();
        let mut numer = 0.0;
        let mut denom = 0.0;
        for ((&xi, &adi), &yi) in self.x.iter().zip(&self.ad).zip(&self.y) {
            let c = xc - xi;
            if c.abs() < 1.0e-7 {
                return yi;
            }
            let c = adi / c;
            denom += c;
            numer += c * yi;
        }
        numer / denom
    }
}

/// Design a linear-phase FIR filter minimizing the maximum weighted error
///
/// # Arguments
/// * `num_taps` - Odd number of taps
/// * `bands` - Ordered, non-overlapping bands within [0, Nyquist]
/// * `sample_rate` - Sampling rate (Hz)
/// * `options` - Grid density and iteration limit
///
/// # Errors
/// `NonConvergence` when the extremal errors have not levelled out after
/// `max_iterations`, `InsufficientExtremals` when the error function does not
/// alternate enough times to continue.
pub fn remez(
    num_taps: usize,
    bands: &[Band],
    sample_rate: f64,
    options: RemezOptions,
) -> Result<Vec<f64>> {
    super::validate_num_taps(num_taps)?;
    validate_bands(bands, sample_rate)?;
    if options.grid_density == 0 || options.max_iterations == 0 {
        return Err(NotchError::InvalidConfig(
            "Grid density and iteration limit must be positive".to_string(),
        ));
    }

    let (grid, ext, iterations) = match exchange(num_taps, bands, sample_rate, options) {
        Ok(converged) => converged,
        Err(NotchError::NonConvergence { iterations }) => {
            log::warn!(
                "Remez exchange did not converge in {} iterations ({} taps)",
                iterations,
                num_taps
            );
            return Err(NotchError::NonConvergence { iterations });
        }
        Err(e) => return Err(e),
    };
    log::debug!(
        "Remez exchange converged after {} iterations ({} taps, {} grid points)",
        iterations,
        num_taps,
        grid.freq.len()
    );

    let alt = calc_parms(&ext, &grid);
    let amplitudes: Vec<f64> = (0..=num_taps / 2)
        .map(|i| alt.amplitude(i as f64 / num_taps as f64))
        .collect();

    Ok(freq_sample(num_taps, &amplitudes))
}

/// Run the exchange to convergence
///
/// Returns the grid, the final extremal set and the iterations used.
fn exchange(
    num_taps: usize,
    bands: &[Band],
    sample_rate: f64,
    options: RemezOptions,
) -> Result<(DenseGrid, Vec<usize>, usize)> {
    // Number of cosine terms in the type I amplitude response
    let r = num_taps / 2 + 1;
    if bands.len() > r + 1 {
        return Err(NotchError::InvalidConfig(format!(
            "{} bands need more than {} taps",
            bands.len(),
            num_taps
        )));
    }
    let grid = dense_grid(r, bands, sample_rate, options.grid_density);
    if grid.freq.len() < r + 1 {
        return Err(NotchError::InvalidConfig(format!(
            "Bands cover {} grid points, need at least {} for {} taps",
            grid.freq.len(),
            r + 1,
            num_taps
        )));
    }

    let mut ext = scaled_extremals(num_taps, bands, sample_rate, options, &grid)
        .unwrap_or_else(|| initial_extremals(r, &grid));
    let mut error = vec![0.0; grid.freq.len()];

    for iteration in 1..=options.max_iterations {
        let alt = calc_parms(&ext, &grid);
        for (i, e) in error.iter_mut().enumerate() {
            *e = grid.weight[i] * (grid.desired[i] - alt.amplitude(grid.freq[i]));
        }
        ext = search(r, &error, &grid.bands)?;
        if is_done(&ext, &error) {
            return Ok((grid, ext, iteration));
        }
    }

    Err(NotchError::NonConvergence {
        iterations: options.max_iterations,
    })
}

fn validate_bands(bands: &[Band], sample_rate: f64) -> Result<()> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(NotchError::InvalidConfig(format!(
            "Sample rate must be positive, got {} Hz",
            sample_rate
        )));
    }
    if bands.is_empty() {
        return Err(NotchError::InvalidConfig(
            "At least one band is required".to_string(),
        ));
    }

    let nyquist = sample_rate / 2.0;
    let mut previous_high = f64::NEG_INFINITY;
    for band in bands {
        if !(band.low >= 0.0 && band.low < band.high && band.high <= nyquist) {
            return Err(NotchError::InvalidConfig(format!(
                "Band [{}, {}] Hz must be increasing and within [0, {}] Hz",
                band.low, band.high, nyquist
            )));
        }
        if band.low < previous_high {
            return Err(NotchError::InvalidConfig(format!(
                "Band starting at {} Hz overlaps the previous band",
                band.low
            )));
        }
        if !band.weight.is_finite() || band.weight <= 0.0 {
            return Err(NotchError::InvalidConfig(format!(
                "Band weight must be positive, got {}",
                band.weight
            )));
        }
        if !band.desired.is_finite() {
            return Err(NotchError::InvalidConfig(
                "Desired band gain must be finite".to_string(),
            ));
        }
        previous_high = band.high;
    }
    Ok(())
}

fn dense_grid(r: usize, bands: &[Band], sample_rate: f64, grid_density: usize) -> DenseGrid {
    let delf = 0.5 / (grid_density * r) as f64;
    let mut grid = DenseGrid {
        freq: Vec::new(),
        desired: Vec::new(),
        weight: Vec::new(),
        bands: Vec::with_capacity(bands.len()),
    };

    for band in bands {
        let low = band.low / sample_rate;
        let high = band.high / sample_rate;
        let points = (((high - low) / delf + 0.5) as usize).max(1);
        grid.bands.push((grid.freq.len(), points));
        for i in 0..points {
            grid.freq.push(low + i as f64 * delf);
            grid.desired.push(band.desired);
            grid.weight.push(band.weight);
        }
        if let Some(last) = grid.freq.last_mut() {
            *last = high;
        }
    }

    grid
}

/// Starting extremal set from a converged design of about half the length
///
/// The coarse extremal frequencies are stretched to r + 1 points and snapped
/// to the nearest grid point. Returns `None` for short filters or when the
/// coarse design fails.
fn scaled_extremals(
    num_taps: usize,
    bands: &[Band],
    sample_rate: f64,
    options: RemezOptions,
    grid: &DenseGrid,
) -> Option<Vec<usize>> {
    let r = num_taps / 2 + 1;
    if r < MIN_SCALED_TERMS {
        return None;
    }

    let coarse_taps = (num_taps / 2) | 1;
    let (coarse_grid, coarse_ext, _) = match exchange(coarse_taps, bands, sample_rate, options) {
        Ok(converged) => converged,
        Err(e) => {
            log::debug!("{}-tap seed design failed: {}", coarse_taps, e);
            return None;
        }
    };
    let reference: Vec<f64> = coarse_ext.iter().map(|&e| coarse_grid.freq[e]).collect();
    Some(scale_reference(&reference, r, &grid.freq))
}

/// Stretch a sorted reference set to r + 1 strictly increasing grid indices
fn scale_reference(reference: &[f64], r: usize, freq: &[f64]) -> Vec<usize> {
    let rp = reference.len() - 1;
    let last = freq.len() - 1;

    let mut ext: Vec<usize> = (0..=r)
        .map(|j| {
            let t = j as f64 * rp as f64 / r as f64;
            let k = (t as usize).min(rp - 1);
            let u = t - k as f64;
            let f = reference[k] * (1.0 - u) + reference[k + 1] * u;

            let i = freq.partition_point(|&g| g < f).min(last);
            if i > 0 && (freq[i - 1] - f).abs() < (freq[i] - f).abs() {
                i - 1
            } else {
                i
            }
        })
        .collect();

    for j in 1..=r {
        if ext[j] <= ext[j - 1] {
            ext[j] = ext[j - 1] + 1;
        }
    }
    ext[r] = ext[r].min(last);
    for j in (0..r).rev() {
        if ext[j] >= ext[j + 1] {
            ext[j] = ext[j + 1] - 1;
        }
    }
    ext
}

/// Starting extremal set, spread over the bands in proportion to their grid
/// points with at least one per band
///
/// Narrow bands such as a notch stop band would otherwise get no extremal and
/// the first alternation could not see them.
fn initial_extremals(r: usize, grid: &DenseGrid) -> Vec<usize> {
    let total = r + 1;
    let gridsize = grid.freq.len() as f64;
    let mut counts: Vec<usize> = grid
        .bands
        .iter()
        .map(|&(_, n)| {
            let share = (total as f64 * n as f64 / gridsize).round() as usize;
            share.max(1).min(n)
        })
        .collect();
    let density = |counts: &[usize], b: usize| counts[b] as f64 / grid.bands[b].1 as f64;

    while counts.iter().sum::<usize>() > total {
        let mut pick: Option<usize> = None;
        for b in 0..counts.len() {
            if counts[b] > 1 && pick.map_or(true, |p| density(&counts, b) > density(&counts, p)) {
                pick = Some(b);
            }
        }
        match pick {
            Some(b) => counts[b] -= 1,
            None => break,
        }
    }
    while counts.iter().sum::<usize>() < total {
        let mut pick: Option<usize> = None;
        for b in 0..counts.len() {
            if counts[b] < grid.bands[b].1
                && pick.map_or(true, |p| density(&counts, b) < density(&counts, p))
            {
                pick = Some(b);
            }
        }
        match pick {
            Some(b) => counts[b] += 1,
            None => break,
        }
    }

    let mut ext = Vec::with_capacity(total);
    for (&(start, n), &count) in grid.bands.iter().zip(&counts) {
        if count == 1 {
            ext.push(start + (n - 1) / 2);
        } else {
            ext.extend((0..count).map(|j| start + j * (n - 1) / (count - 1)));
        }
    }
    ext
}

/// Barycentric weights and alternation values through the extremal set
fn calc_parms(ext: &[usize], grid: &DenseGrid) -> Alternation {
    let r = ext.len() - 1;
    let x: Vec<f64> = ext.iter().map(|&e| (2.0 * PI * grid.freq[e]).cos()).collect();

    // Weights only matter up to a common factor, so the products are formed
    // as log magnitudes and rescaled by the largest one
    let mut signs = vec![1.0; r + 1];
    let logs: Vec<f64> = (0..=r)
        .map(|i| {
            let mut log_mag = 0.0;
            for k in (0..=r).filter(|&k| k != i) {
                let d = x[i] - x[k];
                if d < 0.0 {
                    signs[i] = -signs[i];
                }
                log_mag -= d.abs().max(f64::MIN_POSITIVE).ln();
            }
            log_mag
        })
        .collect();
    let peak = logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let ad: Vec<f64> = logs
        .iter()
        .zip(&signs)
        .map(|(&l, &sign)| sign * (l - peak).exp())
        .collect();

    let mut numer = 0.0;
    let mut denom = 0.0;
    let mut sign = 1.0;
    for (i, &e) in ext.iter().enumerate() {
        numer += ad[i] * grid.desired[e];
        denom += sign * ad[i] / grid.weight[e];
        sign = -sign;
    }
    let delta = numer / denom;

    let mut sign = 1.0;
    let y = ext
        .iter()
        .map(|&e| {
            let v = grid.desired[e] - sign * delta / grid.weight[e];
            sign = -sign;
            v
        })
        .collect();

    Alternation { x, ad, y }
}

/// Locate the r + 1 alternating extrema of the weighted error
///
/// Extrema are looked for inside each band, band edges counting as extrema
/// when the error grows towards them. Consecutive extrema of the same sign
/// collapse to the larger one. Surplus extrema are then dropped from the ends
/// or around the smallest one so the set keeps alternating.
fn search(r: usize, error: &[f64], bands: &[(usize, usize)]) -> Result<Vec<usize>> {
    let mut found: Vec<usize> = Vec::with_capacity(2 * r);

    for &(start, n) in bands {
        let end = start + n - 1;
        for i in start..=end {
            let cur = error[i];
            if cur == 0.0 {
                continue;
            }
            let prev = (i > start).then(|| error[i - 1]);
            let next = (i < end).then(|| error[i + 1]);
            let is_extremum = if cur > 0.0 {
                prev.map_or(true, |p| cur >= p) && next.map_or(true, |q| cur > q)
            } else {
                prev.map_or(true, |p| cur <= p) && next.map_or(true, |q| cur < q)
            };
            if !is_extremum {
                continue;
            }

            match found.last_mut() {
                Some(last) if (error[*last] > 0.0) == (cur > 0.0) => {
                    if cur.abs() > error[*last].abs() {
                        *last = i;
                    }
                }
                _ => found.push(i),
            }
        }
    }

    if found.len() < r + 1 {
        return Err(NotchError::InsufficientExtremals {
            found: found.len(),
            required: r + 1,
        });
    }

    while found.len() > r + 1 {
        let last = found.len() - 1;
        if found.len() == r + 2 {
            if error[found[0]].abs() < error[found[last]].abs() {
                found.remove(0);
            } else {
                found.remove(last);
            }
            continue;
        }

        let mut smallest = 0;
        for j in 1..found.len() {
            if error[found[j]].abs() < error[found[smallest]].abs() {
                smallest = j;
            }
        }
        found.remove(smallest);
        if smallest == 0 || smallest == last {
            continue;
        }
        // Its neighbours now share a sign; keep the larger
        let k = smallest;
        if error[found[k - 1]].abs() >= error[found[k]].abs() {
            found.remove(k);
        } else {
            found.remove(k - 1);
        }
    }

    Ok(found)
}

fn is_done(ext: &[usize], error: &[f64]) -> bool {
    let (min, max) = ext.iter().fold((f64::INFINITY, 0.0f64), |(lo, hi), &e| {
        let v = error[e].abs();
        (lo.min(v), hi.max(v))
    });
    if max == 0.0 {
        return true;
    }
    (max - min) / max < CONVERGENCE_TOLERANCE
}

/// Taps of an odd-length symmetric filter from amplitude samples at k / N
fn freq_sample(num_taps: usize, amplitudes: &[f64]) -> Vec<f64> {
    let n = num_taps as f64;
    let m = (n - 1.0) / 2.0;
    let half = num_taps / 2;

    (0..num_taps)
        .map(|i| {
            let x = 2.0 * PI * (i as f64 - m) / n;
            let mut val = amplitudes[0];
            for (k, &a) in amplitudes.iter().enumerate().take(half + 1).skip(1) {
                val += 2.0 * a * (x * k as f64).cos();
            }
            val / n
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransferFunction;

    #[test]
    fn test_lowpass_meets_bands() {
        // Normalized to fs = 1
        let bands = [
            Band::new(0.0, 0.2, 1.0, 1.0),
            Band::new(0.3, 0.5, 0.0, 1.0),
        ];
        let taps = remez(31, &bands, 1.0, RemezOptions::default()).unwrap();
        assert_eq!(taps.len(), 31);
        for i in 0..31 {
            assert!((taps[i] - taps[30 - i]).abs() < 1e-10);
        }

        let tf = TransferFunction::fir(taps);
        assert!((tf.evaluate(0.1, 1.0).norm() - 1.0).abs() < 0.01);
        assert!(tf.evaluate(0.4, 1.0).norm() < 0.01);
    }

    #[test]
    fn test_equiripple_error_in_passband() {
        let bands = [
            Band::new(0.0, 0.15, 1.0, 1.0),
            Band::new(0.25, 0.5, 0.0, 1.0),
        ];
        let taps = remez(25, &bands, 1.0, RemezOptions::default()).unwrap();
        let tf = TransferFunction::fir(taps);

        let pass_err = (0..=150)
            .map(|k| (tf.evaluate(k as f64 * 0.001, 1.0).norm() - 1.0).abs())
            .fold(0.0, f64::max);
        let stop_err = (250..=500)
            .map(|k| tf.evaluate(k as f64 * 0.001, 1.0).norm())
            .fold(0.0, f64::max);
        // Equal weights give equal ripple in both bands
        assert!((pass_err - stop_err).abs() < 0.2 * pass_err.max(stop_err));
    }

    #[test]
    fn test_rejects_bad_bands() {
        let opts = RemezOptions::default();
        assert!(remez(31, &[], 1.0, opts).is_err());
        assert!(remez(31, &[Band::new(0.3, 0.2, 1.0, 1.0)], 1.0, opts).is_err());
        assert!(remez(
            31,
            &[Band::new(0.0, 0.3, 1.0, 1.0), Band::new(0.2, 0.5, 0.0, 1.0)],
            1.0,
            opts
        )
        .is_err());
        assert!(remez(31, &[Band::new(0.0, 0.6, 1.0, 1.0)], 1.0, opts).is_err());
        assert!(remez(31, &[Band::new(0.0, 0.5, 1.0, 0.0)], 1.0, opts).is_err());
    }

    #[test]
    fn test_too_few_iterations_reports_non_convergence() {
        let bands = [
            Band::new(0.0, 0.2, 1.0, 1.0),
            Band::new(0.3, 0.5, 0.0, 1.0),
        ];
        let opts = RemezOptions {
            grid_density: 16,
            max_iterations: 1,
        };
        let result = remez(61, &bands, 1.0, opts);
        assert!(matches!(
            result,
            Err(NotchError::NonConvergence { iterations: 1 })
        ));
    }

    #[test]
    fn test_wide_transition_bandstop() {
        let bands = [
            Band::new(0.0, 0.1, 1.0, 1.0),
            Band::new(0.15, 0.2, 0.0, 1.0),
            Band::new(0.25, 0.5, 1.0, 1.0),
        ];
        let taps = remez(61, &bands, 1.0, RemezOptions::default()).unwrap();
        let tf = TransferFunction::fir(taps);
        assert!(tf.evaluate(0.175, 1.0).norm() < 0.01);
        assert!((tf.evaluate(0.05, 1.0).norm() - 1.0).abs() < 0.01);
        assert!((tf.evaluate(0.4, 1.0).norm() - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_long_bandstop_seeded_from_shorter_design() {
        let bands = [
            Band::new(0.0, 0.1, 1.0, 1.0),
            Band::new(0.15, 0.2, 0.0, 1.0),
            Band::new(0.25, 0.5, 1.0, 1.0),
        ];
        let taps = remez(201, &bands, 1.0, RemezOptions::default()).unwrap();
        for i in 0..201 {
            assert!((taps[i] - taps[200 - i]).abs() < 1e-10);
        }

        let tf = TransferFunction::fir(taps);
        for f in [0.15, 0.175, 0.2] {
            assert!(tf.evaluate(f, 1.0).norm() < 1e-6, "gain at {}", f);
        }
        for f in [0.0, 0.05, 0.1, 0.25, 0.4, 0.5] {
            assert!((tf.evaluate(f, 1.0).norm() - 1.0).abs() < 1e-6, "gain at {}", f);
        }
    }

    #[test]
    fn test_scale_reference_stays_strictly_increasing() {
        let freq: Vec<f64> = (0..=50).map(|i| i as f64 * 0.01).collect();
        let reference = [0.0, 0.1, 0.11, 0.5];
        let ext = scale_reference(&reference, 7, &freq);
        assert_eq!(ext.len(), 8);
        assert_eq!(ext[0], 0);
        assert_eq!(ext[7], 50);
        assert!(ext.windows(2).all(|w| w[0] < w[1]), "{:?}", ext);
    }

    #[test]
    fn test_narrow_band_gets_initial_extremal() {
        // 2 Hz guard band between two wide passbands at fs = 1024
        let bands = [
            Band::new(0.0, 52.755, 1.0, 1.0),
            Band::new(56.755, 58.755, 0.0, 0.1),
            Band::new(62.755, 512.0, 1.0, 1.0),
        ];
        let r = 399 / 2 + 1;
        let grid = dense_grid(r, &bands, 1024.0, 16);
        let ext = initial_extremals(r, &grid);

        assert_eq!(ext.len(), r + 1);
        assert!(ext.windows(2).all(|w| w[0] < w[1]));
        let (start, n) = grid.bands[1];
        assert!(ext.iter().any(|&e| e >= start && e < start + n));
    }

    #[test]
    fn test_flat_error_has_too_few_extremals() {
        // Zero in the passbands, a constant dip in the stop band
        let bands = [(0, 4), (4, 4)];
        let error = [0.0, -0.1, -0.1, 0.0, 0.0, 0.2, 0.2, 0.0];
        assert!(matches!(
            search(3, &error, &bands),
            Err(NotchError::InsufficientExtremals {
                found: 2,
                required: 4
            })
        ));
    }

    #[test]
    fn test_search_drops_surplus_keeping_alternation() {
        let error = [1.0, 0.0, -0.5, 0.0, 0.1, 0.0, -0.8, 0.0, 0.9];
        let ext = search(2, &error, &[(0, 9)]).unwrap();
        assert_eq!(ext, vec![0, 6, 8]);
    }

    #[test]
    fn test_search_merges_same_sign_neighbours() {
        // The passband edge and the next band start both peak positive
        let error = [0.0, 0.3, -0.4, 0.2, 0.5, -0.6, 0.7];
        let ext = search(3, &error, &[(0, 4), (4, 3)]).unwrap();
        assert_eq!(ext, vec![2, 4, 5, 6]);
    }
}
