//! Design/apply/analyze pipelines
//!
//! Each pipeline designs a filter pair for the run's two notches, runs the
//! recording through both stages, and derives the spectrum, the combined
//! frequency response and the per-stage noise powers. The four pipelines only
//! share the read-only input, so `run_all` executes them in parallel.

use crate::config::AnalysisConfig;
use crate::error::{NotchError, Result};
use crate::filter::{apply_cascade, frequency_response};
use crate::fir::design_pair;
use crate::noise::stage_noise_powers;
use crate::profile_scope;
use crate::spectrum::calc_freq_spectrum;
use crate::types::{AnalysisReport, PipelineFailure, PipelineKind, PipelineResult};
use rayon::prelude::*;

/// Minimum recording length accepted by the noise-power estimator
const MIN_SAMPLES: usize = 2;

/// Run one pipeline end to end
pub fn run_pipeline(
    kind: PipelineKind,
    samples: &[f64],
    config: &AnalysisConfig,
) -> Result<PipelineResult> {
    profile_scope!(format!("pipeline {}", kind));

    let filters = design_pair(kind, config)?;
    let combined = filters.combined();
    log::debug!(
        "{}: designed {} + {} numerator taps, combined {}",
        kind,
        filters.first.num_taps(),
        filters.second.num_taps(),
        combined.num_taps()
    );

    let output = apply_cascade(&filters, samples)?;
    let spectrum = calc_freq_spectrum(&output.full, config.sample_rate)?;
    let response = frequency_response(&combined, config.sample_rate, config.response_points);
    let noise_powers = stage_noise_powers(kind, samples, &output)?;

    for entry in &noise_powers {
        log::info!("{}: {:.3} {}", entry.label, entry.value, config.power_unit);
    }

    Ok(PipelineResult {
        kind,
        filters,
        combined,
        output,
        spectrum,
        response,
        noise_powers,
    })
}

/// Run every pipeline over one recording
///
/// The configuration and the recording are checked up front. After that a
/// failing pipeline is recorded in `failures` and does not stop its siblings.
pub fn run_all(samples: &[f64], config: &AnalysisConfig) -> Result<AnalysisReport> {
    run_selected(samples, config, &PipelineKind::ALL)
}

/// Run the given pipelines over one recording, in parallel
pub fn run_selected(
    samples: &[f64],
    config: &AnalysisConfig,
    kinds: &[PipelineKind],
) -> Result<AnalysisReport> {
    profile_scope!("run_all");

    config.validate()?;
    if samples.len() < MIN_SAMPLES {
        return Err(NotchError::InsufficientSamples {
            got: samples.len(),
            required: MIN_SAMPLES,
        });
    }

    log::info!(
        "Analyzing {} samples at {} Hz: notches {} Hz and {} Hz, width {} Hz, {} taps",
        samples.len(),
        config.sample_rate,
        config.notches.first,
        config.notches.second,
        config.notch_width,
        config.num_taps
    );

    let input_spectrum = calc_freq_spectrum(samples, config.sample_rate)?;
    let mut report = AnalysisReport::new(
        config.sample_rate,
        samples.len(),
        config.notches,
        config.notch_width,
        input_spectrum,
    );

    let outcomes: Vec<(PipelineKind, Result<PipelineResult>)> = kinds
        .par_iter()
        .map(|&kind| (kind, run_pipeline(kind, samples, config)))
        .collect();

    for (kind, outcome) in outcomes {
        match outcome {
            Ok(result) => report.pipelines.push(result),
            Err(e) => {
                log::warn!("Pipeline {} failed: {}", kind, e);
                report.failures.push(PipelineFailure {
                    kind,
                    error: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "Analysis {} complete: {} pipelines succeeded, {} failed",
        report.id,
        report.pipelines.len(),
        report.failures.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NotchPair;
    use std::f64::consts::PI;

    fn two_tone(fs: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64 / fs;
                (2.0 * PI * 60.0 * t).sin() + (2.0 * PI * 10.0 * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_iir_pipeline_outputs() {
        let config = AnalysisConfig::new(1024.0, NotchPair::new(60.0, 150.0), 5.0);
        let x = two_tone(1024.0, 1024);
        let result = run_pipeline(PipelineKind::Iir, &x, &config).unwrap();

        assert_eq!(result.output.partial.len(), x.len());
        assert_eq!(result.output.full.len(), x.len());
        assert_eq!(result.spectrum.magnitudes.len(), x.len());
        assert_eq!(result.response.frequencies.len(), 512);
        assert_eq!(result.noise_powers.len(), 3);
        assert!(result.noise_powers[0].value > 0.0);
    }

    #[test]
    fn test_failures_do_not_abort_siblings() {
        // Guard wider than the transition makes only the equiripple bands invalid
        let mut config = AnalysisConfig::new(1024.0, NotchPair::new(60.0, 150.0), 5.0)
            .with_num_taps(101);
        config.equiripple.stop_half_width = 10.0;

        let report = run_all(&two_tone(1024.0, 512), &config).unwrap();
        assert_eq!(report.pipelines.len(), 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, PipelineKind::Equiripple);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let config = AnalysisConfig::new(1024.0, NotchPair::new(60.0, 150.0), -1.0);
        assert!(matches!(
            run_all(&two_tone(1024.0, 64), &config),
            Err(NotchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_single_sample_rejected() {
        let config = AnalysisConfig::default();
        assert!(matches!(
            run_all(&[1.0], &config),
            Err(NotchError::InsufficientSamples { got: 1, .. })
        ));
    }

    #[test]
    fn test_run_selected_keeps_order() {
        let config = AnalysisConfig::new(1024.0, NotchPair::new(60.0, 150.0), 5.0)
            .with_num_taps(101);
        let kinds = [PipelineKind::FrequencySampling, PipelineKind::Iir];
        let report = run_selected(&two_tone(1024.0, 256), &config, &kinds).unwrap();
        let got: Vec<PipelineKind> = report.pipelines.iter().map(|p| p.kind).collect();
        assert_eq!(got, kinds.to_vec());
    }
}
