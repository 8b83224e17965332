//! Analysis configuration
//!
//! Every tunable of the four pipelines lives here so the FIR strategies can be
//! compared under one harness. Defaults reproduce the values used for the
//! reference ECG recording (1024 Hz, notches at 57.755 Hz and 88.824 Hz).

use crate::error::{NotchError, Result};
use crate::types::NotchPair;
use crate::windows::Window;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Windowed-sinc design parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDesignConfig {
    /// Taper applied to the ideal band-stop response
    #[serde(default = "default_window_shape")]
    pub window: Window,

    /// One-sided stop width = notch_width / edge_divisor
    #[serde(default = "default_window_edge_divisor")]
    pub edge_divisor: f64,
}

/// Parks-McClellan design parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquirippleConfig {
    /// Passband edge offset = notch_width / edge_divisor
    #[serde(default = "default_equiripple_edge_divisor")]
    pub edge_divisor: f64,

    /// Half width of the stop band around the notch (Hz)
    #[serde(default = "default_stop_half_width")]
    pub stop_half_width: f64,

    /// Desired gain per band (pass, stop, pass)
    #[serde(default = "default_equiripple_gains")]
    pub gains: Vec<f64>,

    /// Error weight per band (pass, stop, pass)
    #[serde(default = "default_equiripple_weights")]
    pub weights: Vec<f64>,

    #[serde(default = "default_grid_density")]
    pub grid_density: usize,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

/// Frequency-sampling design parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencySamplingConfig {
    /// Breakpoint spacing around the notch = notch_width / edge_divisor
    #[serde(default = "default_freq_sampling_edge_divisor")]
    pub edge_divisor: f64,

    #[serde(default = "default_freq_sampling_window")]
    pub window: Window,

    /// Gains at (0, f - w, f, f + w, fs/2)
    #[serde(default = "default_freq_sampling_gains")]
    pub gains: Vec<f64>,
}

/// Complete configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Sample rate of the recording (Hz)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,

    /// Interference frequencies to remove (Hz)
    #[serde(default = "default_notches")]
    pub notches: NotchPair,

    /// 3 dB bandwidth of each notch (Hz)
    #[serde(default = "default_notch_width")]
    pub notch_width: f64,

    /// FIR tap budget shared by all three FIR strategies (odd)
    #[serde(default = "default_num_taps")]
    pub num_taps: usize,

    /// Number of points in each frequency-response curve
    #[serde(default = "default_response_points")]
    pub response_points: usize,

    /// Unit label used in the text report
    #[serde(default = "default_power_unit")]
    pub power_unit: String,

    #[serde(default)]
    pub window: WindowDesignConfig,

    #[serde(default)]
    pub equiripple: EquirippleConfig,

    #[serde(default)]
    pub freq_sampling: FrequencySamplingConfig,
}

fn default_sample_rate() -> f64 {
    1024.0
}
fn default_notches() -> NotchPair {
    NotchPair::new(57.755, 88.824)
}
fn default_notch_width() -> f64 {
    5.0
}
fn default_num_taps() -> usize {
    399
}
fn default_response_points() -> usize {
    512
}
fn default_power_unit() -> String {
    "pW".to_string()
}
fn default_window_shape() -> Window {
    Window::Kaiser { beta: 2.0 }
}
fn default_window_edge_divisor() -> f64 {
    1.2
}
fn default_equiripple_edge_divisor() -> f64 {
    1.0
}
fn default_stop_half_width() -> f64 {
    1.0
}
fn default_equiripple_gains() -> Vec<f64> {
    vec![1.0, 0.0, 1.0]
}
fn default_equiripple_weights() -> Vec<f64> {
    vec![1.0, 0.1, 1.0]
}
fn default_grid_density() -> usize {
    16
}
fn default_max_iterations() -> usize {
    25
}
fn default_freq_sampling_edge_divisor() -> f64 {
    0.5
}
fn default_freq_sampling_window() -> Window {
    Window::Kaiser { beta: 0.1 }
}
fn default_freq_sampling_gains() -> Vec<f64> {
    vec![1.0, 1.0, 0.0, 1.0, 1.0]
}

impl Default for WindowDesignConfig {
    fn default() -> Self {
        Self {
            window: default_window_shape(),
            edge_divisor: default_window_edge_divisor(),
        }
    }
}

impl Default for EquirippleConfig {
    fn default() -> Self {
        Self {
            edge_divisor: default_equiripple_edge_divisor(),
            stop_half_width: default_stop_half_width(),
            gains: default_equiripple_gains(),
            weights: default_equiripple_weights(),
            grid_density: default_grid_density(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl Default for FrequencySamplingConfig {
    fn default() -> Self {
        Self {
            edge_divisor: default_freq_sampling_edge_divisor(),
            window: default_freq_sampling_window(),
            gains: default_freq_sampling_gains(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            notches: default_notches(),
            notch_width: default_notch_width(),
            num_taps: default_num_taps(),
            response_points: default_response_points(),
            power_unit: default_power_unit(),
            window: WindowDesignConfig::default(),
            equiripple: EquirippleConfig::default(),
            freq_sampling: FrequencySamplingConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Configuration for an arbitrary recording, all design tunables at their defaults
    pub fn new(sample_rate: f64, notches: NotchPair, notch_width: f64) -> Self {
        Self {
            sample_rate,
            notches,
            notch_width,
            ..Default::default()
        }
    }

    pub fn with_num_taps(mut self, num_taps: usize) -> Self {
        self.num_taps = num_taps;
        self
    }

    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| NotchError::ConfigError(e.to_string()))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Check the parameters shared by every pipeline
    ///
    /// Strategy-specific band edges are checked by each designer.
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(NotchError::InvalidConfig(format!(
                "Sample rate must be positive, got {} Hz",
                self.sample_rate
            )));
        }

        let nyquist = self.nyquist();
        for freq in self.notches.as_array() {
            if !freq.is_finite() || freq <= 0.0 || freq >= nyquist {
                return Err(NotchError::InvalidConfig(format!(
                    "Notch frequency ({} Hz) must lie strictly between 0 and Nyquist ({} Hz)",
                    freq, nyquist
                )));
            }
        }

        if !self.notch_width.is_finite() || self.notch_width <= 0.0 {
            return Err(NotchError::InvalidConfig(format!(
                "Notch width must be positive, got {} Hz",
                self.notch_width
            )));
        }

        crate::fir::validate_num_taps(self.num_taps)?;

        if self.response_points == 0 {
            return Err(NotchError::InvalidConfig(
                "Frequency response needs at least one point".to_string(),
            ));
        }

        for (name, divisor) in [
            ("window", self.window.edge_divisor),
            ("equiripple", self.equiripple.edge_divisor),
            ("freq_sampling", self.freq_sampling.edge_divisor),
        ] {
            if !divisor.is_finite() || divisor <= 0.0 {
                return Err(NotchError::InvalidConfig(format!(
                    "{} edge_divisor must be positive, got {}",
                    name, divisor
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = AnalysisConfig::default();
        assert_eq!(config.sample_rate, 1024.0);
        assert_eq!(config.num_taps, 399);
        assert_eq!(config.equiripple.weights, vec![1.0, 0.1, 1.0]);
        assert_eq!(config.freq_sampling.gains.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = AnalysisConfig::from_json(
            r#"{ "sample_rate": 500.0, "notches": { "first": 50.0, "second": 100.0 },
                 "equiripple": { "stop_half_width": 2.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.sample_rate, 500.0);
        assert_eq!(config.notches, NotchPair::new(50.0, 100.0));
        assert_eq!(config.equiripple.stop_half_width, 2.0);
        assert_eq!(config.equiripple.max_iterations, 25);
        assert_eq!(config.window.window, Window::Kaiser { beta: 2.0 });
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = AnalysisConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, NotchError::ConfigError(_)));
    }

    #[test]
    fn test_validate_rejects_out_of_range_notch() {
        let config = AnalysisConfig::new(1024.0, NotchPair::new(60.0, 600.0), 5.0);
        assert!(matches!(
            config.validate(),
            Err(NotchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_even_tap_count() {
        let config = AnalysisConfig::default().with_num_taps(400);
        assert!(config.validate().is_err());
    }
}
