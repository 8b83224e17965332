use crate::noise::NoisePowerEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rational transfer function H(z) = numerator(z) / denominator(z)
///
/// Coefficients are stored in ascending powers of z^-1. The leading
/// denominator coefficient is 1 for every filter this crate designs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferFunction {
    pub numerator: Vec<f64>,
    pub denominator: Vec<f64>,
}

impl TransferFunction {
    pub fn new(numerator: Vec<f64>, denominator: Vec<f64>) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// All-zero filter with denominator `[1]`
    pub fn fir(taps: Vec<f64>) -> Self {
        Self {
            numerator: taps,
            denominator: vec![1.0],
        }
    }

    /// H(z) = 1
    pub fn identity() -> Self {
        Self::fir(vec![1.0])
    }

    pub fn is_fir(&self) -> bool {
        self.denominator.len() == 1
    }

    /// Number of numerator taps
    pub fn num_taps(&self) -> usize {
        self.numerator.len()
    }
}

/// The two interference frequencies targeted in a run (Hz)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NotchPair {
    pub first: f64,
    pub second: f64,
}

impl NotchPair {
    pub fn new(first: f64, second: f64) -> Self {
        Self { first, second }
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.first, self.second]
    }
}

/// Two filters applied one after the other
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPair {
    pub first: TransferFunction,
    pub second: TransferFunction,
}

impl FilterPair {
    pub fn new(first: TransferFunction, second: TransferFunction) -> Self {
        Self { first, second }
    }

    /// Single transfer function equal to the product of both stages
    pub fn combined(&self) -> TransferFunction {
        crate::iir::combine_filters(&self.first, &self.second)
    }
}

/// Output of a two-stage cascade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeOutput {
    /// After the first stage only
    pub partial: Vec<f64>,
    /// After both stages
    pub full: Vec<f64>,
}

/// Magnitude of the DFT of a sample sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spectrum {
    pub frequencies: Vec<f64>,
    pub magnitudes: Vec<f64>,
}

impl Spectrum {
    /// Magnitude of the bin closest to `frequency` (Hz)
    pub fn magnitude_at(&self, frequency: f64) -> Option<f64> {
        let n = self.frequencies.len();
        if n < 2 {
            return self.magnitudes.first().copied();
        }
        let resolution = self.frequencies[1] - self.frequencies[0];
        if resolution <= 0.0 || frequency < 0.0 {
            return None;
        }
        let bin = (frequency / resolution).round() as usize;
        self.magnitudes.get(bin).copied()
    }
}

/// |H(e^jw)| sampled on [0, fs/2)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyResponse {
    pub frequencies: Vec<f64>,
    pub magnitudes: Vec<f64>,
}

/// Design/apply/analyze pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    Iir,
    Window,
    Equiripple,
    FrequencySampling,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 4] = [
        PipelineKind::Iir,
        PipelineKind::Window,
        PipelineKind::Equiripple,
        PipelineKind::FrequencySampling,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PipelineKind::Iir => "iir",
            PipelineKind::Window => "window",
            PipelineKind::Equiripple => "equiripple",
            PipelineKind::FrequencySampling => "freq-sampling",
        }
    }

    /// Report label for the whole cascade
    pub fn cascade_label(&self) -> &'static str {
        match self {
            PipelineKind::Iir => "IIR notch filters",
            PipelineKind::Window => "FIR Window filters",
            PipelineKind::Equiripple => "FIR Optimal filters",
            PipelineKind::FrequencySampling => "FIR Frequency Sampling filters",
        }
    }

    /// Report label for a single stage (0 = first, 1 = second)
    pub fn stage_label(&self, stage: usize) -> String {
        let ordinal = if stage == 0 { "first" } else { "second" };
        let filter = match self {
            PipelineKind::Iir => "IIR notch filter",
            PipelineKind::Window => "window filter",
            PipelineKind::Equiripple => "optimal filter",
            PipelineKind::FrequencySampling => "frequency sampling filter",
        };
        format!("{} {}", ordinal, filter)
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PipelineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iir" | "notch" => Ok(PipelineKind::Iir),
            "window" | "windowed-sinc" => Ok(PipelineKind::Window),
            "equiripple" | "optimal" | "remez" => Ok(PipelineKind::Equiripple),
            "freq-sampling" | "frequency-sampling" | "frequency_sampling" | "firwin2" => {
                Ok(PipelineKind::FrequencySampling)
            }
            other => Err(format!(
                "Unknown filter kind '{}'. Valid kinds: iir, window, equiripple, freq-sampling",
                other
            )),
        }
    }
}

/// Everything a plotting/reporting collaborator needs from one pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub kind: PipelineKind,
    pub filters: FilterPair,
    pub combined: TransferFunction,
    pub output: CascadeOutput,
    pub spectrum: Spectrum,
    pub response: FrequencyResponse,
    pub noise_powers: Vec<NoisePowerEntry>,
}

/// A pipeline that could not be designed or applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineFailure {
    pub kind: PipelineKind,
    pub error: String,
}

/// Results of running every pipeline over one recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: String,
    pub sample_rate: f64,
    pub num_samples: usize,
    pub notches: NotchPair,
    pub notch_width: f64,
    pub input_spectrum: Spectrum,
    pub pipelines: Vec<PipelineResult>,
    pub failures: Vec<PipelineFailure>,
    pub created_at: String,
}

impl AnalysisReport {
    pub fn new(
        sample_rate: f64,
        num_samples: usize,
        notches: NotchPair,
        notch_width: f64,
        input_spectrum: Spectrum,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sample_rate,
            num_samples,
            notches,
            notch_width,
            input_spectrum,
            pipelines: Vec::new(),
            failures: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Noise-power entries of every successful pipeline, in pipeline order
    pub fn noise_powers(&self) -> Vec<NoisePowerEntry> {
        self.pipelines
            .iter()
            .flat_map(|p| p.noise_powers.iter().cloned())
            .collect()
    }

    pub fn pipeline(&self, kind: PipelineKind) -> Option<&PipelineResult> {
        self.pipelines.iter().find(|p| p.kind == kind)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_kind_parsing() {
        assert_eq!("iir".parse::<PipelineKind>().unwrap(), PipelineKind::Iir);
        assert_eq!(
            "Optimal".parse::<PipelineKind>().unwrap(),
            PipelineKind::Equiripple
        );
        assert_eq!(
            "freq-sampling".parse::<PipelineKind>().unwrap(),
            PipelineKind::FrequencySampling
        );
        assert!("butterworth".parse::<PipelineKind>().is_err());
    }

    #[test]
    fn test_serialized_kinds_parse_back() {
        for kind in PipelineKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            let name = json.as_str().unwrap();
            assert_eq!(name.parse::<PipelineKind>().unwrap(), kind, "{}", name);
            assert_eq!(kind.name().parse::<PipelineKind>().unwrap(), kind);
        }
        assert_eq!(
            serde_json::to_string(&PipelineKind::FrequencySampling).unwrap(),
            "\"frequency_sampling\""
        );
    }

    #[test]
    fn test_stage_labels_match_report_wording() {
        assert_eq!(PipelineKind::Iir.stage_label(0), "first IIR notch filter");
        assert_eq!(
            PipelineKind::FrequencySampling.stage_label(1),
            "second frequency sampling filter"
        );
        assert_eq!(PipelineKind::Equiripple.cascade_label(), "FIR Optimal filters");
    }

    #[test]
    fn test_spectrum_magnitude_at() {
        let spectrum = Spectrum {
            frequencies: vec![0.0, 2.0, 4.0, 6.0],
            magnitudes: vec![1.0, 2.0, 3.0, 4.0],
        };
        assert_eq!(spectrum.magnitude_at(4.2), Some(3.0));
        assert_eq!(spectrum.magnitude_at(100.0), None);
    }
}
