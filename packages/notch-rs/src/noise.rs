//! Noise power removed by filtering
//!
//! The power of the component a filter removes is estimated as the drop in
//! population variance between its input and output. A negative value means
//! the filter added energy and is reported unchanged.

use crate::error::{NotchError, Result};
use crate::types::{CascadeOutput, PipelineKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Noise power attributed to one filter stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoisePowerEntry {
    pub label: String,
    pub value: f64,
}

impl NoisePowerEntry {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl fmt::Display for NoisePowerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.1}", self.label, self.value)
    }
}

/// Population variance E[x^2] - E[x]^2
pub fn variance(samples: &[f64]) -> Result<f64> {
    if samples.len() < 2 {
        return Err(NotchError::InsufficientSamples {
            got: samples.len(),
            required: 2,
        });
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let mean_sq = samples.iter().map(|x| x * x).sum::<f64>() / n;
    Ok(mean_sq - mean * mean)
}

/// var(original) - var(filtered), over sequences of equal length
pub fn noise_power(original: &[f64], filtered: &[f64]) -> Result<f64> {
    if original.len() != filtered.len() {
        return Err(NotchError::LengthMismatch {
            original: original.len(),
            filtered: filtered.len(),
        });
    }
    Ok(variance(original)? - variance(filtered)?)
}

/// Noise power of the whole cascade, then of each stage on its own input
pub fn stage_noise_powers(
    kind: PipelineKind,
    input: &[f64],
    output: &CascadeOutput,
) -> Result<Vec<NoisePowerEntry>> {
    Ok(vec![
        NoisePowerEntry::new(kind.cascade_label(), noise_power(input, &output.full)?),
        NoisePowerEntry::new(kind.stage_label(0), noise_power(input, &output.partial)?),
        NoisePowerEntry::new(
            kind.stage_label(1),
            noise_power(&output.partial, &output.full)?,
        ),
    ])
}

/// Human-readable report, one line per entry
pub fn format_report(entries: &[NoisePowerEntry], unit: &str) -> String {
    entries
        .iter()
        .map(|e| {
            format!(
                "The mean power removed by the {} is {:.1} {}\n",
                e.label, e.value, unit
            )
        })
        .collect()
}
