use crate::cli::DesignParams;
use notch_rs::{AnalysisConfig, NotchPair, PipelineKind};
use std::path::Path;

/// Validate that a sample file exists.
pub fn validate_file(file_path: &str) -> Result<(), String> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("Input file not found: {}", file_path));
    }
    if !path.is_file() {
        return Err(format!("Input path is not a file: {}", file_path));
    }
    Ok(())
}

/// Build the analysis configuration: config file first, then flag overrides.
pub fn build_config(params: &DesignParams) -> Result<AnalysisConfig, String> {
    let mut config = match &params.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .map_err(|e| format!("Config file '{}': {}", path, e))?,
        None => AnalysisConfig::default(),
    };

    if let Some(sample_rate) = params.sample_rate {
        config.sample_rate = sample_rate;
    }
    if let Some(notches) = &params.notches {
        match notches.as_slice() {
            [first, second] => config.notches = NotchPair::new(*first, *second),
            _ => {
                return Err(format!(
                    "Expected exactly two notch frequencies, got {}",
                    notches.len()
                ))
            }
        }
    }
    if let Some(width) = params.notch_width {
        config.notch_width = width;
    }
    if let Some(taps) = params.taps {
        config.num_taps = taps;
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Parse pipeline names, defaulting to every pipeline.
pub fn parse_kinds(kinds: &Option<Vec<String>>) -> Result<Vec<PipelineKind>, String> {
    match kinds {
        None => Ok(PipelineKind::ALL.to_vec()),
        Some(names) => {
            let mut parsed = Vec::with_capacity(names.len());
            for name in names {
                let kind: PipelineKind = name.parse()?;
                if !parsed.contains(&kind) {
                    parsed.push(kind);
                }
            }
            Ok(parsed)
        }
    }
}
