//! Sample file loading
//!
//! Recordings are plain text: decimal amplitudes separated by any whitespace,
//! one or many per line. Lines starting with `#` are comments.

use crate::error::{NotchError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Open a file and map it into memory (read-only)
pub fn mmap_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path).map_err(NotchError::IoError)?;
    let mmap = unsafe { Mmap::map(&file).map_err(NotchError::IoError)? };
    Ok(mmap)
}

/// Load every sample of a recording
///
/// Empty files are rejected before mapping, since a zero-length mapping fails
/// on some platforms.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let len = std::fs::metadata(path)?.len();
    if len == 0 {
        return Err(NotchError::ParseError(format!(
            "Sample file {} is empty",
            path.display()
        )));
    }

    let mmap = mmap_file(path)?;
    let samples = parse_samples_from_bytes(&mmap)?;
    log::info!("Loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Parse whitespace-separated samples from text
pub fn parse_samples(content: &str) -> Result<Vec<f64>> {
    parse_samples_from_bytes(content.as_bytes())
}

/// Parse whitespace-separated samples from a byte slice (e.g. mmap)
pub fn parse_samples_from_bytes(content: &[u8]) -> Result<Vec<f64>> {
    let mut samples = Vec::new();

    for (line_idx, line) in content.split(|&b| b == b'\n').enumerate() {
        let first = line.iter().position(|b| !b.is_ascii_whitespace());
        match first {
            None => continue,
            Some(i) if line[i] == b'#' => continue,
            Some(_) => {}
        }

        for (field_idx, field) in line
            .split(|b| b.is_ascii_whitespace())
            .filter(|f| !f.is_empty())
            .enumerate()
        {
            let value = std::str::from_utf8(field)
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(|| {
                    NotchError::ParseError(format!(
                        "Line {}, field {}: '{}' is not a number",
                        line_idx + 1,
                        field_idx + 1,
                        String::from_utf8_lossy(field)
                    ))
                })?;
            if !value.is_finite() {
                return Err(NotchError::ParseError(format!(
                    "Line {}, field {}: non-finite sample",
                    line_idx + 1,
                    field_idx + 1
                )));
            }
            samples.push(value);
        }
    }

    if samples.is_empty() {
        return Err(NotchError::ParseError(
            "No samples found in input".to_string(),
        ));
    }

    Ok(samples)
}
