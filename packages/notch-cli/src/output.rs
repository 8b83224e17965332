use std::io::Write;
use std::path::Path;

/// Write JSON string to stdout or a file.
pub fn write_output(json: &str, output_path: Option<&str>) -> Result<(), String> {
    match output_path {
        Some(path) => write_file(path, json),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(json.as_bytes())
                .and_then(|_| handle.write_all(b"\n"))
                .map_err(|e| format!("Failed to write to stdout: {}", e))
        }
    }
}

/// Write text to a file, replacing any previous contents.
pub fn write_file(path: &str, contents: &str) -> Result<(), String> {
    std::fs::write(Path::new(path), contents)
        .map_err(|e| format!("Failed to write output file '{}': {}", path, e))
}

/// Serialize a value to JSON (pretty or compact).
pub fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, String> {
    if compact {
        serde_json::to_string(value).map_err(|e| format!("JSON serialization failed: {}", e))
    } else {
        serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_json_has_no_newlines() {
        let value = serde_json::json!({ "taps": [1.0, 2.0] });
        assert!(!to_json(&value, true).unwrap().contains('\n'));
        assert!(to_json(&value, false).unwrap().contains('\n'));
    }

    #[test]
    fn test_write_file_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        assert!(write_file(path.to_str().unwrap(), "{}").is_err());
    }
}
