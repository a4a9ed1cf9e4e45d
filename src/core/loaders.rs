//! Input provider for aerial log documents.
//!
//! An aerial log is a JSON document of the form
//! `{ "aerial_log": { "heatmap": [[lat, lon, "timestamp", aux], ...] } }`.
//! Loaders only read and parse JSON into a tree; the structure is validated
//! by the clustering engine, which treats a `null` document as malformed.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Default location of the aerial log document.
pub const DEFAULT_INPUT_PATH: &str = "data/data.json";

/// Errors that can occur during document loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty file: {0}")]
    EmptyFile(PathBuf),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Load an aerial log document from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is empty, or is not
/// valid JSON. A file containing the literal `null` loads successfully and
/// is rejected later by the engine.
pub fn load_aerial_log<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let mut content = String::new();
    BufReader::new(file).read_to_string(&mut content)?;

    if content.trim().is_empty() {
        return Err(LoaderError::EmptyFile(path.to_path_buf()));
    }

    let document = parse_aerial_log(&content)?;
    log::debug!(
        "Loaded aerial log from {} ({:?} heatmap entries)",
        path.display(),
        heatmap_len(&document)
    );
    Ok(document)
}

/// Parse an aerial log document from a JSON string.
pub fn parse_aerial_log(content: &str) -> Result<Value> {
    Ok(serde_json::from_str(content)?)
}

/// Number of heatmap entries in a document, if it has the expected shape.
pub fn heatmap_len(document: &Value) -> Option<usize> {
    document
        .get("aerial_log")?
        .get("heatmap")?
        .as_array()
        .map(|entries| entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "aerial_log": {
            "heatmap": [
                [-2.968123, 104.800199, "07 Dec 2024 18:09:17 WIB", ["07 Dec 2024 18:09:17 WIB"]],
                [-2.96525, 104.79828, "07 Dec 2024 18:09:18 WIB", []]
            ]
        }
    }"#;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn test_load_aerial_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(temp_dir.path(), "data.json", SAMPLE);

        let doc = load_aerial_log(&path).unwrap();
        assert_eq!(heatmap_len(&doc), Some(2));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_aerial_log(temp_dir.path().join("nope.json"));
        assert!(matches!(result, Err(LoaderError::Io(_))));
    }

    #[test]
    fn test_load_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(temp_dir.path(), "empty.json", "  \n");
        assert!(matches!(load_aerial_log(&path), Err(LoaderError::EmptyFile(_))));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(temp_dir.path(), "bad.json", "{\"aerial_log\": [");
        assert!(matches!(load_aerial_log(&path), Err(LoaderError::Json(_))));
    }

    #[test]
    fn test_null_document_loads() {
        let doc = parse_aerial_log("null").unwrap();
        assert!(doc.is_null());
        assert_eq!(heatmap_len(&doc), None);
    }
}
