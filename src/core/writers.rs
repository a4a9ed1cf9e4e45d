//! Data writers for cluster summaries.
//!
//! This module persists clustering results as:
//! - JSON arrays of `{latitude, longitude, timestamp, point_count}` objects
//! - CSV with a `latitude,longitude,timestamp,point_count` header

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use super::records::ClusterSummary;

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV writing error.
    #[error("CSV write error for '{path}': {source}")]
    CsvError {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// JSON serialization error.
    #[error("JSON write error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Creates a buffered writer for the given path.
fn create_buffered_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Serialize summaries to a JSON string.
pub fn summaries_to_json(summaries: &[ClusterSummary], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(summaries)?
    } else {
        serde_json::to_string(summaries)?
    };
    Ok(json)
}

/// Write summaries to a JSON file as a single array.
///
/// # Errors
///
/// Returns an error if:
/// - Parent directories cannot be created
/// - File cannot be created or written to
///
/// # Example
///
/// ```no_run
/// use aerial_clustering::core::writers::write_summaries_json;
/// use std::path::Path;
///
/// write_summaries_json(Path::new("clusters.json"), &[], true).unwrap();
/// ```
pub fn write_summaries_json(path: &Path, summaries: &[ClusterSummary], pretty: bool) -> Result<()> {
    ensure_parent_dirs(path)?;
    let mut writer = create_buffered_writer(path)?;
    let path_str = path.display().to_string();

    let json = summaries_to_json(summaries, pretty)?;
    writeln!(writer, "{}", json).map_err(|e| WriteError::WriteFile {
        path: path_str.clone(),
        source: e,
    })?;

    writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str,
        source: e,
    })?;

    Ok(())
}

/// Write summaries to CSV, one row per cluster.
///
/// Values are written as-is; the timestamp is the representative's original
/// string.
pub fn write_summaries_csv(path: &Path, summaries: &[ClusterSummary]) -> Result<()> {
    ensure_parent_dirs(path)?;

    let buf_writer = create_buffered_writer(path)?;
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(buf_writer);

    let path_str = path.display().to_string();

    // Written explicitly so an empty result still gets a header
    csv_writer
        .write_record(["latitude", "longitude", "timestamp", "point_count"])
        .map_err(|e| WriteError::CsvError {
            path: path_str.clone(),
            source: e,
        })?;

    for summary in summaries {
        csv_writer
            .serialize(summary)
            .map_err(|e| WriteError::CsvError {
                path: path_str.clone(),
                source: e,
            })?;
    }

    csv_writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str,
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_summaries() -> Vec<ClusterSummary> {
        vec![
            ClusterSummary {
                latitude: -2.96525,
                longitude: 104.79828,
                timestamp: "07 Dec 2024 18:10:20 WIB".to_string(),
                point_count: 3,
            },
            ClusterSummary {
                latitude: -2.972362,
                longitude: 104.791319,
                timestamp: "07 Dec 2024 18:10:19 WIB".to_string(),
                point_count: 1,
            },
        ]
    }

    #[test]
    fn test_write_summaries_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clusters.json");
        let summaries = sample_summaries();

        write_summaries_json(&path, &summaries, true).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: Vec<ClusterSummary> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, summaries);
        assert!(content.contains("\"point_count\": 3"));
    }

    #[test]
    fn test_compact_json_is_single_line() {
        let json = summaries_to_json(&sample_summaries(), false).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with("[{\"latitude\":-2.96525"));
    }

    #[test]
    fn test_write_summaries_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clusters.csv");

        write_summaries_csv(&path, &sample_summaries()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "latitude,longitude,timestamp,point_count");
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert_eq!(lines[1], "-2.96525,104.79828,07 Dec 2024 18:10:20 WIB,3");
    }

    #[test]
    fn test_write_empty_csv_has_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_summaries_csv(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "latitude,longitude,timestamp,point_count");
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subdir").join("nested").join("clusters.json");

        write_summaries_json(&path, &sample_summaries(), false).unwrap();

        assert!(path.exists());
    }
}
