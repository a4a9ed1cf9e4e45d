//! Fixed-radius greedy clustering for aerial log sightings.
//!
//! Nearby sightings collapse into one record that carries the most recent
//! timestamp and the number of points it stands for. The algorithm:
//!
//! 1. Parse every heatmap entry (coordinates + fixed-format timestamp)
//! 2. If `max_distance == 0`, return every point as its own cluster in input order
//! 3. Stable-sort points newest first
//! 4. Each unclaimed point, in sorted order, opens a cluster as its anchor and
//!    claims every unclaimed point within `max_distance` (haversine) of it,
//!    scanning the whole sorted sequence
//! 5. Emit one summary per cluster, in the order clusters were opened
//!
//! Membership is measured against the anchor only; clusters do not chain.
//!
//! # Example
//!
//! ```
//! use aerial_clustering::processors::clustering::ClusterEngine;
//! use serde_json::json;
//!
//! let input = json!({
//!     "aerial_log": {
//!         "heatmap": [
//!             [-2.96525, 104.79828, "07 Dec 2024 18:09:18 WIB", []],
//!             [-2.96525, 104.79828, "07 Dec 2024 18:10:20 WIB", []]
//!         ]
//!     }
//! });
//!
//! let engine = ClusterEngine::new(100.0).unwrap();
//! let summaries = engine.process(&input).unwrap();
//! assert_eq!(summaries.len(), 1);
//! assert_eq!(summaries[0].point_count, 2);
//! assert_eq!(summaries[0].timestamp, "07 Dec 2024 18:10:20 WIB");
//! ```

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDateTime;
use serde_json::Value;
use thiserror::Error;

use crate::config::{OutputFormat, PipelineConfig};
use crate::core::geo::{haversine_distance, is_valid_coordinate};
use crate::core::loaders::load_aerial_log;
use crate::core::records::{ClusterSummary, RawPoint};
use crate::core::timestamp::{parse_timestamp, TimestampError};
use crate::core::writers::{write_summaries_csv, write_summaries_json};

/// Tolerance added to the radius so exact-boundary distances are not lost to rounding.
pub const DISTANCE_EPSILON: f64 = 1e-10;

/// Default cluster radius in meters.
pub const DEFAULT_MAX_DISTANCE: f64 = 100.0;

/// Errors that abort a clustering call. There is no partial result.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("invalid coordinate at {location}: {value}")]
    InvalidCoordinate { location: String, value: String },

    #[error("bad timestamp at heatmap[{index}]: {source}")]
    TimestampFormat {
        index: usize,
        #[source]
        source: TimestampError,
    },

    #[error("max_distance must be a non-negative number, got {0}")]
    InvalidRadius(f64),
}

/// Result type for clustering operations.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// A heatmap point after timestamp parsing. Lives for one `process` call.
#[derive(Debug, Clone)]
pub struct ParsedPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Original timestamp string, copied to the output verbatim.
    pub timestamp: String,
    pub parsed_time: NaiveDateTime,
    /// `[latitude, longitude]`
    pub coords: [f64; 2],
}

impl ParsedPoint {
    /// Parse a raw point; `index` is its heatmap position, used in errors.
    pub fn parse(index: usize, raw: &RawPoint) -> Result<Self> {
        let coords = raw.coords();
        if !is_valid_coordinate(coords) {
            return Err(ClusterError::InvalidCoordinate {
                location: format!("heatmap[{}]", index),
                value: format!("{:?}", coords),
            });
        }

        let parsed_time = parse_timestamp(&raw.timestamp)
            .map_err(|source| ClusterError::TimestampFormat { index, source })?;

        Ok(Self {
            latitude: raw.latitude,
            longitude: raw.longitude,
            timestamp: raw.timestamp.clone(),
            parsed_time,
            coords,
        })
    }

    fn to_summary(&self, point_count: usize) -> ClusterSummary {
        ClusterSummary {
            latitude: self.latitude,
            longitude: self.longitude,
            timestamp: self.timestamp.clone(),
            point_count,
        }
    }
}

/// One group of points, as indices into the parsed point slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Point that opened the cluster; membership distance is measured from it.
    pub anchor: usize,
    /// Anchor first, then joiners in scan order.
    pub members: Vec<usize>,
}

impl Cluster {
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Index of the most recent member. Ties go to the earliest member in
    /// cluster order, so the anchor wins a tie.
    pub fn representative(&self, points: &[ParsedPoint]) -> usize {
        self.members.iter().copied().fold(self.anchor, |best, i| {
            if points[i].parsed_time > points[best].parsed_time {
                i
            } else {
                best
            }
        })
    }
}

/// Radius-based greedy clustering engine.
///
/// Holds only the radius, so one engine can serve any number of calls,
/// including concurrent ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterEngine {
    max_distance: f64,
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }
}

impl ClusterEngine {
    /// Create an engine with a radius in meters. Zero disables clustering.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::InvalidRadius`] for negative or non-finite radii.
    pub fn new(max_distance: f64) -> Result<Self> {
        if !max_distance.is_finite() || max_distance < 0.0 {
            return Err(ClusterError::InvalidRadius(max_distance));
        }
        Ok(Self { max_distance })
    }

    #[inline]
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Haversine distance in meters between two `[latitude, longitude]` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::InvalidCoordinate`] if any component is NaN or infinite.
    pub fn distance(&self, a: [f64; 2], b: [f64; 2]) -> Result<f64> {
        for (name, coord) in [("first point", a), ("second point", b)] {
            if !is_valid_coordinate(coord) {
                return Err(ClusterError::InvalidCoordinate {
                    location: name.to_string(),
                    value: format!("{:?}", coord),
                });
            }
        }
        Ok(haversine_distance(a, b))
    }

    /// Cluster an aerial log document (`{"aerial_log": {"heatmap": [...]}}`).
    ///
    /// # Errors
    ///
    /// Fails for the whole document if its structure is wrong, any
    /// coordinate is missing or non-numeric, or any timestamp does not match
    /// the fixed format. A `null` document is malformed, not empty.
    pub fn process(&self, input: &Value) -> Result<Vec<ClusterSummary>> {
        let raw = extract_heatmap(input)?;
        self.process_points(&raw)
    }

    /// Cluster already-extracted heatmap points.
    pub fn process_points(&self, raw: &[RawPoint]) -> Result<Vec<ClusterSummary>> {
        let points = parse_points(raw)?;
        let clusters = self.group(&points);

        log::debug!(
            "{} points -> {} clusters (max_distance={} m)",
            points.len(),
            clusters.len(),
            self.max_distance
        );

        Ok(summarize(&points, &clusters))
    }

    /// Partition points into clusters.
    ///
    /// With a zero radius every point is a singleton, in input order, and no
    /// distance is computed. Otherwise clusters are returned in the order
    /// they were opened.
    pub fn group(&self, points: &[ParsedPoint]) -> Vec<Cluster> {
        let n = points.len();

        if self.max_distance == 0.0 {
            return (0..n)
                .map(|i| Cluster {
                    anchor: i,
                    members: vec![i],
                })
                .collect();
        }

        // Stable, so equal timestamps keep their input order
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| points[b].parsed_time.cmp(&points[a].parsed_time));

        let threshold = self.max_distance + DISTANCE_EPSILON;
        let mut claimed = vec![false; n];
        let mut clusters = Vec::new();

        for &anchor in &order {
            if claimed[anchor] {
                continue;
            }
            claimed[anchor] = true;

            let anchor_coords = points[anchor].coords;
            let mut members = vec![anchor];

            // Whole sequence, not just the points after the anchor
            for &other in &order {
                if claimed[other] {
                    continue;
                }
                if haversine_distance(anchor_coords, points[other].coords) <= threshold {
                    claimed[other] = true;
                    members.push(other);
                }
            }

            clusters.push(Cluster { anchor, members });
        }

        clusters
    }
}

/// Reduce each cluster to its representative's summary.
pub fn summarize(points: &[ParsedPoint], clusters: &[Cluster]) -> Vec<ClusterSummary> {
    clusters
        .iter()
        .map(|cluster| points[cluster.representative(points)].to_summary(cluster.len()))
        .collect()
}

/// Parse raw points, failing on the first bad one.
pub fn parse_points(raw: &[RawPoint]) -> Result<Vec<ParsedPoint>> {
    raw.iter()
        .enumerate()
        .map(|(i, point)| ParsedPoint::parse(i, point))
        .collect()
}

/// Pull the ordered heatmap entries out of an aerial log document.
///
/// Each entry must be a 4-element array `[lat, lon, timestamp, aux]`; `aux`
/// may be anything and is discarded.
pub fn extract_heatmap(input: &Value) -> Result<Vec<RawPoint>> {
    if input.is_null() {
        return Err(ClusterError::MalformedInput("document is null".to_string()));
    }

    let aerial_log = input
        .get("aerial_log")
        .ok_or_else(|| ClusterError::MalformedInput("missing 'aerial_log' field".to_string()))?;

    let heatmap = aerial_log
        .get("heatmap")
        .ok_or_else(|| ClusterError::MalformedInput("missing 'aerial_log.heatmap' field".to_string()))?
        .as_array()
        .ok_or_else(|| ClusterError::MalformedInput("'aerial_log.heatmap' is not an array".to_string()))?;

    heatmap
        .iter()
        .enumerate()
        .map(|(i, entry)| raw_point_from_entry(i, entry))
        .collect()
}

fn raw_point_from_entry(index: usize, entry: &Value) -> Result<RawPoint> {
    let fields = match entry.as_array() {
        Some(fields) if fields.len() == 4 => fields,
        _ => {
            return Err(ClusterError::MalformedInput(format!(
                "heatmap[{}] is not a [lat, lon, timestamp, aux] entry",
                index
            )))
        }
    };

    let latitude = coordinate(index, "latitude", &fields[0])?;
    let longitude = coordinate(index, "longitude", &fields[1])?;
    let timestamp = fields[2].as_str().ok_or_else(|| {
        ClusterError::MalformedInput(format!("heatmap[{}] timestamp is not a string", index))
    })?;

    Ok(RawPoint::new(latitude, longitude, timestamp))
}

fn coordinate(index: usize, field: &str, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| ClusterError::InvalidCoordinate {
        location: format!("heatmap[{}].{}", index, field),
        value: value.to_string(),
    })
}

/// Load an aerial log file, cluster it, and optionally write the summaries.
///
/// # Arguments
///
/// * `input_path` - Aerial log JSON document
/// * `output_path` - Where to write summaries (format from `config.output`); skipped if `None`
/// * `config` - Pipeline configuration (radius and output format)
///
/// # Errors
///
/// Returns error if loading, clustering or writing fails.
pub fn process_file_clustering(
    input_path: &Path,
    output_path: Option<&Path>,
    config: &PipelineConfig,
) -> anyhow::Result<Vec<ClusterSummary>> {
    let engine = ClusterEngine::new(config.clustering.max_distance)?;

    let document = load_aerial_log(input_path)
        .with_context(|| format!("failed to load aerial log {}", input_path.display()))?;

    let summaries = engine
        .process(&document)
        .with_context(|| format!("failed to cluster {}", input_path.display()))?;

    let total_points: usize = summaries.iter().map(|s| s.point_count).sum();
    let largest = summaries.iter().map(|s| s.point_count).max().unwrap_or(0);
    let file_name = input_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    log::info!(
        "{}: {} points -> {} clusters (largest={}, max_distance={} m)",
        file_name,
        total_points,
        summaries.len(),
        largest,
        engine.max_distance()
    );

    if let Some(path) = output_path {
        match config.output.format {
            OutputFormat::Json => write_summaries_json(path, &summaries, config.output.pretty)?,
            OutputFormat::Csv => write_summaries_csv(path, &summaries)?,
        }
        log::info!("Summaries -> {}", path.display());
    }

    Ok(summaries)
}
