//! Input and output records.

use serde::{Deserialize, Serialize};

/// One heatmap entry: a sighting at `(latitude, longitude)` at `timestamp`.
///
/// The fourth element of a heatmap entry (auxiliary data) is not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
}

impl RawPoint {
    pub fn new(latitude: f64, longitude: f64, timestamp: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: timestamp.into(),
        }
    }

    /// `[latitude, longitude]` in degrees.
    #[inline]
    pub fn coords(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// One output record per cluster.
///
/// Coordinates and timestamp are copied verbatim from the cluster's
/// representative member; `point_count` is the number of folded points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
    pub point_count: usize,
}
