//! Fixed-radius clustering of geolocated aerial log sightings.
//!
//! This crate provides tools for:
//! - Loading aerial log JSON documents (`aerial_log.heatmap` entries)
//! - Haversine great-circle distance on a spherical Earth
//! - Greedy newest-first radius clustering that folds nearby sightings into
//!   one record carrying the latest timestamp and a point count
//! - Writing cluster summaries as JSON or CSV
//!
//! # Example
//!
//! ```no_run
//! use aerial_clustering::{core::loaders::load_aerial_log, ClusterEngine};
//!
//! let document = load_aerial_log("data/data.json").unwrap();
//! let summaries = ClusterEngine::new(100.0).unwrap().process(&document).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;

pub use config::{ClusteringConfig, InputConfig, OutputConfig, OutputFormat, PipelineConfig};
pub use crate::core::records::{ClusterSummary, RawPoint};
pub use processors::clustering::{ClusterEngine, ClusterError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
