//! Core data types, geometry and I/O operations.

pub mod geo;
pub mod loaders;
pub mod records;
pub mod timestamp;
pub mod writers;

pub use loaders::{load_aerial_log, LoaderError};
pub use records::{ClusterSummary, RawPoint};
pub use writers::{write_summaries_csv, write_summaries_json, WriteError};
