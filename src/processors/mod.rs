//! Data processing modules.

pub mod clustering;

// Re-export key types for convenience
pub use clustering::{
    process_file_clustering, Cluster, ClusterEngine, ClusterError, ParsedPoint,
};
