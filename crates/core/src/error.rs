//! Error types
//!
//! Only construction can fail. Once a detector and analyzer exist, analysis of
//! a round always yields a result; missing data shows up as zero or empty
//! fields rather than errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to build a level mesh. Fatal for the map: no detector is produced.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Mesh file missing or unreadable
    #[error("failed to read mesh file {}: {source}", path.display())]
    Io {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Map name that cannot be turned into a file name
    #[error("invalid map name {0:?}")]
    InvalidMapName(String),
}

/// Failure to set up the aim analyzer.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Worker pool for reaction-time searches could not be created
    #[error("failed to build reaction-time worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// Configuration value outside its valid range
    #[error("invalid analysis config: {0}")]
    InvalidConfig(String),
}
