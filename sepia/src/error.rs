//! Error types for sepia transforms.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::raster::Dimensions;

/// Errors that can occur while configuring or running a transform.
///
/// Every variant is terminal for the current call; the raster is never left
/// partially transformed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to allocate {len} samples for the {channel} channel buffer")]
    Allocation { channel: &'static str, len: usize },

    #[error("Failed to spawn worker {index}: {source}")]
    WorkerSpawn {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("Worker {index} panicked")]
    WorkerPanicked { index: usize },

    #[error("Malformed raster: {0}")]
    MalformedRaster(String),

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: Dimensions,
        actual: Dimensions,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load configuration '{}': {reason}", path.display())]
    ConfigFile { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
