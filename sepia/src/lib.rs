//! Sepia - channel-transform execution core.
//!
//! Applies a sepia tone to an interleaved 3-channel 8-bit raster using one of
//! several interchangeable execution strategies:
//! - per-pixel accessor calls
//! - direct scalar transform over planar channels, optionally threaded
//! - fixed-point or floating-point 8-wide vector lanes, optionally threaded
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sepia::{ChannelOrder, Raster, SepiaConfig, Strategy};
//!
//! let mut raster = Raster::filled(16, 16, ChannelOrder::Bgr, (90, 90, 90))?;
//! let report = sepia::apply(&mut raster, Strategy::VectorIntThreaded, &SepiaConfig::default())?;
//!
//! assert_eq!(raster.pixel(0, 0), (70, 110, 130));
//! ```

pub mod config;
pub mod error;
pub mod lanes;
pub mod partition;
pub mod raster;
pub mod strategy;
pub mod task;
pub mod transform;

#[cfg(test)]
pub mod testing;

pub use config::{DEFAULT_WORKER_COUNT, SepiaConfig};
pub use error::{Error, Result};
pub use lanes::{LANE_WIDTH, LaneBackend, LaneKernel};
pub use partition::{PartitionMode, Segment};
pub use raster::{ChannelOrder, Dimensions, PlanarBuffer, Raster, Sample};
pub use strategy::{Strategy, TransformReport, apply};
pub use task::{TransformTask, spawn_transform};
pub use transform::SepiaParams;
