//! CVAT export to segmentation dataset converter
//!
//! This library turns per-task polygon annotations and raw photos into a
//! normalized dataset of fixed-size images with per-class binary masks,
//! and deterministically partitions that dataset into train/val/test
//! subsets.

pub mod annotations;
pub mod canvas;
pub mod config;
pub mod dataset;
pub mod geometry;
pub mod io;
pub mod mask;
pub mod rasterize;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{PreprocessArgs, SplitArgs};
pub use dataset::partition_dataset;
pub use geometry::CanvasTransform;
pub use io::extract_export_archive;
pub use rasterize::process_export;
pub use types::{DatasetRecord, RasterizeStats, Shape, SplitData, ALL_LABELS, TARGET_SIZE};
