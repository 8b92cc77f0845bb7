use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Side length of the square output canvas shared by photos and masks.
pub const TARGET_SIZE: u32 = 1024;

/// Default seed for the split shuffle; fixed so reruns reproduce the split.
pub const DEFAULT_SEED: u64 = 28;

/// The segmentation classes present in the wound-photography exports.
pub const ALL_LABELS: &[&str] = &[
    "ВсяРана",
    "Фибрин",
    "Металлоконструкция",
    "Зона шва",
    "Зона отека вокруг раны",
    "Зона гиперемии вокруг",
    "Зона некроза",
    "Зона грануляций",
    "Вторичная пигментация",
    "Подкожная жир.кл. без грануляций",
    "Фасция без грануляций",
    "Сухожилие",
    "Гнойное отделяемое",
];

// One annotated shape; `points` is a flat (x0, y0, x1, y1, ...) list in the
// source image's native coordinate space.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Shape {
    pub frame: usize,
    #[serde(rename = "type")]
    pub shape_type: String,
    pub label: String,
    pub points: Vec<f64>,
}

// One entry of the annotations document; the document is an array of these.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnnotationEntry {
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

// Raw manifest.jsonl line. CVAT manifests start with header lines that carry
// no `name`, so every field is optional at the parsing layer.
#[derive(Debug, Deserialize, Clone)]
pub struct ManifestLine {
    pub name: Option<String>,
    pub extension: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// One frame of a task manifest: the photo's file name and native dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// One photo together with every class mask that exists for it on disk.
/// This is the unit the partitioner shuffles and assigns to a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRecord {
    pub image_path: PathBuf,
    pub mask_paths: BTreeMap<String, PathBuf>,
}

// Struct to hold the split datasets for training, validation, and testing
pub struct SplitData {
    pub train_records: Vec<DatasetRecord>,
    pub val_records: Vec<DatasetRecord>,
    pub test_records: Vec<DatasetRecord>,
}

// Struct to hold rasterization statistics
#[derive(Debug, Default, Clone)]
pub struct RasterizeStats {
    pub frames_processed: usize,
    pub masks_written: usize,
    pub shapes_rasterized: usize,
    pub shapes_skipped_type: usize,
    pub shapes_unknown_label: usize,
    pub frames_missing_image: usize,
}

impl RasterizeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_summary(&self) {
        log::info!("=== Rasterization Summary ===");
        log::info!("Frames processed: {}", self.frames_processed);
        log::info!("Masks written: {}", self.masks_written);
        log::info!("Polygons rasterized: {}", self.shapes_rasterized);
        if self.shapes_skipped_type > 0 {
            log::info!(
                "Shapes ignored (non-polygon type): {}",
                self.shapes_skipped_type
            );
        }
        if self.shapes_unknown_label > 0 {
            log::warn!(
                "Shapes dropped (label outside the class list): {}",
                self.shapes_unknown_label
            );
        }
        if self.frames_missing_image > 0 {
            log::warn!(
                "Frames skipped (missing image file): {}",
                self.frames_missing_image
            );
        }
    }
}
