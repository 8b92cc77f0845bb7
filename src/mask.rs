use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use log::error;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::geometry::{scale_points, CanvasTransform};
use crate::types::{RasterizeStats, Shape};

const FOREGROUND: Luma<u8> = Luma([255u8]);

/// Rasterize the polygon shapes of one frame into per-class binary masks.
///
/// Only shapes typed `"polygon"` with a label from `known_labels`
/// contribute; everything else is dropped without touching any mask. A mask
/// exists for every label that appears at least once, even when its
/// polygons are degenerate, and same-class polygons accumulate as a union:
/// a later polygon never erases an earlier fill.
pub fn rasterize_masks(
    shapes: &[Shape],
    transform: &CanvasTransform,
    known_labels: &HashSet<String>,
    stats: &mut RasterizeStats,
) -> BTreeMap<String, GrayImage> {
    let mut masks: BTreeMap<String, GrayImage> = BTreeMap::new();

    for shape in shapes {
        if shape.shape_type != "polygon" {
            stats.shapes_skipped_type += 1;
            continue;
        }
        if !known_labels.contains(&shape.label) {
            stats.shapes_unknown_label += 1;
            continue;
        }

        let mask = masks
            .entry(shape.label.clone())
            .or_insert_with(|| GrayImage::new(transform.target_size, transform.target_size));

        let mut vertices = scale_points(&shape.points, transform.scale);
        // the vertex list is implicitly closed; a repeated closing vertex or
        // a lone point would trip the rasterization layer
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() >= 2 {
            draw_polygon_mut(mask, &vertices, FOREGROUND);
        }
        stats.shapes_rasterized += 1;
    }

    masks
}

/// Encode each mask as a PNG under `{masks_root}/{label}/{base_name}.png`,
/// creating the class directory on first use.
///
/// A failed encode skips that raster after naming the failing
/// (image, class) pair in the log; returns how many masks were written.
pub fn write_masks(
    masks: &BTreeMap<String, GrayImage>,
    masks_root: &Path,
    base_name: &str,
) -> std::io::Result<usize> {
    let mut written = 0;
    for (label, mask) in masks {
        let class_dir = masks_root.join(label);
        fs::create_dir_all(&class_dir)?;
        let mask_path = class_dir.join(format!("{base_name}.png"));
        if let Err(e) = mask.save(&mask_path) {
            error!("failed to encode mask for image {base_name}, class {label}: {e}");
            continue;
        }
        written += 1;
    }
    Ok(written)
}
