use glob::glob;
use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::annotations::{group_shapes_by_frame, read_annotations, read_manifest};
use crate::canvas::{load_oriented, normalize_image};
use crate::config::PreprocessArgs;
use crate::geometry::CanvasTransform;
use crate::mask::{rasterize_masks, write_masks};
use crate::types::RasterizeStats;
use crate::utils::create_progress_bar;

// Struct to hold the paths to the output trees of one preprocessing run
pub struct RasterOutputDirs {
    pub images_dir: PathBuf,
    pub masks_dir: PathBuf,
}

/// Create the images/ and masks/ trees under the output root. Existing
/// directories are reused so reruns overwrite their previous outputs.
pub fn setup_raster_directories(output_root: &Path) -> io::Result<RasterOutputDirs> {
    let images_dir = output_root.join("images");
    let masks_dir = output_root.join("masks");
    fs::create_dir_all(&images_dir)?;
    fs::create_dir_all(&masks_dir)?;
    Ok(RasterOutputDirs {
        images_dir,
        masks_dir,
    })
}

/// Derive the globally-unique base name for one frame: the task identifier
/// plus the file name stem up to the first dot. The task prefix keeps stems
/// from different tasks from colliding in the flat output trees.
pub fn frame_base_name(task_name: &str, file_name: &str) -> String {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    sanitize_filename::sanitize(format!("{task_name}_{stem}"))
}

/// Process every frame of one task folder: resize the photo onto the square
/// canvas and rasterize that frame's polygons into per-class masks.
pub fn process_task(
    task_dir: &Path,
    output_dirs: &RasterOutputDirs,
    known_labels: &HashSet<String>,
    keep_going: bool,
    stats: &mut RasterizeStats,
) -> Result<(), Box<dyn std::error::Error>> {
    let task_name = task_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| format!("task path has no directory name: {}", task_dir.display()))?;

    let entries = read_annotations(&task_dir.join("annotations.json"))?;
    let shapes_by_frame = group_shapes_by_frame(entries);

    let data_dir = task_dir.join("data");
    let manifest = read_manifest(&data_dir.join("manifest.jsonl"))?;

    let pb = create_progress_bar(manifest.len() as u64, &task_name);
    for (frame_index, entry) in manifest.iter().enumerate() {
        let image_path = data_dir.join(&entry.file_name);
        let base_name = frame_base_name(&task_name, &entry.file_name);
        let shapes = shapes_by_frame
            .get(&frame_index)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let image = match load_oriented(&image_path) {
            Ok(image) => image,
            Err(e) => {
                if keep_going {
                    warn!(
                        "skipping frame {} of {}: {}: {}",
                        frame_index,
                        task_name,
                        image_path.display(),
                        e
                    );
                    stats.frames_missing_image += 1;
                    pb.inc(1);
                    continue;
                }
                return Err(
                    format!("failed to read image {}: {}", image_path.display(), e).into(),
                );
            }
        };

        // one transform per image, shared by the resize and every polygon
        let transform = CanvasTransform::fit(entry.width, entry.height);
        let normalized = normalize_image(&image, entry.width, entry.height, &transform);
        normalized.save(output_dirs.images_dir.join(format!("{base_name}.png")))?;

        let masks = rasterize_masks(shapes, &transform, known_labels, stats);
        stats.masks_written += write_masks(&masks, &output_dirs.masks_dir, &base_name)?;
        stats.frames_processed += 1;
        pb.inc(1);
    }
    pb.finish();

    Ok(())
}

/// Process every task_* folder under the export root.
pub fn process_export(
    export_root: &Path,
    output_root: &Path,
    args: &PreprocessArgs,
) -> Result<RasterizeStats, Box<dyn std::error::Error>> {
    let output_dirs = setup_raster_directories(output_root)?;
    let known_labels: HashSet<String> = args.known_labels().into_iter().collect();
    let mut stats = RasterizeStats::new();

    let pattern = format!("{}/task_*", export_root.display());
    let mut task_dirs: Vec<PathBuf> = glob(&pattern)?
        .filter_map(Result::ok)
        .filter(|path| path.is_dir())
        .collect();
    task_dirs.sort();

    if task_dirs.is_empty() {
        warn!("no task folders found under {}", export_root.display());
    }

    for task_dir in &task_dirs {
        info!("processing {}", task_dir.display());
        process_task(
            task_dir,
            &output_dirs,
            &known_labels,
            args.keep_going,
            &mut stats,
        )?;
    }

    Ok(stats)
}
