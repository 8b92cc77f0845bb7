use log::warn;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::types::{AnnotationEntry, ManifestEntry, ManifestLine, Shape};

/// Parse an annotations document: an array of entries, each carrying a
/// `shapes` array. The document is parsed as a whole, so a malformed file
/// fails the task rather than individual entries.
pub fn read_annotations(path: &Path) -> Result<Vec<AnnotationEntry>, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let entries = serde_json::from_reader(BufReader::new(file))?;
    Ok(entries)
}

/// Group every shape across all annotation entries by its frame index.
///
/// Shapes and manifest lines are associated only through this integer, so
/// the join is materialized as an explicit keyed lookup instead of relying
/// on array positions staying aligned.
pub fn group_shapes_by_frame(entries: Vec<AnnotationEntry>) -> BTreeMap<usize, Vec<Shape>> {
    let mut shapes_by_frame: BTreeMap<usize, Vec<Shape>> = BTreeMap::new();
    for entry in entries {
        for shape in entry.shapes {
            shapes_by_frame.entry(shape.frame).or_default().push(shape);
        }
    }
    shapes_by_frame
}

/// Parse a manifest.jsonl file into ordered frame entries.
///
/// Line position among the kept entries is the frame index. CVAT manifests
/// open with header lines that carry no `name`; those and any line missing
/// a required field are skipped.
pub fn read_manifest(path: &Path) -> std::io::Result<Vec<ManifestEntry>> {
    let file = File::open(path)?;
    let mut entries = Vec::new();

    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: ManifestLine = match serde_json::from_str(&line) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("skipping malformed manifest line in {}: {}", path.display(), e);
                continue;
            }
        };
        let (Some(name), Some(extension), Some(width), Some(height)) =
            (parsed.name, parsed.extension, parsed.width, parsed.height)
        else {
            continue;
        };
        entries.push(ManifestEntry {
            file_name: format!("{name}{extension}"),
            width,
            height,
        });
    }

    Ok(entries)
}
