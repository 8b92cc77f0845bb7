use glob::glob;
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::config::SplitArgs;
use crate::io::{copy_record, setup_split_directories};
use crate::types::{DatasetRecord, SplitData};
use crate::utils::create_progress_bar;

/// Class names are whatever directories the rasterizer actually created;
/// classes with no instances in the export simply do not exist here.
pub fn discover_classes(masks_dir: &Path) -> io::Result<Vec<String>> {
    let mut classes = Vec::new();
    if !masks_dir.is_dir() {
        return Ok(classes);
    }
    for entry in fs::read_dir(masks_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            classes.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    classes.sort();
    Ok(classes)
}

/// Build the record list: every resized photo paired with the same-named
/// mask from each class directory that has one. A photo with no mask in any
/// class cannot form a supervised pair and is excluded entirely.
pub fn collect_records(
    dataset_root: &Path,
    classes: &[String],
) -> Result<Vec<DatasetRecord>, Box<dyn std::error::Error>> {
    let images_dir = dataset_root.join("images");
    let masks_dir = dataset_root.join("masks");

    let pattern = format!("{}/*.png", images_dir.display());
    let mut records = Vec::new();
    for image_path in glob(&pattern)?.filter_map(Result::ok) {
        let Some(file_name) = image_path.file_name().map(|name| name.to_os_string()) else {
            continue;
        };
        let mut mask_paths = BTreeMap::new();
        for class in classes {
            let mask_path = masks_dir.join(class).join(&file_name);
            if mask_path.exists() {
                mask_paths.insert(class.clone(), mask_path);
            }
        }
        if mask_paths.is_empty() {
            continue;
        }
        records.push(DatasetRecord {
            image_path,
            mask_paths,
        });
    }

    Ok(records)
}

/// Shuffle the records under the seed and cut them into train/val/test.
///
/// Subset sizes are floors of the ratios; the test slice takes the
/// remainder, so the three subsets always add back up to the input.
pub fn split_records(
    mut records: Vec<DatasetRecord>,
    train_size: f32,
    val_size: f32,
    seed: u64,
) -> SplitData {
    let mut rng = StdRng::seed_from_u64(seed);
    records.shuffle(&mut rng);

    let n = records.len();
    let n_train = ((n as f32 * train_size).floor() as usize).min(n);
    let n_val = ((n as f32 * val_size).floor() as usize).min(n - n_train);

    let test_records = records.split_off(n_train + n_val);
    let val_records = records.split_off(n_train);
    let train_records = records;

    SplitData {
        train_records,
        val_records,
        test_records,
    }
}

/// Copy every record of every split into its output tree. Each split gets
/// an images directory and one masks directory per discovered class, even
/// when the split ends up with zero masks for that class.
pub fn materialize_splits(
    split_data: &SplitData,
    output_root: &Path,
    classes: &[String],
) -> io::Result<()> {
    let splits = [
        ("train", &split_data.train_records),
        ("val", &split_data.val_records),
        ("test", &split_data.test_records),
    ];

    for (split_name, records) in splits {
        let dirs = setup_split_directories(output_root, split_name, classes)?;
        let pb = create_progress_bar(records.len() as u64, split_name);
        for record in records {
            copy_record(record, &dirs)?;
            pb.inc(1);
        }
        pb.finish();
        info!("{}: {} records", split_name, records.len());
    }
    Ok(())
}

/// Full partitioning pipeline for one rasterized dataset directory.
pub fn partition_dataset(
    dataset_root: &Path,
    output_root: &Path,
    args: &SplitArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let classes = discover_classes(&dataset_root.join("masks"))?;
    info!("found {} classes", classes.len());

    let records = collect_records(dataset_root, &classes)?;
    info!("{} photos with at least one mask", records.len());

    let split_data = split_records(records, args.train_size, args.val_size, args.seed);
    materialize_splits(&split_data, output_root, &classes)?;

    info!("Split complete.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(name: &str) -> DatasetRecord {
        DatasetRecord {
            image_path: PathBuf::from(format!("images/{name}.png")),
            mask_paths: BTreeMap::from([(
                "a".to_string(),
                PathBuf::from(format!("masks/a/{name}.png")),
            )]),
        }
    }

    #[test]
    fn test_split_sizes_floor_with_test_taking_the_remainder() {
        let records: Vec<_> = (0..7).map(|i| record(&format!("img{i}"))).collect();
        let split = split_records(records, 0.75, 0.10, 28);

        // floor(0.75 * 7) = 5, floor(0.10 * 7) = 0, test absorbs the rest
        assert_eq!(split.train_records.len(), 5);
        assert_eq!(split.val_records.len(), 0);
        assert_eq!(split.test_records.len(), 2);
    }

    #[test]
    fn test_split_covers_every_record_exactly_once() {
        let records: Vec<_> = (0..23).map(|i| record(&format!("img{i}"))).collect();
        let split = split_records(records.clone(), 0.75, 0.10, 28);

        let mut recombined: Vec<_> = split
            .train_records
            .iter()
            .chain(split.val_records.iter())
            .chain(split.test_records.iter())
            .cloned()
            .collect();
        assert_eq!(recombined.len(), records.len());

        recombined.sort_by(|a, b| a.image_path.cmp(&b.image_path));
        let mut expected = records;
        expected.sort_by(|a, b| a.image_path.cmp(&b.image_path));
        assert_eq!(recombined, expected);
    }

    #[test]
    fn test_split_is_deterministic_for_a_fixed_seed() {
        let records: Vec<_> = (0..11).map(|i| record(&format!("img{i}"))).collect();

        let first = split_records(records.clone(), 0.75, 0.10, 28);
        let second = split_records(records.clone(), 0.75, 0.10, 28);
        assert_eq!(first.train_records, second.train_records);
        assert_eq!(first.val_records, second.val_records);
        assert_eq!(first.test_records, second.test_records);

        // a different seed permutes differently on a list this size
        let other = split_records(records, 0.75, 0.10, 29);
        assert_ne!(first.train_records, other.train_records);
    }

    #[test]
    fn test_empty_input_produces_empty_subsets() {
        let split = split_records(Vec::new(), 0.75, 0.10, 28);
        assert!(split.train_records.is_empty());
        assert!(split.val_records.is_empty());
        assert!(split.test_records.is_empty());
    }

    #[test]
    fn test_oversized_ratios_never_overrun_the_list() {
        let records: Vec<_> = (0..4).map(|i| record(&format!("img{i}"))).collect();
        let split = split_records(records, 1.0, 1.0, 28);
        assert_eq!(split.train_records.len(), 4);
        assert_eq!(split.val_records.len(), 0);
        assert_eq!(split.test_records.len(), 0);
    }
}
