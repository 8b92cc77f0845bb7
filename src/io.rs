use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::types::DatasetRecord;

/// Extract a zipped export into `dest`, creating it if needed. The archive
/// is expected to hold the same task_* tree a directory export would.
pub fn extract_export_archive(
    archive_path: &Path,
    dest: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    fs::create_dir_all(dest)?;
    archive.extract(dest)?;
    Ok(())
}

// Struct to hold the output tree of one split
pub struct SplitDirs {
    pub images_dir: PathBuf,
    pub masks_dir: PathBuf,
}

/// Create `{output_root}/{split_name}/images` and a masks subdirectory for
/// every discovered class, even those the split gets no masks for.
pub fn setup_split_directories(
    output_root: &Path,
    split_name: &str,
    classes: &[String],
) -> io::Result<SplitDirs> {
    let split_root = output_root.join(split_name);
    let images_dir = split_root.join("images");
    let masks_dir = split_root.join("masks");
    fs::create_dir_all(&images_dir)?;
    for class in classes {
        fs::create_dir_all(masks_dir.join(class))?;
    }
    Ok(SplitDirs {
        images_dir,
        masks_dir,
    })
}

/// Copy one record's photo and every present mask into a split tree,
/// preserving filenames.
pub fn copy_record(record: &DatasetRecord, dirs: &SplitDirs) -> io::Result<()> {
    let file_name = record.image_path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("record without a file name: {}", record.image_path.display()),
        )
    })?;
    fs::copy(&record.image_path, dirs.images_dir.join(file_name))?;

    for (class, mask_path) in &record.mask_paths {
        fs::copy(mask_path, dirs.masks_dir.join(class).join(file_name))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;

    #[test]
    fn test_split_directories_include_every_class() {
        let dir = tempfile::tempdir().unwrap();
        let classes = vec!["a".to_string(), "b".to_string()];

        let dirs = setup_split_directories(dir.path(), "val", &classes).unwrap();
        assert!(dirs.images_dir.ends_with("val/images"));
        assert!(dir.path().join("val/masks/a").is_dir());
        assert!(dir.path().join("val/masks/b").is_dir());

        // idempotent on rerun
        setup_split_directories(dir.path(), "val", &classes).unwrap();
    }

    #[test]
    fn test_copy_record_preserves_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        fs::create_dir_all(source.join("masks/a")).unwrap();
        fs::create_dir_all(source.join("images")).unwrap();

        let image_path = source.join("images/task_01_photo.png");
        File::create(&image_path)
            .unwrap()
            .write_all(b"img")
            .unwrap();
        let mask_path = source.join("masks/a/task_01_photo.png");
        File::create(&mask_path)
            .unwrap()
            .write_all(b"mask")
            .unwrap();

        let record = DatasetRecord {
            image_path,
            mask_paths: BTreeMap::from([("a".to_string(), mask_path)]),
        };
        let classes = vec!["a".to_string()];
        let dirs = setup_split_directories(dir.path(), "train", &classes).unwrap();

        copy_record(&record, &dirs).unwrap();
        assert!(dir.path().join("train/images/task_01_photo.png").exists());
        assert!(dir.path().join("train/masks/a/task_01_photo.png").exists());
    }
}
