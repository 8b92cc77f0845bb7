use clap::Parser;
use std::str::FromStr;

use crate::types::{ALL_LABELS, DEFAULT_SEED};

/// Command-line arguments for rasterizing a CVAT export into photos and masks.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct PreprocessArgs {
    /// Path to the export: a directory of task_* folders or a .zip archive
    pub input: String,

    /// Directory that receives the images/ and masks/ trees
    pub output: String,

    /// Warn and continue when a manifest references a missing image
    /// instead of aborting the run
    #[arg(long = "keep-going")]
    pub keep_going: bool,

    /// Class labels to rasterize; defaults to the built-in wound class list
    #[arg(long = "labels", use_value_delimiter = true)]
    pub labels: Vec<String>,
}

impl PreprocessArgs {
    /// The class set masks are produced for.
    pub fn known_labels(&self) -> Vec<String> {
        if self.labels.is_empty() {
            ALL_LABELS.iter().map(|label| label.to_string()).collect()
        } else {
            self.labels.clone()
        }
    }
}

/// Command-line arguments for splitting a rasterized dataset into
/// train/val/test subsets.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct SplitArgs {
    /// Directory holding the images/ and masks/ trees produced by preprocess
    pub input: String,

    /// Directory that receives the train/val/test trees
    pub output: String,

    /// Proportion of the dataset to use for training
    #[arg(long = "train_size", default_value_t = 0.75, value_parser = validate_size)]
    pub train_size: f32,

    /// Proportion of the dataset to use for validation; the test subset
    /// takes whatever remains after train and val
    #[arg(long = "val_size", default_value_t = 0.10, value_parser = validate_size)]
    pub val_size: f32,

    /// Seed for random shuffling
    #[arg(long = "seed", default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

// Validate that the size is between 0.0 and 1.0
pub fn validate_size(s: &str) -> Result<f32, String> {
    match f32::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("SIZE must be between 0.0 and 1.0".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_size() {
        assert!(validate_size("0.5").is_ok());
        assert!(validate_size("1.0").is_ok());
        assert!(validate_size("0.0").is_ok());
        assert!(validate_size("-0.1").is_err());
        assert!(validate_size("1.1").is_err());
        assert!(validate_size("abc").is_err());
    }

    #[test]
    fn test_known_labels_defaults_to_builtin_list() {
        let args = PreprocessArgs {
            input: "export".to_string(),
            output: "out".to_string(),
            keep_going: false,
            labels: Vec::new(),
        };
        assert_eq!(args.known_labels().len(), 13);

        let args = PreprocessArgs {
            labels: vec!["wound".to_string()],
            ..args
        };
        assert_eq!(args.known_labels(), vec!["wound".to_string()]);
    }
}
