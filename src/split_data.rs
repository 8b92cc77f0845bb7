use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use cvat2seg::{partition_dataset, SplitArgs};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = SplitArgs::parse();

    if args.train_size + args.val_size > 1.0 {
        error!("train_size + val_size must not exceed 1.0");
        return;
    }

    let input = PathBuf::from(&args.input);
    if !input.exists() {
        error!("The specified input does not exist: {}", args.input);
        return;
    }

    info!("Splitting dataset...");
    if let Err(e) = partition_dataset(&input, &PathBuf::from(&args.output), &args) {
        error!("Failed to split dataset: {}", e);
    }
}
