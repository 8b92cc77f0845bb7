use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use cvat2seg::{extract_export_archive, process_export, PreprocessArgs};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = PreprocessArgs::parse();

    let input = PathBuf::from(&args.input);
    if !input.exists() {
        error!("The specified input does not exist: {}", args.input);
        return;
    }
    let output = PathBuf::from(&args.output);

    // a zipped export is unpacked under the output root before processing
    let export_root = if input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
    {
        let extracted = output.join("tasks");
        info!(
            "Extracting {} into {}...",
            input.display(),
            extracted.display()
        );
        match extract_export_archive(&input, &extracted) {
            Ok(()) => extracted,
            Err(e) => {
                error!("Failed to extract archive: {}", e);
                return;
            }
        }
    } else {
        input
    };

    info!("Starting rasterization...");
    match process_export(&export_root, &output, &args) {
        Ok(stats) => stats.print_summary(),
        Err(e) => error!("Failed to process export: {}", e),
    }
}
