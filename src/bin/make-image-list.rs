use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use image_tagger::listing::{self, LISTING_FILENAME};

/// Write a tab-separated image listing for the image tagger
#[derive(Parser, Debug)]
#[command(name = "make-image-list", version)]
struct Cli {
    /// Directory to scan for png, jpg, jpeg, bmp and gif files
    #[arg(default_value = "imgs")]
    dir: PathBuf,

    /// Listing file to write (overwritten)
    #[arg(short, long, default_value = LISTING_FILENAME)]
    output: PathBuf,
}

fn main() -> ExitCode {
    image_tagger::logging::init();
    let cli = Cli::parse();

    match listing::generate(&cli.dir, &cli.output) {
        Ok(count) => {
            println!("Wrote an image list to: {} ({} images)", cli.output.display(), count);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
