//! Command-line surface.

use clap::Parser;
use std::path::PathBuf;

/// Generate professional PDF resumes from JSON data.
#[derive(Debug, Parser)]
#[command(
    name = "json-cv",
    version,
    about,
    after_help = "Examples:\n  json-cv --input cv.json --output-name output/my_resume\n  json-cv -i my_cv.json\n  json-cv -o custom/cv"
)]
pub struct Cli {
    /// Input JSON file
    #[arg(short, long, default_value = "cv.json")]
    pub input: PathBuf,

    /// Output path prefix; `.html` and `.pdf` are appended
    #[arg(short, long = "output-name", default_value = "output/cv")]
    pub output_name: String,
}
