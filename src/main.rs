//! json-cv command-line tool.
//!
//! Reads a CV document, renders `templates/cv_template.html`, and prints the
//! result to PDF with headless Chrome.
//!
//! ## Configuration
//!
//! Environment variables (a `.env` file is loaded if present):
//! - `CHROME_EXECUTABLE_PATH`: Chrome/Chromium executable (required)
//! - `CV_TEMPLATE_DIR`: template directory (default: templates)
//! - `CHROME_SANDBOX`: set to `false` to launch with `--no-sandbox`
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP collector endpoint (optional)
//! - `RUST_LOG`: log level (default: info)
//! - `LOG_FORMAT`: `text` or `json`

use anyhow::Result;
use clap::Parser;
use json_cv::cli::Cli;
use json_cv::config::Config;
use json_cv::converter::ChromeEngine;
use json_cv::job::BuildJob;
use json_cv::pipeline::CvBuilder;
use json_cv::telemetry;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Fails before any input is touched.
    let config = Config::from_env()?;

    telemetry::init_logging(config.log_format);
    if let Err(e) = telemetry::init_telemetry() {
        warn!("Failed to initialize telemetry: {}", e);
    }

    info!("Starting json-cv v{}", env!("CARGO_PKG_VERSION"));

    let result = run(&cli, &config).await;
    telemetry::shutdown_telemetry();
    result
}

async fn run(cli: &Cli, config: &Config) -> Result<()> {
    let engine = ChromeEngine::new(&config.chrome_executable_path, config.chrome_sandbox);
    let builder = CvBuilder::new(".", &config.template_dir, engine)?;

    let mut job = BuildJob::new(&cli.input, cli.output_name.as_str());
    info!(
        "Build {}: input={}, output={}",
        job.build_id,
        job.input_path.display(),
        job.output_name
    );

    let result = builder.build(&mut job).await;
    telemetry::record_build_telemetry(&job);

    match result {
        Ok(paths) => {
            info!(
                "CV generation completed! html={}, pdf={}",
                paths.html.display(),
                paths.pdf.display()
            );
            Ok(())
        }
        Err(e) => {
            error!(kind = %e.kind(), "{}", e);
            Err(e.into())
        }
    }
}
