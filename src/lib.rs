//! json-cv: PDF resumes from JSON data.
//!
//! A CV document (JSON) is merged into an HTML template, written to disk, and
//! printed to PDF by a headless Chrome process.
//!
//! ## Module Overview
//!
//! - `assets`: SVG icon lookup and inlining
//! - `context`: JSON document to template variables
//! - `renderer`: Handlebars rendering with the `b64encode` helper
//! - `artifact`: output paths and file writes
//! - `converter`: HTML to PDF through a rendering engine
//! - `pipeline`: the full build
//! - `job`: build status and timing
//! - `config` / `cli`: startup configuration
//! - `telemetry`: logging and OpenTelemetry spans
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use json_cv::{
//!     converter::ChromeEngine,
//!     job::BuildJob,
//!     pipeline::CvBuilder,
//! };
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = ChromeEngine::new("/usr/bin/chromium", true);
//!     let builder = CvBuilder::new(".", Path::new("templates"), engine).unwrap();
//!
//!     let mut job = BuildJob::new("cv.json", "output/cv");
//!     let paths = builder.build(&mut job).await.unwrap();
//!     println!("{}", paths.pdf.display());
//! }
//! ```

pub mod artifact;
pub mod assets;
pub mod cli;
pub mod config;
pub mod context;
pub mod converter;
pub mod error;
pub mod job;
pub mod pipeline;
pub mod renderer;
pub mod telemetry;
