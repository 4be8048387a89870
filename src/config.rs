//! Process-wide configuration, read once at startup.

use crate::error::BuildError;
use std::path::PathBuf;

/// Environment variable naming the Chrome/Chromium executable.
pub const CHROME_EXECUTABLE_PATH: &str = "CHROME_EXECUTABLE_PATH";

const DEFAULT_TEMPLATE_DIR: &str = "templates";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Build configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub chrome_executable_path: PathBuf,
    pub chrome_sandbox: bool,
    pub template_dir: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, BuildError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Fails if `CHROME_EXECUTABLE_PATH` is unset, empty, or does not name an
    /// existing file.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BuildError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chrome_executable_path = lookup(CHROME_EXECUTABLE_PATH)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                BuildError::Config(format!(
                    "{CHROME_EXECUTABLE_PATH} is not set. Please set it in the environment variables."
                ))
            })?;

        if !chrome_executable_path.is_file() {
            return Err(BuildError::Config(format!(
                "{CHROME_EXECUTABLE_PATH} points to '{}', which does not exist",
                chrome_executable_path.display()
            )));
        }

        let chrome_sandbox = match lookup("CHROME_SANDBOX").as_deref().map(str::trim) {
            None | Some("") => true,
            Some(v) => !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"),
        };

        let template_dir = lookup("CV_TEMPLATE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_DIR));

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Config {
            chrome_executable_path,
            chrome_sandbox,
            template_dir,
            log_format,
        })
    }
}
