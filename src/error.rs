//! Error taxonomy for the CV build pipeline.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a fatal build error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing engine configuration, missing template, broken template.
    Configuration,
    /// Input file missing, unreadable or not a JSON object.
    Input,
    /// HTML/PDF output or rendering-engine failure.
    Export,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Input => write!(f, "input"),
            ErrorKind::Export => write!(f, "export"),
        }
    }
}

/// Fatal errors that stop a build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template '{}' not found", .0.display())]
    TemplateMissing(PathBuf),

    #[error("Invalid template '{name}': {source}")]
    Template {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("Failed to render template: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Failed to prepare icon directory '{}': {source}", path.display())]
    IconSeed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to read '{}': {source}", path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in '{}': {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid CV document in '{}': top-level value must be a JSON object", .0.display())]
    NotAnObject(PathBuf),

    #[error("Failed to write '{}': {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("PDF export failed: {0:#}")]
    Export(anyhow::Error),
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::Config(_)
            | BuildError::TemplateMissing(_)
            | BuildError::Template { .. }
            | BuildError::Render(_)
            | BuildError::IconSeed { .. } => ErrorKind::Configuration,
            BuildError::InputNotFound(_)
            | BuildError::InputRead { .. }
            | BuildError::InvalidJson { .. }
            | BuildError::NotAnObject(_) => ErrorKind::Input,
            BuildError::Artifact { .. } | BuildError::Export(_) => ErrorKind::Export,
        }
    }
}

/// Non-fatal problems while inlining icons. Logged and counted, never raised.
#[derive(Debug, Error)]
pub enum AssetWarning {
    #[error("SVG file not found for icon: {0}")]
    NotFound(String),

    #[error("Could not read SVG file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            BuildError::Config("x".to_string()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            BuildError::InputNotFound(PathBuf::from("cv.json")).kind(),
            ErrorKind::Input
        );
        assert_eq!(
            BuildError::Export(anyhow::anyhow!("engine crashed")).kind(),
            ErrorKind::Export
        );
    }

    #[test]
    fn test_input_messages_name_the_path() {
        let err = BuildError::InputNotFound(PathBuf::from("missing.json"));
        assert_eq!(err.to_string(), "File 'missing.json' not found");

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = BuildError::InvalidJson {
            path: PathBuf::from("broken.json"),
            source,
        };
        assert!(err.to_string().starts_with("Invalid JSON in 'broken.json'"));
    }
}
