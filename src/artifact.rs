//! Output artifact paths and writes.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// HTML and PDF paths derived from an output name such as `output/cv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub html: PathBuf,
    pub pdf: PathBuf,
}

impl ArtifactPaths {
    /// Appends `.html` / `.pdf` to the name as given, keeping any dots in it.
    pub fn from_output_name(output_name: impl AsRef<Path>) -> Self {
        let name = output_name.as_ref();
        Self {
            html: with_suffix(name, ".html"),
            pdf: with_suffix(name, ".pdf"),
        }
    }
}

fn with_suffix(name: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = name.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Creates the parent directory of `path`, including intermediates.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            if !parent.exists() {
                debug!("Creating output directory {}", parent.display());
            }
            fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}

/// Writes UTF-8 text, replacing any existing file.
pub fn write_text(path: &Path, content: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, content)
}

/// Writes bytes through a temporary file in the target directory, then
/// renames it over `path`. The target is never left half-written.
pub fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
