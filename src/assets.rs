//! SVG icon lookup and inlining.

use crate::error::{AssetWarning, BuildError};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Prefixes that mark an icon reference as a file path rather than inline SVG.
pub const ICON_PATH_PREFIXES: [&str; 2] = ["static/icons/", "templates/static/icons/"];

/// Default project-root icon directory.
pub const DEFAULT_ICONS_DIR: &str = "static/icons";

/// File name of the header icon inside the templates-local icon directory.
pub const CV_ICON_FILE: &str = "cv.svg";

/// Resolves icon references to inline SVG text.
///
/// Paths are looked up relative to `root`, trying in order:
/// 1. the reference as given,
/// 2. `icons_dir/<basename>`,
/// 3. `template_icons_dir/<basename>`.
#[derive(Debug, Clone)]
pub struct IconResolver {
    root: PathBuf,
    icons_dir: PathBuf,
    template_icons_dir: PathBuf,
}

impl IconResolver {
    /// Creates a resolver for the given working root and template directory.
    pub fn new(root: impl Into<PathBuf>, template_dir: &Path) -> Self {
        Self {
            root: root.into(),
            icons_dir: PathBuf::from(DEFAULT_ICONS_DIR),
            template_icons_dir: template_dir.join("static").join("icons"),
        }
    }

    pub fn template_icons_dir(&self) -> PathBuf {
        self.root.join(&self.template_icons_dir)
    }

    /// Whether `reference` names a file under one of the icon prefixes.
    pub fn is_path_like(reference: &str) -> bool {
        ICON_PATH_PREFIXES.iter().any(|p| reference.starts_with(p))
    }

    /// Ordered lookup candidates for a path-like reference.
    pub fn candidates(&self, reference: &str) -> Vec<PathBuf> {
        let mut candidates = vec![self.root.join(reference)];
        if let Some(name) = Path::new(reference).file_name() {
            candidates.push(self.root.join(&self.icons_dir).join(name));
            candidates.push(self.root.join(&self.template_icons_dir).join(name));
        }
        candidates
    }

    /// Returns the first existing candidate, if any.
    pub fn locate(&self, reference: &str) -> Option<PathBuf> {
        self.candidates(reference).into_iter().find(|p| p.exists())
    }

    /// Resolves a path-like reference to trimmed file contents.
    ///
    /// # Arguments
    ///
    /// * `reference` - Icon path such as `static/icons/email.svg`
    ///
    /// # Returns
    ///
    /// The SVG markup with surrounding whitespace removed, or an
    /// `AssetWarning` if no candidate exists or the file is not valid UTF-8.
    pub fn read_icon(&self, reference: &str) -> Result<String, AssetWarning> {
        // Find the first existing candidate
        let path = self
            .locate(reference)
            .ok_or_else(|| AssetWarning::NotFound(reference.to_string()))?;

        // Read as text
        let content = fs::read_to_string(&path)
            .map_err(|source| AssetWarning::Unreadable { path: path.clone(), source })?;

        info!("Embedded SVG icon: {}", display_name(&path));
        Ok(content.trim().to_string())
    }

    /// Resolves a contact icon reference.
    ///
    /// Inline content passes through. Unresolvable paths are returned
    /// unchanged along with the warning.
    pub fn resolve(&self, reference: &str) -> (String, Option<AssetWarning>) {
        if !Self::is_path_like(reference) {
            return (reference.to_string(), None);
        }
        match self.read_icon(reference) {
            Ok(svg) => (svg, None),
            Err(warning) => {
                warn!("{}", warning);
                (reference.to_string(), Some(warning))
            }
        }
    }

    /// Reads the header icon from the templates-local icon directory.
    ///
    /// Returns an empty string when the file is missing or unreadable.
    pub fn resolve_cv_icon(&self) -> (String, Option<AssetWarning>) {
        let path = self.template_icons_dir().join(CV_ICON_FILE);
        if !path.exists() {
            let warning = AssetWarning::NotFound(path.display().to_string());
            warn!("CV icon file not found: {}", path.display());
            return (String::new(), Some(warning));
        }

        match fs::read_to_string(&path) {
            Ok(content) => {
                info!("Embedded CV icon: {}", display_name(&path));
                (content.trim().to_string(), None)
            }
            Err(source) => {
                let warning = AssetWarning::Unreadable { path, source };
                warn!("{}", warning);
                (String::new(), Some(warning))
            }
        }
    }

    /// Replaces path-like `icon` fields of every contact with inline SVG.
    ///
    /// Contacts without a non-empty string `icon` are left untouched.
    pub fn embed_contact_icons(&self, document: &mut Value) -> Vec<AssetWarning> {
        let mut warnings = Vec::new();
        let Some(contacts) = document.get_mut("contacts").and_then(Value::as_array_mut) else {
            return warnings;
        };

        for contact in contacts.iter_mut() {
            let Some(icon) = contact.get_mut("icon") else {
                continue;
            };
            let Some(reference) = icon.as_str().filter(|s| !s.is_empty()) else {
                continue;
            };

            let (resolved, warning) = self.resolve(reference);
            *icon = Value::String(resolved);
            warnings.extend(warning);
        }

        warnings
    }

    /// Copies every file in the project-root icon directory into the
    /// templates-local one, creating the latter if needed.
    ///
    /// Returns the number of files copied.
    pub fn seed_template_icons(&self) -> Result<usize, BuildError> {
        let target = self.template_icons_dir();
        fs::create_dir_all(&target).map_err(|source| BuildError::IconSeed {
            path: target.clone(),
            source,
        })?;

        let source_dir = self.root.join(&self.icons_dir);
        if !source_dir.is_dir() {
            debug!("No project icon directory at {}", source_dir.display());
            return Ok(0);
        }

        let copied = copy_files(&source_dir, &target).map_err(|source| BuildError::IconSeed {
            path: target.clone(),
            source,
        })?;

        debug!("Seeded {} icons into {}", copied, target.display());
        Ok(copied)
    }
}

fn copy_files(from: &Path, to: &Path) -> io::Result<usize> {
    let mut copied = 0;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::copy(entry.path(), to.join(entry.file_name()))?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
