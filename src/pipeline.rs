//! The CV build pipeline: JSON → context → HTML → PDF.

use crate::artifact::{self, ArtifactPaths};
use crate::assets::IconResolver;
use crate::context::RenderContext;
use crate::converter::{HtmlToPdfConverter, RenderEngine};
use crate::error::{AssetWarning, BuildError};
use crate::job::BuildJob;
use crate::renderer::DocumentRenderer;
use anyhow::anyhow;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Reads and parses the CV document. It must be a JSON object.
pub fn load_cv_data(path: &Path) -> Result<Value, BuildError> {
    let raw = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => BuildError::InputNotFound(path.to_path_buf()),
        _ => BuildError::InputRead {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let document: Value = serde_json::from_str(&raw).map_err(|source| BuildError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })?;

    if !document.is_object() {
        return Err(BuildError::NotAnObject(path.to_path_buf()));
    }
    Ok(document)
}

/// Owns the pipeline stages for one process.
///
/// Relative input and output paths of a job are resolved against the same
/// root as icons and the template.
pub struct CvBuilder<E> {
    root: PathBuf,
    icons: IconResolver,
    renderer: DocumentRenderer,
    converter: Arc<HtmlToPdfConverter<E>>,
}

impl<E: RenderEngine + 'static> CvBuilder<E> {
    /// Seeds the template icon directory and loads the CV template.
    ///
    /// `root` is the directory icon references and `template_dir` are
    /// resolved against (the working directory in production).
    pub fn new(root: impl Into<PathBuf>, template_dir: &Path, engine: E) -> Result<Self, BuildError> {
        let root = root.into();
        let icons = IconResolver::new(root.clone(), template_dir);
        icons.seed_template_icons()?;

        let renderer = DocumentRenderer::new(&root.join(template_dir))?;

        Ok(Self {
            root,
            icons,
            renderer,
            converter: Arc::new(HtmlToPdfConverter::new(engine)),
        })
    }

    /// Inlines icons and builds the render context.
    pub fn prepare_context(&self, mut document: Value) -> (RenderContext, Vec<AssetWarning>) {
        let (cv_icon, cv_warning) = self.icons.resolve_cv_icon();
        let mut warnings: Vec<AssetWarning> = cv_warning.into_iter().collect();
        warnings.extend(self.icons.embed_contact_icons(&mut document));

        (RenderContext::from_document(&document, cv_icon), warnings)
    }

    pub fn generate_html(&self, context: &RenderContext) -> Result<String, BuildError> {
        self.renderer.render(context)
    }

    /// Runs the whole pipeline for `job`, updating its status as it goes.
    ///
    /// On failure the job is marked failed and the error returned. The HTML
    /// artifact is kept when only the export fails.
    pub async fn build(&self, job: &mut BuildJob) -> Result<ArtifactPaths, BuildError> {
        match self.run(job).await {
            Ok(paths) => Ok(paths),
            Err(e) => {
                job.mark_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Resolves `path` against the builder root. Absolute paths are kept.
    fn rooted(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || self.root == Path::new(".") {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    async fn run(&self, job: &mut BuildJob) -> Result<ArtifactPaths, BuildError> {
        // Load and validate the document
        let input_path = self.rooted(&job.input_path);
        info!("Loading CV data from {}...", input_path.display());
        let document = load_cv_data(&input_path)?;

        // Inline icons and build the context
        job.start_rendering();
        let (context, warnings) = self.prepare_context(document);
        job.asset_warnings = warnings.len();

        info!("Generating HTML...");
        let html = self.generate_html(&context)?;

        // Write HTML next to the future PDF
        let paths = ArtifactPaths::from_output_name(self.rooted(Path::new(&job.output_name)));
        artifact::write_text(&paths.html, &html).map_err(|source| BuildError::Artifact {
            path: paths.html.clone(),
            source,
        })?;
        info!("HTML written: {}", paths.html.display());
        job.start_exporting(html.len());

        // Export off the async runtime
        info!("Converting to PDF...");
        let converter = Arc::clone(&self.converter);
        let (html_path, pdf_path) = (paths.html.clone(), paths.pdf.clone());
        let pdf_bytes = tokio::task::spawn_blocking(move || converter.convert(&html_path, &pdf_path))
            .await
            .map_err(|e| BuildError::Export(anyhow!("Export task failed: {}", e)))?
            .map_err(BuildError::Export)?;

        job.mark_complete(pdf_bytes);
        info!("PDF generated successfully: {}", paths.pdf.display());
        Ok(paths)
    }
}
