//! HTML rendering of a [`RenderContext`] through Handlebars.

use crate::context::RenderContext;
use crate::error::BuildError;
use base64::Engine;
use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext as HandlebarsRenderContext,
};
use std::path::Path;
use tracing::debug;

/// Template file looked up in the template directory.
pub const CV_TEMPLATE: &str = "cv_template.html";

/// `{{b64encode value}}`: base64 of a string, empty for anything else.
fn b64encode_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut HandlebarsRenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    if let Some(text) = h.param(0).and_then(|v| v.value().as_str()) {
        out.write(&b64encode(text))?;
    }
    Ok(())
}

pub fn b64encode(text: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(text.as_bytes())
}

/// Renders the CV template. The template is parsed once, at construction.
pub struct DocumentRenderer {
    engine: Handlebars<'static>,
    template: String,
}

impl DocumentRenderer {
    /// Loads `cv_template.html` from `template_dir`.
    pub fn new(template_dir: &Path) -> Result<Self, BuildError> {
        let path = template_dir.join(CV_TEMPLATE);
        if !path.is_file() {
            return Err(BuildError::TemplateMissing(path));
        }

        let mut engine = Self::engine();
        engine
            .register_template_file(CV_TEMPLATE, &path)
            .map_err(|source| BuildError::Template {
                name: path.display().to_string(),
                source: Box::new(source),
            })?;

        debug!("Loaded template {}", path.display());
        Ok(Self {
            engine,
            template: CV_TEMPLATE.to_string(),
        })
    }

    /// Builds a renderer from an in-memory template.
    pub fn from_source(name: &str, source: &str) -> Result<Self, BuildError> {
        let mut engine = Self::engine();
        engine
            .register_template_string(name, source)
            .map_err(|source| BuildError::Template {
                name: name.to_string(),
                source: Box::new(source),
            })?;

        Ok(Self {
            engine,
            template: name.to_string(),
        })
    }

    fn engine() -> Handlebars<'static> {
        let mut engine = Handlebars::new();
        // Absent optional data renders as empty.
        engine.set_strict_mode(false);
        engine.register_helper("b64encode", Box::new(b64encode_helper));
        engine
    }

    pub fn render(&self, context: &RenderContext) -> Result<String, BuildError> {
        Ok(self.engine.render(&self.template, context)?)
    }
}
