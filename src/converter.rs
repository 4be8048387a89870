//! HTML to PDF conversion through an external rendering engine.

use crate::artifact;
use anyhow::{anyhow, bail, Context, Result};
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Paper size in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_in: f64,
    pub height_in: f64,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width_in: 8.27,
        height_in: 11.69,
    };
}

/// A running rendering-engine process with one page context.
#[cfg_attr(test, mockall::automock)]
pub trait EngineSession {
    /// Navigates to `url`, waits for the load to finish, and prints the page.
    fn print_to_pdf(&mut self, url: &Url, page: PageSize) -> Result<Vec<u8>>;

    /// Terminates the engine process.
    fn close(&mut self) -> Result<()>;
}

/// Starts rendering-engine sessions.
#[cfg_attr(test, mockall::automock)]
pub trait RenderEngine: Send + Sync {
    fn launch(&self) -> Result<Box<dyn EngineSession>>;
}

/// Closes the wrapped session when dropped, unless already closed.
struct SessionGuard {
    session: Box<dyn EngineSession>,
    closed: bool,
}

impl SessionGuard {
    fn new(session: Box<dyn EngineSession>) -> Self {
        Self {
            session,
            closed: false,
        }
    }

    fn session(&mut self) -> &mut dyn EngineSession {
        self.session.as_mut()
    }

    fn close(mut self) -> Result<()> {
        self.closed = true;
        self.session.close()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.session.close() {
                warn!("Failed to terminate rendering engine: {:#}", e);
            }
        }
    }
}

/// Headless Chrome/Chromium launched from an explicit executable path.
#[derive(Debug, Clone)]
pub struct ChromeEngine {
    executable: PathBuf,
    sandbox: bool,
    idle_timeout: Duration,
}

impl ChromeEngine {
    pub fn new(executable: impl Into<PathBuf>, sandbox: bool) -> Self {
        Self {
            executable: executable.into(),
            sandbox,
            idle_timeout: Duration::from_secs(60),
        }
    }
}

impl RenderEngine for ChromeEngine {
    fn launch(&self) -> Result<Box<dyn EngineSession>> {
        let options = LaunchOptions::default_builder()
            .path(Some(self.executable.clone()))
            .headless(true)
            .sandbox(self.sandbox)
            .idle_browser_timeout(self.idle_timeout)
            .build()
            .map_err(|e| anyhow!("Invalid browser launch options: {}", e))?;

        let browser = Browser::new(options).with_context(|| {
            format!("Failed to launch browser at {}", self.executable.display())
        })?;
        debug!("Launched browser: {}", self.executable.display());

        Ok(Box::new(ChromeSession {
            browser: Some(browser),
        }))
    }
}

struct ChromeSession {
    browser: Option<Browser>,
}

impl EngineSession for ChromeSession {
    fn print_to_pdf(&mut self, url: &Url, page: PageSize) -> Result<Vec<u8>> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| anyhow!("Browser session already closed"))?;

        let tab = browser.new_tab().context("Failed to open page")?;
        tab.navigate_to(url.as_str())
            .with_context(|| format!("Failed to navigate to {}", url))?;
        tab.wait_until_navigated()
            .with_context(|| format!("Page did not finish loading: {}", url))?;

        let options = PrintToPdfOptions {
            paper_width: Some(page.width_in),
            paper_height: Some(page.height_in),
            ..Default::default()
        };
        tab.print_to_pdf(Some(options)).context("Failed to print page to PDF")
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the browser kills the child process.
        if self.browser.take().is_some() {
            debug!("Browser process terminated");
        }
        Ok(())
    }
}

/// Converts an HTML file on disk to a PDF file.
pub struct HtmlToPdfConverter<E> {
    engine: E,
    page: PageSize,
}

impl<E: RenderEngine> HtmlToPdfConverter<E> {
    /// Creates a converter printing A4 pages.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            page: PageSize::A4,
        }
    }

    /// Renders `html_path` and writes the PDF to `output_path`.
    ///
    /// The engine is launched for this call only and is terminated before
    /// returning, whether or not the conversion succeeded.
    ///
    /// # Arguments
    ///
    /// * `html_path` - Rendered HTML document on disk
    /// * `output_path` - Filesystem path for PDF output
    ///
    /// # Returns
    ///
    /// Returns the PDF size in bytes.
    ///
    /// # Errors
    ///
    /// - HTML file missing or not representable as a `file://` URL
    /// - Engine launch, navigation or print failures
    /// - Empty PDF output
    /// - File I/O errors writing the PDF
    pub fn convert(&self, html_path: &Path, output_path: &Path) -> Result<usize> {
        // Build an absolute file URL for the engine
        let absolute = fs::canonicalize(html_path)
            .with_context(|| format!("HTML file not found: {}", html_path.display()))?;
        let url = Url::from_file_path(&absolute)
            .map_err(|_| anyhow!("Failed to convert {} to a file URL", absolute.display()))?;

        info!("Converting HTML to PDF: {} -> {}", url, output_path.display());

        // Start a fresh engine for this document
        let session = self
            .engine
            .launch()
            .context("Failed to start rendering engine")?;
        let mut guard = SessionGuard::new(session);

        // Print and write, then tear down regardless of the outcome
        let result = self.print(guard.session(), &url, output_path);
        if let Err(e) = guard.close() {
            warn!("Failed to terminate rendering engine: {:#}", e);
        }

        let size = result?;
        info!("PDF export complete: {} bytes", size);
        Ok(size)
    }

    fn print(&self, session: &mut dyn EngineSession, url: &Url, output_path: &Path) -> Result<usize> {
        let pdf_data = session.print_to_pdf(url, self.page)?;

        // Verify PDF is not empty
        if pdf_data.is_empty() {
            bail!("Rendering engine returned an empty PDF");
        }

        // Write PDF to file
        artifact::write_bytes_atomic(output_path, &pdf_data)
            .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

        Ok(pdf_data.len())
    }
}
