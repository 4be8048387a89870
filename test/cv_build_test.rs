/// Integration tests for the CV build pipeline.
///
/// These tests drive `CvBuilder` end to end with the bundled template and a
/// stand-in rendering engine.
///
/// ## Running Tests
///
/// ```bash
/// # Unit and integration tests (no browser needed)
/// cargo test
///
/// # Real browser test
/// CHROME_EXECUTABLE_PATH=/usr/bin/chromium cargo test --test cv_build_test -- --ignored
/// ```

#[cfg(test)]
mod tests {
    use json_cv::{
        converter::{ChromeEngine, EngineSession, PageSize, RenderEngine},
        error::{BuildError, ErrorKind},
        job::{BuildJob, BuildStatus},
        pipeline::CvBuilder,
    };
    use serde_json::json;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;
    use url::Url;

    const FAKE_PDF: &[u8] = b"%PDF-1.4\n% fake\n%%EOF\n";

    /// Engine that checks it was given a file URL and returns fixed bytes.
    #[derive(Clone, Default)]
    struct FakeEngine {
        launches: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
    }

    struct FakeSession {
        closes: Arc<AtomicUsize>,
    }

    impl RenderEngine for FakeEngine {
        fn launch(&self) -> anyhow::Result<Box<dyn EngineSession>> {
            self.launches.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeSession {
                closes: Arc::clone(&self.closes),
            }))
        }
    }

    impl EngineSession for FakeSession {
        fn print_to_pdf(&mut self, url: &Url, page: PageSize) -> anyhow::Result<Vec<u8>> {
            assert_eq!(url.scheme(), "file");
            assert_eq!(page, PageSize::A4);
            let path = url.to_file_path().unwrap();
            assert!(path.is_absolute());
            assert!(path.exists());
            Ok(FAKE_PDF.to_vec())
        }

        fn close(&mut self) -> anyhow::Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn bundled_template() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/cv_template.html")
    }

    /// A scratch project root with the bundled template.
    fn project() -> TempDir {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("templates")).unwrap();
        fs::copy(bundled_template(), root.path().join("templates/cv_template.html")).unwrap();
        root
    }

    fn write_json(root: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = root.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn builder(root: &TempDir, engine: FakeEngine) -> CvBuilder<FakeEngine> {
        CvBuilder::new(root.path(), Path::new("templates"), engine).unwrap()
    }

    /// Minimal document produces HTML containing the name and a non-empty PDF.
    #[tokio::test]
    async fn test_minimal_document() {
        let root = project();
        let input = write_json(&root, "cv.json", r#"{"name": "A"}"#);
        let output = root.path().join("output/cv");
        let engine = FakeEngine::default();
        let builder = builder(&root, engine.clone());

        let mut job = BuildJob::new(&input, output.to_string_lossy());
        let paths = builder.build(&mut job).await.unwrap();

        let html = fs::read_to_string(&paths.html).unwrap();
        assert!(html.contains("<h1>A</h1>"));
        assert!(fs::metadata(&paths.pdf).unwrap().len() > 0);
        assert_eq!(paths.pdf, root.path().join("output/cv.pdf"));
        assert_eq!(job.status, BuildStatus::Complete);
        assert_eq!(engine.launches.load(Ordering::SeqCst), 1);
        assert_eq!(engine.closes.load(Ordering::SeqCst), 1);
    }

    /// A contact icon path is replaced by the SVG file's content.
    #[test]
    fn test_contact_icon_is_inlined() {
        let root = project();
        fs::create_dir_all(root.path().join("static/icons")).unwrap();
        fs::write(root.path().join("static/icons/email.svg"), "<svg>E</svg>").unwrap();
        let builder = builder(&root, FakeEngine::default());

        let doc = json!({
            "name": "A",
            "contacts": [{"icon": "static/icons/email.svg", "label": "a@example.com"}]
        });
        let (context, warnings) = builder.prepare_context(doc);

        assert_eq!(context.contacts[0]["icon"], json!("<svg>E</svg>"));
        // No cv.svg in this project.
        assert_eq!(context.cv_icon, "");
        assert_eq!(warnings.len(), 1);

        let html = builder.generate_html(&context).unwrap();
        assert!(html.contains("<span class=\"icon\"><svg>E</svg></span>"));
    }

    /// The CV icon is embedded as a base64 data URI.
    #[test]
    fn test_cv_icon_is_base64_embedded() {
        let root = project();
        fs::create_dir_all(root.path().join("static/icons")).unwrap();
        fs::write(root.path().join("static/icons/cv.svg"), "<svg>E</svg>\n").unwrap();
        let builder = builder(&root, FakeEngine::default());

        let (context, warnings) = builder.prepare_context(json!({"name": "A"}));
        assert!(warnings.is_empty());

        let html = builder.generate_html(&context).unwrap();
        assert!(html.contains("data:image/svg+xml;base64,PHN2Zz5FPC9zdmc+"));
    }

    /// Rendering the same document twice gives identical bytes.
    #[tokio::test]
    async fn test_builds_are_deterministic() {
        let root = project();
        let sample = fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("cv.json")).unwrap();
        let input = write_json(&root, "cv.json", &sample);
        let builder = builder(&root, FakeEngine::default());

        let first_out = root.path().join("first/cv");
        let second_out = root.path().join("second/cv");
        let mut first = BuildJob::new(&input, first_out.to_string_lossy());
        let mut second = BuildJob::new(&input, second_out.to_string_lossy());

        let a = builder.build(&mut first).await.unwrap();
        let b = builder.build(&mut second).await.unwrap();

        let html_a = fs::read(&a.html).unwrap();
        let html_b = fs::read(&b.html).unwrap();
        assert_eq!(html_a, html_b);
        assert!(String::from_utf8(html_a).unwrap().contains("Jane Doe"));
    }

    /// Missing input fails before anything is written.
    #[tokio::test]
    async fn test_missing_input() {
        let root = project();
        let engine = FakeEngine::default();
        let builder = builder(&root, engine.clone());

        let output = root.path().join("output/cv");
        let mut job = BuildJob::new(root.path().join("missing.json"), output.to_string_lossy());
        let err = builder.build(&mut job).await.unwrap_err();

        assert!(matches!(err, BuildError::InputNotFound(_)));
        assert!(err.to_string().contains("not found"));
        assert!(!root.path().join("output").exists());
        assert_eq!(engine.launches.load(Ordering::SeqCst), 0);
    }

    /// Malformed JSON fails before anything is written.
    #[tokio::test]
    async fn test_malformed_json() {
        let root = project();
        let input = write_json(&root, "cv.json", r#"{"name": "A",}"#);
        let builder = builder(&root, FakeEngine::default());

        let output = root.path().join("output/cv");
        let mut job = BuildJob::new(&input, output.to_string_lossy());
        let err = builder.build(&mut job).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(err.to_string().contains("Invalid JSON"));
        assert!(!root.path().join("output").exists());
        assert_eq!(job.status, BuildStatus::Failed);
    }

    /// Full document with every section renders without errors.
    #[tokio::test]
    async fn test_full_document_sections() {
        let root = project();
        let input = write_json(
            &root,
            "cv.json",
            &json!({
                "name": "Jane",
                "position": "Engineer",
                "summary": "Builds things.",
                "skills": [{"category": "Languages", "items": ["Rust", "Go"]}],
                "education_certificates": [
                    {"title": "MSc", "institution": "TU"},
                    {"title": "CKA", "institution": "CNCF"}
                ],
                "languages": [{"name": "English", "level": "Fluent"}],
                "experience": [{"position": "Dev", "company": "Acme", "achievements": ["Shipped"]}]
            })
            .to_string(),
        );
        let builder = builder(&root, FakeEngine::default());

        let output = root.path().join("cv");
        let mut job = BuildJob::new(&input, output.to_string_lossy());
        let paths = builder.build(&mut job).await.unwrap();
        let html = fs::read_to_string(paths.html).unwrap();

        for expected in ["Engineer", "Builds things.", "Rust, Go", "MSc", "CKA", "Fluent", "Acme", "Shipped"] {
            assert!(html.contains(expected), "missing {expected:?}");
        }
    }

    /// Real browser run. Requires `CHROME_EXECUTABLE_PATH`.
    #[tokio::test]
    #[ignore]
    async fn test_real_chrome_build() {
        let executable = std::env::var("CHROME_EXECUTABLE_PATH").unwrap();
        let root = project();
        let input = write_json(&root, "cv.json", r#"{"name": "A"}"#);
        let builder =
            CvBuilder::new(root.path(), Path::new("templates"), ChromeEngine::new(executable, false))
                .unwrap();

        let output = root.path().join("output/cv");
        let mut job = BuildJob::new(&input, output.to_string_lossy());
        let paths = builder.build(&mut job).await.unwrap();

        let pdf = fs::read(paths.pdf).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
