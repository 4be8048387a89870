//! Build job model and state tracking for one pipeline run.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// One CV build: input, output, progress and outcome.
#[derive(Debug, Clone)]
pub struct BuildJob {
    pub build_id: String,
    pub input_path: PathBuf,
    pub output_name: String,
    pub status: BuildStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub asset_warnings: usize,
    pub html_bytes: Option<usize>,
    pub pdf_bytes: Option<usize>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Pending,
    Rendering,
    Exporting,
    Complete,
    Failed,
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStatus::Pending => write!(f, "pending"),
            BuildStatus::Rendering => write!(f, "rendering"),
            BuildStatus::Exporting => write!(f, "exporting"),
            BuildStatus::Complete => write!(f, "complete"),
            BuildStatus::Failed => write!(f, "failed"),
        }
    }
}

impl BuildJob {
    pub fn new(input_path: impl Into<PathBuf>, output_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            build_id: Uuid::new_v4().to_string(),
            input_path: input_path.into(),
            output_name: output_name.into(),
            status: BuildStatus::Pending,
            created_at: now,
            updated_at: now,
            asset_warnings: 0,
            html_bytes: None,
            pdf_bytes: None,
            error: None,
        }
    }

    pub fn start_rendering(&mut self) {
        self.status = BuildStatus::Rendering;
        self.updated_at = Utc::now();
    }

    pub fn start_exporting(&mut self, html_bytes: usize) {
        self.status = BuildStatus::Exporting;
        self.html_bytes = Some(html_bytes);
        self.updated_at = Utc::now();
    }

    pub fn mark_complete(&mut self, pdf_bytes: usize) {
        self.status = BuildStatus::Complete;
        self.pdf_bytes = Some(pdf_bytes);
        self.updated_at = Utc::now();
        self.error = None;
    }

    pub fn mark_failed(&mut self, error: String) {
        self.status = BuildStatus::Failed;
        self.updated_at = Utc::now();
        self.error = Some(error);
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, BuildStatus::Complete | BuildStatus::Failed)
    }

    pub fn duration_ms(&self) -> Option<i64> {
        if self.is_finished() {
            Some(self.updated_at.signed_duration_since(self.created_at).num_milliseconds())
        } else {
            None
        }
    }
}
