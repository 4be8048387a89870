//! Render context assembled from a CV document.

use serde::Serialize;
use serde_json::Value;

/// The fixed set of variables handed to the CV template.
///
/// Every field is always present: missing or `null` source fields become an
/// empty string or an empty list. Nested values are passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderContext {
    pub name: Value,
    pub position: Value,
    pub contacts: Value,
    pub summary: Value,
    pub skills: Value,
    pub education_certificates: Value,
    pub languages: Value,
    pub experience: Value,
    pub cv_icon: String,
}

impl RenderContext {
    /// Top-level document fields the template knows about.
    pub const FIELDS: [&'static str; 8] = [
        "name",
        "position",
        "contacts",
        "summary",
        "skills",
        "education_certificates",
        "languages",
        "experience",
    ];

    /// Maps a CV document onto the template variables. Never fails.
    pub fn from_document(document: &Value, cv_icon: String) -> Self {
        Self {
            name: text(document, "name"),
            position: text(document, "position"),
            contacts: list(document, "contacts"),
            summary: text(document, "summary"),
            skills: list(document, "skills"),
            education_certificates: list(document, "education_certificates"),
            languages: list(document, "languages"),
            experience: list(document, "experience"),
            cv_icon,
        }
    }
}

fn field(document: &Value, key: &str) -> Option<Value> {
    document.get(key).filter(|v| !v.is_null()).cloned()
}

fn text(document: &Value, key: &str) -> Value {
    field(document, key).unwrap_or_else(|| Value::String(String::new()))
}

fn list(document: &Value, key: &str) -> Value {
    field(document, key).unwrap_or_else(|| Value::Array(Vec::new()))
}
