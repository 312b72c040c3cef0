use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// What the caller gets back: either `{"html": ...}` or `{"error": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportResponse {
    Html { html: String },
    Error { error: String },
}

impl ImportResponse {
    pub fn html(html: impl Into<String>) -> Self {
        ImportResponse::Html { html: html.into() }
    }

    /// Error descriptor naming the stage that failed.
    pub fn from_error(err: &ImportError) -> Self {
        ImportResponse::Error {
            error: format!("{}: {err}", err.stage()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ImportResponse::Error { .. })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
    }
}
