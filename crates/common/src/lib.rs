use serde::{Deserialize, Serialize};

pub mod catalog;

pub use catalog::{FileKey, TabGroupKind, UnknownFileKey, resolve};

pub const FILE_NOT_FOUND: &str = "File not found";
pub const COULD_NOT_READ_FILE: &str = "Could not read file";

/// Body of `GET /api/config/{file}`.
///
/// Serialized untagged, so the wire form is either `{"content": ...}` or
/// `{"error": ...}` and never both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ContentResponse {
    Content { content: String },
    Error { error: String },
}

impl ContentResponse {
    pub fn content(text: impl Into<String>) -> Self {
        Self::Content {
            content: text.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub role: String,
    pub online: bool,
}
