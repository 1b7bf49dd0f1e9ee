use std::path::{Path, PathBuf};

use common::{COULD_NOT_READ_FILE, ContentResponse, FILE_NOT_FOUND, FileKey};
use tokio::fs;

#[derive(Debug)]
pub enum ContentError {
    UnknownKey(String),
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKey(key) => write!(f, "unknown file key: {key}"),
            Self::Unreadable { path, source } => {
                write!(f, "could not read {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownKey(_) => None,
            Self::Unreadable { source, .. } => Some(source),
        }
    }
}

impl ContentError {
    /// Client-facing message. Never includes the path or the io error.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::UnknownKey(_) => FILE_NOT_FOUND,
            Self::Unreadable { .. } => COULD_NOT_READ_FILE,
        }
    }
}

/// Reads the file behind `key` from disk. The key is resolved before any I/O,
/// and the file is read fresh on every call.
pub async fn read_content(root: &Path, key: &str) -> Result<String, ContentError> {
    let file_key = key
        .parse::<FileKey>()
        .map_err(|_| ContentError::UnknownKey(key.to_string()))?;
    let path = root.join(file_key.relative_path());

    match fs::read(&path).await {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(source) => Err(ContentError::Unreadable { path, source }),
    }
}

pub fn content_response(result: Result<String, ContentError>) -> ContentResponse {
    match result {
        Ok(text) => ContentResponse::content(text),
        Err(err) => ContentResponse::error(err.public_message()),
    }
}
