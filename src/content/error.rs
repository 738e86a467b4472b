//! Content pipeline errors

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the repository and the body parser.
///
/// A missing document is not an error: lookups return `Ok(None)`.
/// Malformed front matter never reaches the caller either, it degrades
/// to defaults inside [`FrontMatter::parse`](super::FrontMatter::parse).
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to access {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed body at line {line}: {message}")]
    MalformedBody { line: usize, message: String },
}

impl ContentError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContentError::Storage {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        ContentError::MalformedBody {
            line,
            message: message.into(),
        }
    }
}
