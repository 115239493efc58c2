//! Error types for session operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::format::FormatError;

/// Errors that abort a session operation. Session state is left unchanged.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Image folder not found: {0:?}")]
    FolderNotFound(PathBuf),

    #[error("No image files found in {0:?}")]
    EmptyFolder(PathBuf),

    #[error("Failed to load image {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No save directory selected")]
    NoSaveDirectory,

    #[error("Label file error: {0}")]
    Format(#[from] FormatError),
}

impl SessionError {
    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}
