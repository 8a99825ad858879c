use std::path::PathBuf;

use thiserror::Error;

use crate::container::HeaderCodecError;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Access denied: \"{0}\" is outside of the served directory")]
    AccessDenied(String),
    #[error("File not found: \"{0}\"")]
    FileNotFound(String),
    #[error("Metadata is only supported for .safetensors files: \"{0}\"")]
    UnsupportedFormat(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Codec(#[from] HeaderCodecError),
}

impl LibraryError {
    pub fn is_no_metadata(&self) -> bool {
        matches!(self, Self::Codec(HeaderCodecError::NoMetadata))
    }
}
