use std::path::PathBuf;
use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur during PDF extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Source directory is missing
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// PDF could not be parsed
    #[error("Failed to extract {path}: {reason}")]
    PdfError { path: PathBuf, reason: String },

    /// Invalid glob pattern for the source directory
    #[error("Invalid source pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ExtractError {
    pub(crate) fn pdf(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::PdfError {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
