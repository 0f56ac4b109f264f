use serde::{Deserialize, Serialize};

/// An extracted source document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Original filename (no directory component)
    pub filename: String,

    /// Full extracted text content
    pub text: String,

    /// Number of pages in the source PDF
    pub page_count: usize,
}

impl Document {
    pub fn new(filename: impl Into<String>, text: impl Into<String>, page_count: usize) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
            page_count,
        }
    }
}
