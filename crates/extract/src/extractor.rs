use crate::document::Document;
use crate::error::{ExtractError, Result};
use std::path::Path;

/// Extracts text content from PDF files
#[derive(Debug, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extract a single PDF into a [`Document`]
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToString::to_string)
            .unwrap_or_else(|| path.display().to_string());

        let text = pdf_extract::extract_text(path)
            .map_err(|e| ExtractError::pdf(path, e.to_string()))?;

        let page_count = lopdf::Document::load(path)
            .map_err(|e| ExtractError::pdf(path, e.to_string()))?
            .get_pages()
            .len();

        log::info!("Extracted {page_count} pages from {filename}");

        Ok(Document::new(filename, text, page_count))
    }

    /// Extract every `*.pdf` in a directory, sorted by filename.
    ///
    /// A missing directory is an error; a directory with no PDFs returns an
    /// empty list with a warning, so callers can decide whether that matters.
    pub fn extract_directory(&self, directory: impl AsRef<Path>) -> Result<Vec<Document>> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(ExtractError::DirectoryNotFound(directory.to_path_buf()));
        }

        let pattern = directory.join("*.pdf");
        let pattern = pattern.to_string_lossy();
        let mut paths: Vec<_> = glob::glob(&pattern)?.filter_map(std::result::Result::ok).collect();
        paths.sort();

        if paths.is_empty() {
            log::warn!("No PDF files found in {}", directory.display());
            return Ok(Vec::new());
        }

        log::info!("Found {} PDF file(s) in {}", paths.len(), directory.display());

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            documents.push(self.extract_file(&path)?);
        }

        Ok(documents)
    }
}
