//! # Examscope Extract
//!
//! PDF text extraction for exam and context documents.
//!
//! A [`Document`] is the immutable unit the rest of the pipeline works on:
//! the source filename, the full extracted text, and the page count.
//! Extraction is the only stage that touches PDF internals; downstream
//! crates only ever see plain text.

mod document;
mod error;
mod extractor;

pub use document::Document;
pub use error::{ExtractError, Result};
pub use extractor::PdfExtractor;
