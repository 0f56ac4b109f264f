use std::path::PathBuf;
use thiserror::Error;

/// Result type for guide generation
pub type Result<T> = std::result::Result<T, GuideError>;

/// Errors that can occur while generating the study guide
#[derive(Error, Debug)]
pub enum GuideError {
    /// LLM call failed
    #[error("LLM error: {0}")]
    Llm(#[from] examscope_llm::LlmError),

    /// The LLM response contained no recognizable JSON payload
    #[error("No JSON {expected} found in LLM response (starts with: {snippet})")]
    JsonMissing {
        expected: &'static str,
        snippet: String,
    },

    /// The extracted JSON payload did not deserialize
    #[error("Failed to parse {expected} from LLM response: {reason} (starts with: {snippet})")]
    JsonParse {
        expected: &'static str,
        reason: String,
        snippet: String,
    },

    /// PDF conversion failed; the markdown fallback was written instead
    #[error("PDF generation failed ({reason}); markdown written to {fallback}")]
    PandocFailed { reason: String, fallback: PathBuf },

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// First 200 characters of a response, for error context
pub(crate) fn snippet(response: &str) -> String {
    response.chars().take(200).collect()
}
