use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur talking to the LLM API
#[derive(Error, Debug)]
pub enum LlmError {
    /// Required configuration is missing
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Configuration value could not be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status
    #[error("LLM API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The API response had no usable content
    #[error("LLM response contained no choices")]
    EmptyResponse,
}
