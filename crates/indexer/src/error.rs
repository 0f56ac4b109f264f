use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Extraction error: {0}")]
    ExtractError(#[from] examscope_extract::ExtractError),

    #[error("Chunker error: {0}")]
    ChunkerError(#[from] examscope_chunker::ChunkerError),

    #[error("Vector store error: {0}")]
    VectorStoreError(#[from] examscope_store::VectorStoreError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
