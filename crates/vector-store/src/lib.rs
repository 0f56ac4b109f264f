//! # Examscope Store
//!
//! Embedding backends and the persisted chunk collection.
//!
//! The store has two halves:
//! - [`Embedder`]: text → vector, behind an explicit [`EmbeddingConfig`]
//!   variant (remote API, local ONNX model, or deterministic stub for tests)
//!   chosen once at construction.
//! - [`CollectionStore`] / [`Collection`]: a named, JSON-persisted set of
//!   `(id, text, embedding, metadata)` tuples with brute-force cosine
//!   nearest-neighbor queries. The collection file is the only durable state
//!   in the pipeline.

mod collection;
mod embedding;
mod error;
mod local;
mod remote;

pub use collection::{
    ChunkMetadata, Collection, CollectionStore, ScoredChunk, StoredChunk,
    COLLECTION_SCHEMA_VERSION, DEFAULT_COLLECTION_NAME,
};
pub use embedding::{Embedder, EmbeddingConfig, LocalModelConfig};
pub use error::{Result, VectorStoreError};
