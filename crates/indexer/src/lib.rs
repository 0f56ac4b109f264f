//! # Examscope Indexer
//!
//! Drives the context-document indexing pipeline.
//!
//! ## Pipeline
//!
//! ```text
//! Directory of PDFs
//!     │
//!     ├──> PdfExtractor
//!     │      └─> Documents
//!     │
//!     ├──> Chunker (overlapping windows)
//!     │      └─> Chunks with {filename}_{index} ids
//!     │
//!     └──> Collection (batch embed, one store write per batch)
//! ```
//!
//! Indexing is idempotent: a collection that already holds chunks is left
//! untouched unless a rebuild is forced. The skip decision is a chunk-count
//! check only; there is no content hashing, so a changed corpus with a
//! populated collection is not re-indexed without `rebuild`.

mod error;
mod indexer;
mod stats;

pub use error::{IndexerError, Result};
pub use indexer::{DocumentIndexer, EMBED_BATCH_SIZE};
pub use stats::IndexStats;
