//! # Examscope Chunker
//!
//! Fixed-size overlapping text windows for embedding and retrieval.
//!
//! Document text is sliced into character windows of `chunk_size` characters,
//! each overlapping the previous window by `chunk_overlap` characters. There
//! is no sentence or word-boundary awareness: the windows are pure character
//! offsets, which keeps chunk identity stable across runs.
//!
//! ## Example
//!
//! ```rust
//! use examscope_chunker::{Chunker, ChunkerConfig};
//!
//! let chunker = Chunker::new(ChunkerConfig { chunk_size: 10, chunk_overlap: 3 }).unwrap();
//! let chunks = chunker.split("the quick brown fox jumps");
//! assert_eq!(chunks[0].chars().count(), 10);
//! ```

mod chunker;
mod config;
mod error;

pub use chunker::Chunker;
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
