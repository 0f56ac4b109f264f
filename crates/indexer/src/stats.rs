use serde::{Deserialize, Serialize};

/// Statistics about one indexing run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of documents processed
    pub documents: usize,

    /// Number of chunks embedded and stored
    pub chunks: usize,

    /// Whether the run was an idempotent no-op on a populated collection
    pub skipped: bool,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl IndexStats {
    #[must_use]
    pub fn skipped_run() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}
