//! # Examscope Retrieval
//!
//! Top-K text retrieval over the persisted chunk collection.
//!
//! Retrieval is advisory: it enriches explanation prompts but never gates
//! them. Every failure mode (absent collection, embedding failure, store
//! error) degrades to an empty result with a warning instead of an error.

use examscope_store::{CollectionStore, Embedder, DEFAULT_COLLECTION_NAME};
use std::path::Path;

/// Default number of chunks returned per query
pub const DEFAULT_TOP_K: usize = 5;

/// Embeds queries and returns the most similar stored chunk texts
pub struct Retriever {
    store: CollectionStore,
    embedder: Embedder,
    collection_name: String,
}

impl Retriever {
    pub fn new(persist_dir: impl AsRef<Path>, embedder: Embedder) -> Self {
        Self {
            store: CollectionStore::new(persist_dir),
            embedder,
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
        }
    }

    /// Return up to `top_k` chunk texts ordered by ascending cosine
    /// distance to the query. Scores and metadata are dropped at this
    /// boundary; callers only see text.
    pub async fn search(&self, query: &str, top_k: usize) -> Vec<String> {
        let collection = match self.store.get(&self.collection_name).await {
            Ok(collection) => collection,
            Err(e) => {
                log::warn!("Search skipped: {e}");
                return Vec::new();
            }
        };

        let embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                log::warn!("Search skipped, query embedding failed: {e}");
                return Vec::new();
            }
        };

        match collection.query(&embedding, top_k) {
            Ok(hits) => hits.into_iter().map(|hit| hit.text).collect(),
            Err(e) => {
                log::warn!("Search failed: {e}");
                Vec::new()
            }
        }
    }
}
