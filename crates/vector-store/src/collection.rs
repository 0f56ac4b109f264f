use crate::embedding::Embedder;
use crate::error::{Result, VectorStoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const COLLECTION_SCHEMA_VERSION: u32 = 1;

/// The single logical collection the pipeline uses per persist directory
pub const DEFAULT_COLLECTION_NAME: &str = "context_documents";

/// Per-chunk metadata stored alongside the embedding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source document filename
    pub filename: String,

    /// String-encoded 0-based chunk position within its document
    pub chunk_index: String,
}

/// One persisted chunk: id, raw text, embedding, metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
    pub metadata: ChunkMetadata,
}

/// A query hit, ordered by ascending cosine distance
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
    /// Cosine distance to the query (1 − cosine similarity)
    pub distance: f32,
}

#[derive(Serialize, Deserialize)]
struct PersistedCollection {
    schema_version: u32,
    dimension: Option<usize>,
    chunks: Vec<StoredChunk>,
}

/// A named, file-backed set of chunk embeddings.
///
/// The collection adopts the dimension of the first stored embedding and
/// rejects later mismatches, so mixing embedding providers surfaces as an
/// error instead of silently corrupting similarity ranking.
#[derive(Debug)]
pub struct Collection {
    name: String,
    path: PathBuf,
    dimension: Option<usize>,
    chunks: Vec<StoredChunk>,
    by_id: HashMap<String, usize>,
}

impl Collection {
    fn new(name: String, path: PathBuf) -> Self {
        Self {
            name,
            path,
            dimension: None,
            chunks: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Collection name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored chunks
    #[must_use]
    pub fn count(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Stored ids, in insertion order
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.chunks.iter().map(|chunk| chunk.id.clone()).collect()
    }

    /// Append a batch of chunks and persist the collection file.
    ///
    /// All four slices must have equal lengths. Persisting happens per
    /// batch: if a later batch fails, earlier batches remain committed.
    /// An id already present is overwritten in place.
    pub async fn add_batch(
        &mut self,
        ids: Vec<String>,
        texts: Vec<String>,
        embeddings: Vec<Vec<f32>>,
        metadatas: Vec<ChunkMetadata>,
    ) -> Result<()> {
        let len = ids.len();
        if texts.len() != len || embeddings.len() != len || metadatas.len() != len {
            return Err(VectorStoreError::BatchShape(format!(
                "ids={}, texts={}, embeddings={}, metadatas={}",
                len,
                texts.len(),
                embeddings.len(),
                metadatas.len()
            )));
        }

        for (((id, text), embedding), metadata) in ids
            .into_iter()
            .zip(texts)
            .zip(embeddings)
            .zip(metadatas)
        {
            match self.dimension {
                Some(expected) if embedding.len() != expected => {
                    return Err(VectorStoreError::InvalidDimension {
                        expected,
                        actual: embedding.len(),
                    });
                }
                Some(_) => {}
                None => self.dimension = Some(embedding.len()),
            }

            let stored = StoredChunk {
                id: id.clone(),
                text,
                embedding,
                metadata,
            };
            match self.by_id.get(&id) {
                Some(&pos) => self.chunks[pos] = stored,
                None => {
                    self.by_id.insert(id, self.chunks.len());
                    self.chunks.push(stored);
                }
            }
        }

        self.save().await?;
        log::debug!("Collection '{}' now holds {} chunks", self.name, self.count());
        Ok(())
    }

    /// Nearest chunks to `embedding`, ordered by ascending cosine distance.
    ///
    /// The metric is explicit cosine; nothing is delegated to a store
    /// default. At most `top_k` results are returned.
    pub fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        if let Some(expected) = self.dimension {
            if embedding.len() != expected {
                return Err(VectorStoreError::InvalidDimension {
                    expected,
                    actual: embedding.len(),
                });
            }
        }

        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                id: chunk.id.clone(),
                text: chunk.text.clone(),
                metadata: chunk.metadata.clone(),
                distance: 1.0 - Embedder::cosine_similarity(embedding, &chunk.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);

        Ok(scored)
    }

    async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let persisted = PersistedCollection {
            schema_version: COLLECTION_SCHEMA_VERSION,
            dimension: self.dimension,
            chunks: self.chunks.clone(),
        };
        let bytes = serde_json::to_vec(&persisted)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Factory for named collections under one persist directory
pub struct CollectionStore {
    root: PathBuf,
}

impl CollectionStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Persist directory this store writes under
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    /// Load a collection if its file exists, otherwise return a fresh empty
    /// one bound to that name. Idempotent.
    pub async fn get_or_create(&self, name: &str) -> Result<Collection> {
        let path = self.path_for(name);
        if !path.exists() {
            log::debug!("Creating collection '{name}' at {}", path.display());
            return Ok(Collection::new(name.to_string(), path));
        }

        let bytes = tokio::fs::read(&path).await?;
        let persisted: PersistedCollection = serde_json::from_slice(&bytes)?;
        if persisted.schema_version != COLLECTION_SCHEMA_VERSION {
            return Err(VectorStoreError::EmbeddingError(format!(
                "Unsupported collection schema_version {} (expected {COLLECTION_SCHEMA_VERSION})",
                persisted.schema_version
            )));
        }

        let mut collection = Collection::new(name.to_string(), path);
        collection.dimension = persisted.dimension;
        for stored in persisted.chunks {
            collection.by_id.insert(stored.id.clone(), collection.chunks.len());
            collection.chunks.push(stored);
        }

        log::debug!(
            "Loaded collection '{name}' with {} chunks",
            collection.count()
        );
        Ok(collection)
    }

    /// Load an existing collection; error if it has never been persisted
    pub async fn get(&self, name: &str) -> Result<Collection> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(VectorStoreError::CollectionNotFound(name.to_string()));
        }
        self.get_or_create(name).await
    }

    /// Remove a collection's file. Deleting a collection that does not
    /// exist is not an error (rebuild-from-scratch convenience).
    pub async fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                log::info!("Deleted collection '{name}'");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn metadata(filename: &str, index: usize) -> ChunkMetadata {
        ChunkMetadata {
            filename: filename.to_string(),
            chunk_index: index.to_string(),
        }
    }

    async fn populated(store: &CollectionStore) -> Collection {
        let mut collection = store.get_or_create("test").await.unwrap();
        collection
            .add_batch(
                vec!["a.pdf_0".into(), "a.pdf_1".into(), "b.pdf_0".into()],
                vec!["alpha".into(), "beta".into(), "gamma".into()],
                vec![
                    vec![1.0, 0.0, 0.0],
                    vec![0.0, 1.0, 0.0],
                    vec![0.9, 0.1, 0.0],
                ],
                vec![metadata("a.pdf", 0), metadata("a.pdf", 1), metadata("b.pdf", 0)],
            )
            .await
            .unwrap();
        collection
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path());

        let first = store.get_or_create("test").await.unwrap();
        assert_eq!(first.count(), 0);
        let second = store.get_or_create("test").await.unwrap();
        assert_eq!(second.count(), 0);
    }

    #[tokio::test]
    async fn add_batch_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path());
        populated(&store).await;

        let reopened = store.get("test").await.unwrap();
        assert_eq!(reopened.count(), 3);
        assert_eq!(
            reopened.ids(),
            vec!["a.pdf_0".to_string(), "a.pdf_1".into(), "b.pdf_0".into()]
        );
    }

    #[tokio::test]
    async fn query_orders_by_ascending_distance() {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path());
        let collection = populated(&store).await;

        let hits = collection.query(&[1.0, 0.0, 0.0], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "a.pdf_0");
        assert_eq!(hits[1].id, "b.pdf_0");
        assert!(hits[0].distance <= hits[1].distance);
    }

    #[tokio::test]
    async fn query_returns_at_most_top_k() {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path());
        let collection = populated(&store).await;

        assert_eq!(collection.query(&[1.0, 0.0, 0.0], 10).unwrap().len(), 3);
        assert_eq!(collection.query(&[1.0, 0.0, 0.0], 1).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dimension_mismatch_is_rejected() {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path());
        let mut collection = populated(&store).await;

        let err = collection
            .add_batch(
                vec!["c.pdf_0".into()],
                vec!["delta".into()],
                vec![vec![1.0, 0.0]],
                vec![metadata("c.pdf", 0)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VectorStoreError::InvalidDimension { .. }));

        let err = collection.query(&[1.0], 1).unwrap_err();
        assert!(matches!(err, VectorStoreError::InvalidDimension { .. }));
    }

    #[tokio::test]
    async fn mismatched_batch_lengths_are_rejected() {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path());
        let mut collection = store.get_or_create("test").await.unwrap();

        let err = collection
            .add_batch(
                vec!["a_0".into()],
                vec![],
                vec![vec![1.0]],
                vec![metadata("a", 0)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VectorStoreError::BatchShape(_)));
    }

    #[tokio::test]
    async fn delete_missing_collection_is_ok() {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path());
        store.delete("never_created").await.unwrap();
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path());
        populated(&store).await;

        store.delete("test").await.unwrap();
        let err = store.get("test").await.unwrap_err();
        assert!(matches!(err, VectorStoreError::CollectionNotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_id_overwrites_in_place() {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path());
        let mut collection = populated(&store).await;

        collection
            .add_batch(
                vec!["a.pdf_0".into()],
                vec!["alpha revised".into()],
                vec![vec![0.5, 0.5, 0.0]],
                vec![metadata("a.pdf", 0)],
            )
            .await
            .unwrap();

        assert_eq!(collection.count(), 3);
        let hits = collection.query(&[0.5, 0.5, 0.0], 1).unwrap();
        assert_eq!(hits[0].text, "alpha revised");
    }
}
