use crate::error::Result;
use crate::stats::IndexStats;
use examscope_chunker::{Chunker, ChunkerConfig};
use examscope_extract::{Document, PdfExtractor};
use examscope_store::{ChunkMetadata, CollectionStore, Embedder, DEFAULT_COLLECTION_NAME};
use std::path::Path;
use std::time::Instant;

/// Chunks embedded and written per store call. Bounds peak memory and
/// request size; this is not a concurrency knob.
pub const EMBED_BATCH_SIZE: usize = 100;

/// Indexes a directory of context PDFs into the persisted collection
pub struct DocumentIndexer {
    store: CollectionStore,
    embedder: Embedder,
    chunker: Chunker,
    extractor: PdfExtractor,
    collection_name: String,
}

impl DocumentIndexer {
    /// Create an indexer over `persist_dir` with default chunking (1000/200)
    pub fn new(persist_dir: impl AsRef<Path>, embedder: Embedder) -> Result<Self> {
        Self::with_chunker_config(persist_dir, embedder, ChunkerConfig::default())
    }

    /// Create an indexer with explicit chunking parameters
    pub fn with_chunker_config(
        persist_dir: impl AsRef<Path>,
        embedder: Embedder,
        config: ChunkerConfig,
    ) -> Result<Self> {
        Ok(Self {
            store: CollectionStore::new(persist_dir),
            embedder,
            chunker: Chunker::new(config)?,
            extractor: PdfExtractor::new(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
        })
    }

    /// The collection store this indexer writes into
    #[must_use]
    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    /// Extract every PDF under `source_dir` and index it.
    ///
    /// With `rebuild` the existing collection is dropped before anything
    /// else, so a failed extraction never leaves a stale collection that a
    /// later count-check run would reuse. Otherwise a populated collection
    /// short-circuits into a no-op. Errors propagate; indexing is not
    /// best-effort, though batches committed before a failure remain
    /// committed.
    pub async fn index_documents(
        &self,
        source_dir: impl AsRef<Path>,
        rebuild: bool,
    ) -> Result<IndexStats> {
        let source_dir = source_dir.as_ref();

        if rebuild {
            self.store.delete(&self.collection_name).await?;
        } else {
            let collection = self.store.get_or_create(&self.collection_name).await?;
            if collection.count() > 0 {
                log::info!(
                    "Using existing index with {} chunks (pass rebuild to re-index)",
                    collection.count()
                );
                return Ok(IndexStats::skipped_run());
            }
        }

        let documents = self.extractor.extract_directory(source_dir)?;
        self.index_corpus(&documents, rebuild).await
    }

    /// Index already-extracted documents. Same semantics as
    /// [`index_documents`](Self::index_documents) minus the PDF extraction.
    pub async fn index_corpus(&self, documents: &[Document], rebuild: bool) -> Result<IndexStats> {
        let start = Instant::now();

        if rebuild {
            // Stale chunks must never survive a rebuild; absent is fine.
            self.store.delete(&self.collection_name).await?;
        }

        let mut collection = self.store.get_or_create(&self.collection_name).await?;
        if !rebuild && collection.count() > 0 {
            log::info!("Using existing index with {} chunks", collection.count());
            return Ok(IndexStats::skipped_run());
        }

        if documents.is_empty() {
            log::warn!("No documents to index");
            return Ok(IndexStats {
                time_ms: start.elapsed().as_millis() as u64,
                ..IndexStats::default()
            });
        }

        let mut all_ids = Vec::new();
        let mut all_texts = Vec::new();
        let mut all_metadatas = Vec::new();

        for doc in documents {
            let chunks = self.chunker.split(&doc.text);
            log::debug!("{}: {} chunks", doc.filename, chunks.len());
            for (i, chunk) in chunks.into_iter().enumerate() {
                all_ids.push(format!("{}_{i}", doc.filename));
                all_texts.push(chunk);
                all_metadatas.push(ChunkMetadata {
                    filename: doc.filename.clone(),
                    chunk_index: i.to_string(),
                });
            }
        }

        let total = all_texts.len();
        log::info!(
            "Generating embeddings for {total} chunks from {} documents",
            documents.len()
        );

        let mut written = 0usize;
        while written < total {
            let end = (written + EMBED_BATCH_SIZE).min(total);
            let batch_texts = &all_texts[written..end];

            let embeddings = if self.embedder.supports_batch() {
                self.embedder.embed_batch(batch_texts).await?
            } else {
                // Remote API takes one text per request.
                let mut out = Vec::with_capacity(batch_texts.len());
                for text in batch_texts {
                    out.push(self.embedder.embed(text).await?);
                }
                out
            };

            collection
                .add_batch(
                    all_ids[written..end].to_vec(),
                    batch_texts.to_vec(),
                    embeddings,
                    all_metadatas[written..end].to_vec(),
                )
                .await?;

            written = end;
            log::info!("Indexed {written}/{total} chunks");
        }

        Ok(IndexStats {
            documents: documents.len(),
            chunks: total,
            skipped: false,
            time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
