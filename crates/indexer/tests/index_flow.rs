use examscope_chunker::ChunkerConfig;
use examscope_extract::Document;
use examscope_indexer::DocumentIndexer;
use examscope_store::{CollectionStore, Embedder, EmbeddingConfig, DEFAULT_COLLECTION_NAME};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const DIM: usize = 32;

async fn stub_embedder() -> Embedder {
    Embedder::new(EmbeddingConfig::Stub { dimension: DIM })
        .await
        .expect("stub embedder")
}

fn doc(filename: &str, len: usize) -> Document {
    let text: String = ('a'..='z').cycle().take(len).collect();
    Document::new(filename, text, 1)
}

#[tokio::test]
async fn chunk_ids_follow_filename_and_index() {
    let db = TempDir::new().unwrap();
    let embedder = stub_embedder().await;
    let indexer = DocumentIndexer::with_chunker_config(
        db.path(),
        embedder,
        ChunkerConfig {
            chunk_size: 1000,
            chunk_overlap: 200,
        },
    )
    .unwrap();

    // 2500 chars with size 1000 / overlap 200 gives windows at
    // [0,1000), [800,1800), [1600,2500).
    let stats = indexer
        .index_corpus(&[doc("doc.pdf", 2500)], false)
        .await
        .unwrap();
    assert_eq!(stats.documents, 1);
    assert_eq!(stats.chunks, 3);
    assert!(!stats.skipped);

    let collection = CollectionStore::new(db.path())
        .get(DEFAULT_COLLECTION_NAME)
        .await
        .unwrap();
    assert_eq!(
        collection.ids(),
        vec![
            "doc.pdf_0".to_string(),
            "doc.pdf_1".to_string(),
            "doc.pdf_2".to_string(),
        ]
    );
}

#[tokio::test]
async fn second_run_is_an_idempotent_no_op() {
    let db = TempDir::new().unwrap();
    let embedder = stub_embedder().await;
    let indexer = DocumentIndexer::new(db.path(), embedder).unwrap();
    let docs = vec![doc("a.pdf", 2500), doc("b.pdf", 500)];

    let first = indexer.index_corpus(&docs, false).await.unwrap();
    assert!(!first.skipped);
    assert_eq!(first.chunks, 4);

    let second = indexer.index_corpus(&docs, false).await.unwrap();
    assert!(second.skipped);
    assert_eq!(second.chunks, 0);

    let collection = CollectionStore::new(db.path())
        .get(DEFAULT_COLLECTION_NAME)
        .await
        .unwrap();
    assert_eq!(collection.count(), 4);

    let mut ids = collection.ids();
    let before = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), before, "duplicate chunk ids after re-run");
}

#[tokio::test]
async fn skip_check_is_count_only() {
    // Documented limitation: a changed corpus with a populated collection
    // is not re-indexed without a rebuild.
    let db = TempDir::new().unwrap();
    let embedder = stub_embedder().await;
    let indexer = DocumentIndexer::new(db.path(), embedder).unwrap();

    indexer
        .index_corpus(&[doc("old.pdf", 1200)], false)
        .await
        .unwrap();
    let stats = indexer
        .index_corpus(&[doc("new.pdf", 1200)], false)
        .await
        .unwrap();
    assert!(stats.skipped);

    let collection = CollectionStore::new(db.path())
        .get(DEFAULT_COLLECTION_NAME)
        .await
        .unwrap();
    assert!(collection.ids().iter().all(|id| id.starts_with("old.pdf")));
}

#[tokio::test]
async fn rebuild_replaces_stale_chunks() {
    let db = TempDir::new().unwrap();
    let embedder = stub_embedder().await;
    let indexer = DocumentIndexer::new(db.path(), embedder).unwrap();

    indexer
        .index_corpus(&[doc("a.pdf", 2500), doc("stale.pdf", 600)], false)
        .await
        .unwrap();

    let stats = indexer
        .index_corpus(&[doc("a.pdf", 1200)], true)
        .await
        .unwrap();
    assert!(!stats.skipped);
    assert_eq!(stats.chunks, 2);

    let collection = CollectionStore::new(db.path())
        .get(DEFAULT_COLLECTION_NAME)
        .await
        .unwrap();
    assert_eq!(
        collection.ids(),
        vec!["a.pdf_0".to_string(), "a.pdf_1".to_string()]
    );
}

#[tokio::test]
async fn failed_rebuild_does_not_leave_a_stale_collection() {
    let db = TempDir::new().unwrap();
    let embedder = stub_embedder().await;
    let indexer = DocumentIndexer::new(db.path(), embedder).unwrap();

    indexer
        .index_corpus(&[doc("old.pdf", 1200)], false)
        .await
        .unwrap();

    // The collection is dropped before extraction, so a corrupt source must
    // not leave the prior chunks behind for a later count-check run to reuse.
    let src = TempDir::new().unwrap();
    std::fs::write(src.path().join("broken.pdf"), b"%PDF-1.4 garbage").unwrap();
    indexer.index_documents(src.path(), true).await.unwrap_err();

    let err = CollectionStore::new(db.path())
        .get(DEFAULT_COLLECTION_NAME)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        examscope_store::VectorStoreError::CollectionNotFound(_)
    ));
}

#[tokio::test]
async fn rebuild_works_when_collection_is_absent() {
    let db = TempDir::new().unwrap();
    let embedder = stub_embedder().await;
    let indexer = DocumentIndexer::new(db.path(), embedder).unwrap();

    let stats = indexer.index_corpus(&[doc("a.pdf", 100)], true).await.unwrap();
    assert_eq!(stats.chunks, 1);
}

#[tokio::test]
async fn empty_source_directory_writes_nothing() {
    let db = TempDir::new().unwrap();
    let src = TempDir::new().unwrap();
    let embedder = stub_embedder().await;
    let indexer = DocumentIndexer::new(db.path(), embedder).unwrap();

    let stats = indexer.index_documents(src.path(), false).await.unwrap();
    assert_eq!(stats.documents, 0);
    assert_eq!(stats.chunks, 0);

    // No collection file should exist: zero store writes happened.
    let err = CollectionStore::new(db.path())
        .get(DEFAULT_COLLECTION_NAME)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        examscope_store::VectorStoreError::CollectionNotFound(_)
    ));
}

#[tokio::test]
async fn corpus_larger_than_one_batch_is_fully_indexed() {
    let db = TempDir::new().unwrap();
    let embedder = stub_embedder().await;
    let indexer = DocumentIndexer::with_chunker_config(
        db.path(),
        embedder,
        ChunkerConfig {
            chunk_size: 50,
            chunk_overlap: 10,
        },
    )
    .unwrap();

    // 111 chunks: 40-char step over ~4400 chars, spanning two batches.
    let stats = indexer
        .index_corpus(&[doc("big.pdf", 4450)], false)
        .await
        .unwrap();
    assert!(stats.chunks > examscope_indexer::EMBED_BATCH_SIZE);

    let collection = CollectionStore::new(db.path())
        .get(DEFAULT_COLLECTION_NAME)
        .await
        .unwrap();
    assert_eq!(collection.count(), stats.chunks);
}
