use crate::error::{Result, VectorStoreError};
use crate::local::OrtBackend;
use crate::remote::RemoteEmbedder;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::spawn_blocking;

const DEFAULT_REMOTE_MODEL: &str = "openai/text-embedding-3-large";
const DEFAULT_REMOTE_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_DIMENSION: usize = 384;
const REMOTE_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for the in-process ONNX embedding model
#[derive(Debug, Clone)]
pub struct LocalModelConfig {
    /// Directory holding `model.onnx` and `tokenizer.json`
    pub model_dir: PathBuf,

    /// Output embedding dimension
    pub dimension: usize,

    /// Tokenizer truncation length
    pub max_length: usize,

    /// Maximum rows per forward pass
    pub max_batch: usize,
}

impl LocalModelConfig {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            dimension: DEFAULT_DIMENSION,
            max_length: 512,
            max_batch: 32,
        }
    }
}

/// Which embedding backend to use, decided once at construction.
///
/// The variant is explicit configuration; nothing is inferred from model
/// name patterns at call sites.
#[derive(Debug, Clone)]
pub enum EmbeddingConfig {
    /// OpenAI-compatible `/embeddings` endpoint, one request per text
    Remote {
        api_key: String,
        base_url: String,
        model: String,
    },

    /// In-process ONNX model with true batched inference
    Local(LocalModelConfig),

    /// Deterministic hash-based vectors for tests
    Stub { dimension: usize },
}

impl EmbeddingConfig {
    /// Resolve the backend from `EXAMSCOPE_EMBEDDING_MODE` (`remote`,
    /// `local`, or `stub`; default `remote`).
    pub fn from_env() -> Result<Self> {
        let mode = env::var("EXAMSCOPE_EMBEDDING_MODE")
            .unwrap_or_else(|_| "remote".to_string())
            .to_ascii_lowercase();

        match mode.as_str() {
            "remote" => {
                let api_key = env::var("OPENROUTER_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| {
                        VectorStoreError::EmbeddingError(
                            "OPENROUTER_API_KEY is required for remote embeddings".to_string(),
                        )
                    })?;
                let base_url = env::var("OPENROUTER_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_REMOTE_BASE_URL.to_string());
                let model = env::var("EXAMSCOPE_EMBEDDING_MODEL")
                    .unwrap_or_else(|_| DEFAULT_REMOTE_MODEL.to_string());
                Ok(Self::Remote {
                    api_key,
                    base_url,
                    model,
                })
            }
            "local" => {
                let model_dir = env::var("EXAMSCOPE_MODEL_DIR").map_err(|_| {
                    VectorStoreError::EmbeddingError(
                        "EXAMSCOPE_MODEL_DIR is required for local embeddings".to_string(),
                    )
                })?;
                let mut config = LocalModelConfig::new(model_dir);
                config.dimension = dimension_from_env()?;
                Ok(Self::Local(config))
            }
            "stub" => Ok(Self::Stub {
                dimension: dimension_from_env()?,
            }),
            other => Err(VectorStoreError::EmbeddingError(format!(
                "Unsupported EXAMSCOPE_EMBEDDING_MODE '{other}' (expected 'remote', 'local' or 'stub')"
            ))),
        }
    }
}

fn dimension_from_env() -> Result<usize> {
    match env::var("EXAMSCOPE_EMBEDDING_DIM") {
        Ok(raw) => raw.parse().map_err(|_| {
            VectorStoreError::EmbeddingError(format!(
                "EXAMSCOPE_EMBEDDING_DIM must be a positive integer, got '{raw}'"
            ))
        }),
        Err(_) => Ok(DEFAULT_DIMENSION),
    }
}

#[derive(Clone)]
enum Backend {
    Remote(RemoteEmbedder),
    Local(Arc<OrtBackend>),
    Stub(StubBackend),
}

/// Text-to-vector capability over a fixed backend.
///
/// Cloning is cheap: the local backend is shared behind an `Arc` and the
/// remote backend clones its HTTP client handle.
#[derive(Clone)]
pub struct Embedder {
    backend: Backend,
}

impl Embedder {
    /// Construct the configured backend. Local model loading happens off
    /// the async runtime.
    pub async fn new(config: EmbeddingConfig) -> Result<Self> {
        let backend = match config {
            EmbeddingConfig::Remote {
                api_key,
                base_url,
                model,
            } => {
                log::info!("Using remote embeddings: {model}");
                Backend::Remote(RemoteEmbedder::new(
                    &api_key,
                    &base_url,
                    model,
                    REMOTE_TIMEOUT,
                )?)
            }
            EmbeddingConfig::Local(local) => {
                log::info!(
                    "Using local embeddings from {} (dim {})",
                    local.model_dir.display(),
                    local.dimension
                );
                let backend = spawn_blocking(move || OrtBackend::load(&local))
                    .await
                    .map_err(|e| {
                        VectorStoreError::EmbeddingError(format!("Model load task failed: {e}"))
                    })??;
                Backend::Local(Arc::new(backend))
            }
            EmbeddingConfig::Stub { dimension } => {
                log::info!("Using stub embeddings (dim {dimension})");
                Backend::Stub(StubBackend { dimension })
            }
        };

        Ok(Self { backend })
    }

    /// Whether `embed_batch` is a real batched call.
    ///
    /// The remote API takes one text per request, so its batch mode is just
    /// a sequential loop; the indexer uses this to decide how to log and
    /// size its work.
    #[must_use]
    pub const fn supports_batch(&self) -> bool {
        !matches!(self.backend, Backend::Remote(_))
    }

    /// Embedding dimension, when the backend knows it up front
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        match &self.backend {
            Backend::Remote(_) => None,
            Backend::Local(local) => Some(local.dimension()),
            Backend::Stub(stub) => Some(stub.dimension),
        }
    }

    /// Embed a single text
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match &self.backend {
            Backend::Remote(remote) => remote.embed(text).await,
            Backend::Local(_) => {
                let mut vectors = self.embed_batch(&[text.to_string()]).await?;
                vectors.pop().ok_or_else(|| {
                    VectorStoreError::EmbeddingError("Model returned no embedding".to_string())
                })
            }
            Backend::Stub(stub) => Ok(stub_embed(text, stub.dimension)),
        }
    }

    /// Embed many texts. Batched for local and stub backends, sequential
    /// per-item requests for the remote backend.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        match &self.backend {
            Backend::Remote(remote) => {
                let mut vectors = Vec::with_capacity(texts.len());
                for text in texts {
                    vectors.push(remote.embed(text).await?);
                }
                Ok(vectors)
            }
            Backend::Local(local) => {
                let local = Arc::clone(local);
                let owned = texts.to_vec();
                spawn_blocking(move || local.embed_batch_blocking(&owned))
                    .await
                    .map_err(|e| {
                        VectorStoreError::EmbeddingError(format!("Embedding task failed: {e}"))
                    })?
            }
            Backend::Stub(stub) => Ok(texts
                .iter()
                .map(|text| stub_embed(text, stub.dimension))
                .collect()),
        }
    }

    /// Cosine similarity between two vectors
    #[must_use]
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a * norm_b)
    }
}

#[derive(Clone)]
struct StubBackend {
    dimension: usize,
}

pub(crate) fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}

fn stub_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut state =
        fnv1a_64(text.as_bytes()) ^ (dimension as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut vec = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let bits = splitmix64(&mut state);
        let high = (bits >> 32) as u32;
        let mantissa = high >> 9;
        let unit = f32::from_bits(0x3f80_0000 | mantissa) - 1.0;
        vec.push(unit.mul_add(2.0, -1.0));
    }
    normalize(&mut vec);
    vec
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_embeddings_are_deterministic_and_normalized() {
        let embedder = Embedder::new(EmbeddingConfig::Stub { dimension: 64 })
            .await
            .unwrap();

        let a = embedder.embed("linear algebra").await.unwrap();
        let b = embedder.embed("linear algebra").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn stub_batch_matches_single_calls() {
        let embedder = Embedder::new(EmbeddingConfig::Stub { dimension: 16 })
            .await
            .unwrap();
        assert!(embedder.supports_batch());

        let texts = vec!["alpha".to_string(), "beta".to_string()];
        let batch = embedder.embed_batch(&texts).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], embedder.embed("alpha").await.unwrap());
        assert_eq!(batch[1], embedder.embed("beta").await.unwrap());
    }

    #[test]
    fn cosine_similarity_basics() {
        assert!((Embedder::cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(Embedder::cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(Embedder::cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn distinct_texts_get_distinct_vectors() {
        assert_ne!(stub_embed("one", 32), stub_embed("two", 32));
    }
}
