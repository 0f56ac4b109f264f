use crate::embedding::{normalize, LocalModelConfig};
use crate::error::{Result, VectorStoreError};
use ndarray::{Array, Axis, Ix2, Ix3};
use ort::session::{builder::GraphOptimizationLevel, Session, SessionInputs};
use ort::value::{DynTensor, Tensor};
use std::collections::HashMap;
use std::sync::Mutex;
use tokenizers::{Encoding, PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

const MODEL_FILE: &str = "model.onnx";
const TOKENIZER_FILE: &str = "tokenizer.json";

/// In-process ONNX embedding backend: tokenize, forward pass, mean pool,
/// L2 normalize. The session is behind a mutex; inference runs on blocking
/// threads only.
pub(crate) struct OrtBackend {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dimension: usize,
    max_length: usize,
    max_batch: usize,
}

impl OrtBackend {
    pub(crate) fn load(config: &LocalModelConfig) -> Result<Self> {
        let model_path = config.model_dir.join(MODEL_FILE);
        let tokenizer_path = config.model_dir.join(TOKENIZER_FILE);
        if !model_path.exists() || !tokenizer_path.exists() {
            return Err(VectorStoreError::EmbeddingError(format!(
                "Model files missing. Expected ONNX at {} and tokenizer at {} (set EXAMSCOPE_MODEL_DIR to a directory holding both).",
                model_path.display(),
                tokenizer_path.display(),
            )));
        }

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| VectorStoreError::EmbeddingError(format!("Tokenizer load failed: {e}")))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..PaddingParams::default()
        }));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_length,
                ..TruncationParams::default()
            }))
            .map_err(|e| {
                VectorStoreError::EmbeddingError(format!("Tokenizer truncation failed: {e}"))
            })?;

        let session = Session::builder()
            .map_err(|e| VectorStoreError::EmbeddingError(format!("{e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| {
                VectorStoreError::EmbeddingError(format!("Failed to set optimization level: {e}"))
            })?
            .commit_from_file(&model_path)
            .map_err(|e| {
                VectorStoreError::EmbeddingError(format!("Failed to load ONNX model: {e}"))
            })?;

        log::info!(
            "Loaded ONNX model from {} (dim {}, max_length {}, batch {})",
            config.model_dir.display(),
            config.dimension,
            config.max_length,
            config.max_batch
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            dimension: config.dimension,
            max_length: config.max_length,
            max_batch: config.max_batch,
        })
    }

    pub(crate) const fn dimension(&self) -> usize {
        self.dimension
    }

    pub(crate) fn embed_batch_blocking(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.max_batch) {
            let encodings = self
                .tokenizer
                .encode_batch(batch.to_vec(), true)
                .map_err(|e| {
                    VectorStoreError::EmbeddingError(format!("Tokenization failed: {e}"))
                })?;

            if encodings.is_empty() {
                continue;
            }

            let seq_len = encodings[0].len();
            if seq_len > self.max_length {
                return Err(VectorStoreError::EmbeddingError(format!(
                    "Tokenized length {} exceeds max_length {}",
                    seq_len, self.max_length
                )));
            }
            if encodings.iter().any(|e| e.len() != seq_len) {
                return Err(VectorStoreError::EmbeddingError(
                    "Inconsistent sequence lengths after padding".to_string(),
                ));
            }

            let (ids, masks, type_ids, mask_rows) = build_flat_tensors(&encodings, seq_len);

            let ids_array = Array::from_shape_vec((batch.len(), seq_len), ids)
                .map_err(|e| VectorStoreError::EmbeddingError(format!("IDs shape error: {e}")))?;
            let mask_array = Array::from_shape_vec((batch.len(), seq_len), masks)
                .map_err(|e| VectorStoreError::EmbeddingError(format!("Mask shape error: {e}")))?;
            let type_array = Array::from_shape_vec((batch.len(), seq_len), type_ids)
                .map_err(|e| VectorStoreError::EmbeddingError(format!("Types shape error: {e}")))?;

            let to_embedding_error = |e: &ort::Error| VectorStoreError::EmbeddingError(e.to_string());
            let ids_tensor = Tensor::from_array(ids_array.into_dyn())
                .map_err(|e| to_embedding_error(&e))?
                .upcast();
            let mask_tensor = Tensor::from_array(mask_array.into_dyn())
                .map_err(|e| to_embedding_error(&e))?
                .upcast();
            let type_tensor = Tensor::from_array(type_array.into_dyn())
                .map_err(|e| to_embedding_error(&e))?
                .upcast();

            let array = {
                let mut session = self.session.lock().map_err(|_| {
                    VectorStoreError::EmbeddingError("Failed to lock ONNX session".into())
                })?;

                let mut available: HashMap<String, DynTensor> = HashMap::new();
                available.insert("input_ids".to_string(), ids_tensor);
                available.insert("attention_mask".to_string(), mask_tensor);
                available.insert("token_type_ids".to_string(), type_tensor);

                let input_names: Vec<String> =
                    session.inputs.iter().map(|input| input.name.clone()).collect();
                let mut feed: HashMap<String, DynTensor> = HashMap::new();
                for key in input_names {
                    match available.remove(&key) {
                        Some(value) => {
                            feed.insert(key, value);
                        }
                        None => {
                            return Err(VectorStoreError::EmbeddingError(format!(
                                "Unsupported ONNX input '{key}'"
                            )));
                        }
                    }
                }

                let outputs = session.run(SessionInputs::from(feed)).map_err(|e| {
                    VectorStoreError::EmbeddingError(format!("ONNX forward failed: {e}"))
                })?;

                if outputs.len() == 0 {
                    return Err(VectorStoreError::EmbeddingError(
                        "ONNX returned no outputs".to_string(),
                    ));
                }

                outputs[0]
                    .try_extract_array::<f32>()
                    .map_err(|e| {
                        VectorStoreError::EmbeddingError(format!(
                            "Failed to decode ONNX output: {e}"
                        ))
                    })?
                    .to_owned()
            };

            results.extend(embeddings_from_output(array, &mask_rows, self.dimension)?);
        }

        Ok(results)
    }
}

fn embeddings_from_output(
    array: ndarray::ArrayD<f32>,
    mask_rows: &[Vec<i64>],
    expected_dimension: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut out = Vec::new();
    match array.ndim() {
        2 => {
            let embeddings = array
                .into_dimensionality::<Ix2>()
                .map_err(|e| VectorStoreError::EmbeddingError(format!("Bad output shape: {e}")))?;
            out.reserve(embeddings.len_of(Axis(0)));
            for row in embeddings.outer_iter() {
                let mut emb = row.to_owned().to_vec();
                ensure_dimension(&emb, expected_dimension)?;
                normalize(&mut emb);
                out.push(emb);
            }
        }
        3 => {
            let hidden = array
                .into_dimensionality::<Ix3>()
                .map_err(|e| VectorStoreError::EmbeddingError(format!("Bad output shape: {e}")))?;
            out.reserve(hidden.len_of(Axis(0)));
            for (idx, sample) in hidden.outer_iter().enumerate() {
                let attn = mask_rows
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| vec![1; sample.len_of(Axis(0))]);
                let mut emb = mean_pool(sample.view(), &attn);
                ensure_dimension(&emb, expected_dimension)?;
                normalize(&mut emb);
                out.push(emb);
            }
        }
        _ => {
            return Err(VectorStoreError::EmbeddingError(format!(
                "Unexpected ONNX output dims: {:?}",
                array.shape()
            )));
        }
    }
    Ok(out)
}

fn ensure_dimension(embedding: &[f32], expected: usize) -> Result<()> {
    if embedding.len() != expected {
        return Err(VectorStoreError::InvalidDimension {
            expected,
            actual: embedding.len(),
        });
    }
    Ok(())
}

fn mean_pool(sample: ndarray::ArrayView2<'_, f32>, mask: &[i64]) -> Vec<f32> {
    if sample.is_empty() {
        return vec![];
    }

    let hidden = sample.len_of(Axis(1));
    let mut sum = vec![0.0f32; hidden];
    let mut count = 0.0f32;

    for (token_idx, token) in sample.outer_iter().enumerate() {
        if *mask.get(token_idx).unwrap_or(&0) == 0 {
            continue;
        }
        count += 1.0;
        for (dim, value) in token.iter().enumerate() {
            sum[dim] += value;
        }
    }

    if count == 0.0 {
        return sum;
    }

    for value in &mut sum {
        *value /= count;
    }

    sum
}

fn build_flat_tensors(
    encodings: &[Encoding],
    seq_len: usize,
) -> (Vec<i64>, Vec<i64>, Vec<i64>, Vec<Vec<i64>>) {
    let mut ids = Vec::with_capacity(encodings.len() * seq_len);
    let mut masks = Vec::with_capacity(encodings.len() * seq_len);
    let mut type_ids = Vec::with_capacity(encodings.len() * seq_len);
    let mut mask_rows = Vec::with_capacity(encodings.len());

    for encoding in encodings {
        let encoding_ids = encoding.get_ids();
        let encoding_masks = encoding.get_attention_mask();
        let encoding_types = encoding.get_type_ids();

        for idx in 0..seq_len {
            ids.push(i64::from(*encoding_ids.get(idx).unwrap_or(&0)));
            masks.push(i64::from(*encoding_masks.get(idx).unwrap_or(&0)));
            type_ids.push(i64::from(*encoding_types.get(idx).unwrap_or(&0)));
        }

        mask_rows.push(
            encoding_masks
                .iter()
                .take(seq_len)
                .map(|v| i64::from(*v))
                .collect(),
        );
    }

    (ids, masks, type_ids, mask_rows)
}
