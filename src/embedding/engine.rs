// Sentence encoder - local BERT sentence embeddings via Candle
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::{Encoding, Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::embedding::TextEncoder;
use crate::errors::{RagError, Result};

pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_REVISION: &str = "main";
pub const DEFAULT_DIMENSION: usize = 384;
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 256;

/// Where to fetch the model from and how to run it
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceEncoderOptions {
    /// HuggingFace Hub repository id
    pub model_id: String,
    /// Git revision of the repository (branch, tag or commit)
    pub revision: String,
    /// Expected embedding dimension
    pub dimension: usize,
    /// Tokens beyond this length are truncated
    pub max_sequence_length: usize,
}

impl Default for SentenceEncoderOptions {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            dimension: DEFAULT_DIMENSION,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        }
    }
}

/// Sentence encoder using a BERT model via Candle.
///
/// Output vectors are the attention-masked mean of the last hidden state,
/// scaled to unit length, which matches how sentence-transformers models
/// such as all-MiniLM-L6-v2 are meant to be pooled.
pub struct SentenceEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    options: SentenceEncoderOptions,
}

impl SentenceEncoder {
    /// Create encoder with the default model (downloads on first use)
    pub fn new() -> Result<Self> {
        Self::from_options(SentenceEncoderOptions::default())
    }

    /// Create encoder from explicit options
    pub fn from_options(options: SentenceEncoderOptions) -> Result<Self> {
        let name = options.model_id.clone();
        let fail = |context: &str, err: &dyn std::fmt::Display| {
            RagError::encoding(&name, format!("{}: {}", context, err))
        };

        info!(model = %options.model_id, revision = %options.revision, "Loading embedding model");
        let device = Device::Cpu;

        let api = Api::new().map_err(|e| fail("Failed to create HuggingFace API client", &e))?;
        let repo = api.repo(Repo::with_revision(
            options.model_id.clone(),
            RepoType::Model,
            options.revision.clone(),
        ));

        let config_path = repo
            .get("config.json")
            .map_err(|e| fail("Failed to download model config", &e))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| fail("Failed to download tokenizer", &e))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| fail("Failed to download model weights", &e))?;

        let config_contents = std::fs::read_to_string(config_path)
            .map_err(|e| fail("Failed to read model config", &e))?;
        let config: Config = serde_json::from_str(&config_contents)
            .map_err(|e| fail("Failed to parse model config", &e))?;

        let mut tokenizer =
            Tokenizer::from_file(tokenizer_path).map_err(|e| fail("Failed to load tokenizer", &e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: options.max_sequence_length,
                ..Default::default()
            }))
            .map_err(|e| fail("Failed to configure truncation", &e))?;
        tokenizer.with_padding(None);

        // SAFETY: the weights file is owned by the hf-hub cache and not modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| fail("Failed to load model weights", &e))?
        };
        let model = BertModel::load(vb, &config).map_err(|e| fail("Failed to create BERT model", &e))?;

        Ok(Self {
            model,
            tokenizer,
            device,
            options,
        })
    }

    /// Options this encoder was built from
    pub fn options(&self) -> &SentenceEncoderOptions {
        &self.options
    }

    fn forward(&self, encodings: &[Encoding]) -> candle_core::Result<Vec<Vec<f32>>> {
        let batch_size = encodings.len();
        let max_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);

        // Pad sequences
        let mut flat_ids = vec![0u32; batch_size * max_len];
        let mut flat_mask = vec![0u32; batch_size * max_len];
        for (row, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let start = row * max_len;
            flat_ids[start..start + ids.len()].copy_from_slice(ids);
            flat_mask[start..start + mask.len()].copy_from_slice(mask);
        }

        let token_ids = Tensor::from_vec(flat_ids, (batch_size, max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(flat_mask, (batch_size, max_len), &self.device)?;
        let token_type_ids = token_ids.zeros_like()?;

        let hidden = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = Self::mean_pool(&hidden, &attention_mask)?;
        Self::l2_normalize(&pooled)?.to_vec2::<f32>()
    }

    /// Mean pooling with attention mask
    fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
        let mask = attention_mask
            .to_dtype(hidden.dtype())?
            .unsqueeze(2)?
            .broadcast_as(hidden.shape())?;

        let summed = (hidden * &mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9f32, f32::MAX)?;
        summed.broadcast_div(&counts)
    }

    fn l2_normalize(pooled: &Tensor) -> candle_core::Result<Tensor> {
        let norms = pooled
            .sqr()?
            .sum_keepdim(1)?
            .sqrt()?
            .clamp(1e-12f32, f32::MAX)?;
        pooled.broadcast_div(&norms)
    }
}

impl TextEncoder for SentenceEncoder {
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| RagError::encoding(self.name(), format!("Tokenization failed: {}", e)))?;

        let vectors = self
            .forward(&encodings)
            .map_err(|e| RagError::encoding(self.name(), format!("Forward pass failed: {}", e)))?;

        if let Some(bad) = vectors.iter().find(|v| v.len() != self.options.dimension) {
            return Err(RagError::encoding(
                self.name(),
                format!(
                    "model produced {} dimensions, expected {}",
                    bad.len(),
                    self.options.dimension
                ),
            ));
        }

        debug!(batch = texts.len(), "Encoded batch");
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.options.dimension
    }

    fn name(&self) -> &str {
        &self.options.model_id
    }
}
