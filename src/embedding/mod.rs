//! Text encoders
//!
//! An encoder turns a string into a fixed-length vector. The retrieval
//! engine only depends on the [`TextEncoder`] trait, so the model behind it
//! can be swapped without touching retrieval logic.
//!
//! Components:
//! - Sentence encoder: BERT sentence embeddings via Candle
//! - Hashing encoder: deterministic lexical vectors, no model download

pub mod engine;
pub mod hashing;

pub use engine::{SentenceEncoder, SentenceEncoderOptions};
pub use hashing::HashingEncoder;

use crate::errors::{RagError, Result};

/// A capability that maps text to vectors of a fixed dimension.
///
/// Implementations must be deterministic for a given input and safe to call
/// from several threads at once; the engine never mutates them after
/// construction.
pub trait TextEncoder: Send + Sync {
    /// Encode a batch of texts, preserving input order
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Vector length produced by this encoder
    fn dimension(&self) -> usize;

    /// Human-readable encoder name, used in logs and errors
    fn name(&self) -> &str;

    /// Encode a single text
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.encode_batch(&[text])?
            .pop()
            .ok_or_else(|| RagError::encoding(self.name(), "encoder returned no vector"))
    }
}
