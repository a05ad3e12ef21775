//! Hashing encoder
//!
//! Feature-hashed bag of words: every lower-cased word token is hashed with
//! FNV-1a into one of `dimension` buckets, counts are accumulated and the
//! vector is scaled to unit length. It needs no model files, is fully
//! deterministic, and gives lexical (not semantic) similarity.

use crate::embedding::TextEncoder;
use crate::errors::{RagError, Result};

pub const DEFAULT_HASHING_DIMENSION: usize = 2048;

const ENCODER_NAME: &str = "hashing-fnv1a";
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Words too common to carry meaning in a knowledge lookup
const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does", "for", "from",
    "has", "have", "how", "i", "in", "is", "it", "its", "me", "of", "on", "or", "tell", "that",
    "the", "this", "to", "was", "what", "when", "where", "which", "who", "why", "will", "with",
    "you", "your",
];

/// Deterministic lexical encoder
#[derive(Debug, Clone)]
pub struct HashingEncoder {
    dimension: usize,
}

impl HashingEncoder {
    /// Create encoder with the given number of buckets
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(RagError::Configuration(
                "hashing dimension must be greater than 0".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    /// Split text into lower-cased word tokens, dropping stop words.
    ///
    /// Text made only of stop words keeps them, so it still gets a
    /// non-zero vector.
    pub fn tokenize(text: &str) -> Vec<String> {
        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect();

        let content: Vec<String> = tokens
            .iter()
            .filter(|t| !STOP_WORDS.contains(&t.as_str()))
            .cloned()
            .collect();

        if content.is_empty() {
            tokens
        } else {
            content
        }
    }

    fn bucket(&self, token: &str) -> usize {
        let hash = token.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        });
        (hash % self.dimension as u64) as usize
    }

    fn encode_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in Self::tokenize(text) {
            vector[self.bucket(&token)] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Default for HashingEncoder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_HASHING_DIMENSION,
        }
    }
}

impl TextEncoder for HashingEncoder {
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.encode_one(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        ENCODER_NAME
    }
}
