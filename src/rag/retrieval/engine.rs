// Retrieval Engine: embed a fixed knowledge base, rank it against queries
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::embedding::TextEncoder;
use crate::errors::{RagError, Result};
use crate::index::{FlatL2Index, VectorIndex};
use crate::knowledge::validate_documents;
use crate::telemetry::{TelemetryCollector, TelemetryEvent};

/// Number of documents returned when the caller does not ask for a count
pub const DEFAULT_TOP_K: usize = 3;

/// A document selected by a search, with its distance to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDocument {
    /// Position of the document in the knowledge base
    pub index: usize,
    pub text: String,
    /// Squared L2 distance between query and document embeddings
    pub distance: f32,
}

/// Join ranked documents into one line per result, best first
pub fn format_results(results: &[RankedDocument]) -> String {
    results
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builder for a [`RetrievalEngine`] with a custom index or telemetry
pub struct EngineBuilder {
    encoder: Arc<dyn TextEncoder>,
    index: Option<Box<dyn VectorIndex>>,
    telemetry: Option<TelemetryCollector>,
}

impl EngineBuilder {
    /// Start from an encoder; the index defaults to [`FlatL2Index`]
    pub fn new(encoder: Arc<dyn TextEncoder>) -> Self {
        Self {
            encoder,
            index: None,
            telemetry: None,
        }
    }

    /// Use a different (empty) index implementation
    pub fn index(mut self, index: Box<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Record index and search events into `telemetry`
    pub fn telemetry(mut self, telemetry: TelemetryCollector) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Encode every document in order and build the index.
    ///
    /// # Errors
    /// - `Configuration` when `documents` is empty or holds a blank entry,
    ///   or the index does not fit the encoder
    /// - `Encoding` when any document cannot be embedded
    pub fn build(self, documents: Vec<String>) -> Result<RetrievalEngine> {
        validate_documents(&documents)?;

        let encoder = self.encoder;
        let dimension = encoder.dimension();
        let mut index = self
            .index
            .unwrap_or_else(|| -> Box<dyn VectorIndex> {
                Box::new(FlatL2Index::with_capacity(dimension, documents.len()))
            });

        if index.dimension() != dimension {
            return Err(RagError::Configuration(format!(
                "index dimension {} does not match encoder dimension {}",
                index.dimension(),
                dimension
            )));
        }
        if !index.is_empty() {
            return Err(RagError::Configuration(
                "index must be empty before building".to_string(),
            ));
        }

        let start = Instant::now();
        let texts: Vec<&str> = documents.iter().map(String::as_str).collect();
        let embeddings = encoder
            .encode_batch(&texts)
            .map_err(|e| as_encoding_error(encoder.as_ref(), e))?;

        if embeddings.len() != documents.len() {
            return Err(RagError::encoding(
                encoder.name(),
                format!(
                    "encoder returned {} vectors for {} documents",
                    embeddings.len(),
                    documents.len()
                ),
            ));
        }

        for (position, embedding) in embeddings.into_iter().enumerate() {
            if embedding.len() != dimension {
                return Err(RagError::encoding(
                    encoder.name(),
                    format!(
                        "document {} encoded to {} dimensions, expected {}",
                        position,
                        embedding.len(),
                        dimension
                    ),
                ));
            }

            let slot = index.add(embedding)?;
            if slot != position {
                return Err(RagError::Configuration(format!(
                    "index assigned slot {} to document {}",
                    slot, position
                )));
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            documents = documents.len(),
            dimension,
            encoder = encoder.name(),
            duration_ms,
            "RAG index built with {} documents",
            documents.len()
        );

        if let Some(telemetry) = &self.telemetry {
            telemetry.record(TelemetryEvent::IndexBuilt {
                documents: documents.len(),
                dimension,
                duration_ms,
                timestamp: Instant::now(),
            });
        }

        Ok(RetrievalEngine {
            encoder,
            index,
            documents,
            telemetry: self.telemetry,
        })
    }
}

fn as_encoding_error(encoder: &dyn TextEncoder, err: RagError) -> RagError {
    match err {
        RagError::Encoding { .. } => err,
        other => RagError::encoding(encoder.name(), other),
    }
}

/// Retrieval engine for semantic search over a fixed knowledge base.
///
/// Built once, then read-only: slot `i` of the index always holds the
/// embedding of `documents[i]`, and nothing is added or removed afterwards.
/// The engine is `Send + Sync`, so an `Arc<RetrievalEngine>` can serve
/// concurrent searches without locking.
pub struct RetrievalEngine {
    encoder: Arc<dyn TextEncoder>,
    index: Box<dyn VectorIndex>,
    documents: Vec<String>,
    telemetry: Option<TelemetryCollector>,
}

impl RetrievalEngine {
    /// Build an engine over `documents` with a flat L2 index
    pub fn initialize(documents: Vec<String>, encoder: Arc<dyn TextEncoder>) -> Result<Self> {
        EngineBuilder::new(encoder).build(documents)
    }

    /// Build an engine over `documents` with the given empty index
    pub fn with_index(
        documents: Vec<String>,
        encoder: Arc<dyn TextEncoder>,
        index: Box<dyn VectorIndex>,
    ) -> Result<Self> {
        EngineBuilder::new(encoder).index(index).build(documents)
    }

    /// Search and join the results, one document per line, best first
    pub fn search(&self, query: &str, k: usize) -> Result<String> {
        Ok(format_results(&self.search_ranked(query, k)?))
    }

    /// Search with [`DEFAULT_TOP_K`]
    pub fn search_default(&self, query: &str) -> Result<String> {
        self.search(query, DEFAULT_TOP_K)
    }

    /// Search and return structured results.
    ///
    /// `k` larger than the knowledge base is clamped to its size.
    ///
    /// # Errors
    /// - `InvalidQuery` for a blank query or `k == 0`
    /// - `Encoding` when the query cannot be embedded
    pub fn search_ranked(&self, query: &str, k: usize) -> Result<Vec<RankedDocument>> {
        let start = Instant::now();
        info!(query = %query, k = k, "RAG search triggered");
        self.record(TelemetryEvent::SearchStarted {
            query: query.to_string(),
            timestamp: Instant::now(),
        });

        let outcome = self.rank(query, k);

        let duration_ms = start.elapsed().as_millis() as u64;
        match &outcome {
            Ok(results) => debug!(results = results.len(), duration_ms, "RAG search complete"),
            Err(e) => warn!(error = %e, "RAG search failed"),
        }
        self.record(TelemetryEvent::SearchCompleted {
            results: outcome.as_ref().map(Vec::len).unwrap_or(0),
            duration_ms,
            success: outcome.is_ok(),
            timestamp: Instant::now(),
        });

        outcome
    }

    fn rank(&self, query: &str, k: usize) -> Result<Vec<RankedDocument>> {
        if query.trim().is_empty() {
            return Err(RagError::InvalidQuery("query must not be empty".to_string()));
        }
        if k == 0 {
            return Err(RagError::InvalidQuery("k must be at least 1".to_string()));
        }
        let k = k.min(self.documents.len());

        let embedding = self
            .encoder
            .encode(query)
            .map_err(|e| as_encoding_error(self.encoder.as_ref(), e))?;
        if embedding.len() != self.index.dimension() {
            return Err(RagError::encoding(
                self.encoder.name(),
                format!(
                    "query encoded to {} dimensions, index expects {}",
                    embedding.len(),
                    self.index.dimension()
                ),
            ));
        }

        let neighbors = self.index.nearest_neighbors(&embedding, k)?;

        let mut seen = HashSet::with_capacity(k);
        let mut ranked = Vec::with_capacity(k);
        for neighbor in neighbors {
            let Some(text) = self.documents.get(neighbor.slot) else {
                warn!(
                    slot = neighbor.slot,
                    documents = self.documents.len(),
                    "Index returned a slot with no document; skipping"
                );
                self.record(TelemetryEvent::SlotSkipped {
                    slot: neighbor.slot,
                    timestamp: Instant::now(),
                });
                continue;
            };

            if !seen.insert(neighbor.slot) {
                warn!(slot = neighbor.slot, "Index returned a duplicate slot; skipping");
                continue;
            }

            ranked.push(RankedDocument {
                index: neighbor.slot,
                text: text.clone(),
                distance: neighbor.distance,
            });
            if ranked.len() == k {
                break;
            }
        }

        Ok(ranked)
    }

    fn record(&self, event: TelemetryEvent) {
        if let Some(telemetry) = &self.telemetry {
            telemetry.record(event);
        }
    }

    /// Number of indexed documents (always at least one)
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The knowledge base, in index order
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Embedding dimension shared by the encoder and index
    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    pub fn encoder_name(&self) -> &str {
        self.encoder.name()
    }
}

impl fmt::Debug for RetrievalEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrievalEngine")
            .field("encoder", &self.encoder.name())
            .field("dimension", &self.index.dimension())
            .field("documents", &self.documents.len())
            .finish()
    }
}
