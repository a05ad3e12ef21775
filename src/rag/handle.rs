//! Shared slot for the process-wide retrieval engine
//!
//! The engine is built once at startup and handed to whatever needs it
//! through an `Arc<EngineHandle>`. Callers that reach the handle before a
//! successful build get `NotInitialized` instead of an empty index.

use std::sync::{Arc, OnceLock};

use crate::embedding::TextEncoder;
use crate::errors::{RagError, Result};
use crate::rag::retrieval::RetrievalEngine;

#[derive(Debug, Default)]
pub struct EngineHandle {
    engine: OnceLock<Arc<RetrievalEngine>>,
}

impl EngineHandle {
    /// Create an empty handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine and install it. On failure the handle stays empty.
    pub fn initialize(
        &self,
        documents: Vec<String>,
        encoder: Arc<dyn TextEncoder>,
    ) -> Result<Arc<RetrievalEngine>> {
        if self.is_initialized() {
            return Err(already_initialized());
        }
        let engine = RetrievalEngine::initialize(documents, encoder)?;
        self.install(engine)
    }

    /// Install an engine that was built elsewhere
    pub fn install(&self, engine: RetrievalEngine) -> Result<Arc<RetrievalEngine>> {
        let engine = Arc::new(engine);
        self.engine
            .set(Arc::clone(&engine))
            .map_err(|_| already_initialized())?;
        Ok(engine)
    }

    /// The installed engine
    pub fn engine(&self) -> Result<Arc<RetrievalEngine>> {
        self.engine.get().cloned().ok_or(RagError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.get().is_some()
    }

    /// Search through the installed engine
    pub fn search(&self, query: &str, k: usize) -> Result<String> {
        self.engine()?.search(query, k)
    }
}

fn already_initialized() -> RagError {
    RagError::Configuration("retrieval engine is already initialized".to_string())
}
