//! The `lookup_knowledge` tool
//!
//! Exposes the retrieval engine to an agent runtime. Search failures come
//! back as failed [`ToolResult`]s carrying the error text, so the runtime can
//! tell the user it could not find an answer instead of reading out nothing.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::errors::{RagError, Result};
use crate::rag::{EngineHandle, DEFAULT_TOP_K};
use crate::tools::types::{ToolResult, ToolSchema};
use crate::tools::Tool;

pub const LOOKUP_KNOWLEDGE: &str = "lookup_knowledge";

const DESCRIPTION: &str =
    "Search the knowledge base for technical questions about LiveKit, RAG, or this project.";

/// Knowledge lookup backed by the shared engine handle
#[derive(Debug, Clone)]
pub struct LookupKnowledgeTool {
    handle: Arc<EngineHandle>,
    default_k: usize,
}

impl LookupKnowledgeTool {
    /// Create tool returning [`DEFAULT_TOP_K`] documents per call
    pub fn new(handle: Arc<EngineHandle>) -> Self {
        Self::with_default_k(handle, DEFAULT_TOP_K)
    }

    /// Create tool with a custom default result count
    pub fn with_default_k(handle: Arc<EngineHandle>, default_k: usize) -> Self {
        Self {
            handle,
            default_k: default_k.max(1),
        }
    }

    /// JSON schema advertised to the language model
    pub fn tool_schema() -> ToolSchema {
        ToolSchema::new(
            LOOKUP_KNOWLEDGE,
            DESCRIPTION,
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The question or keywords to look up"
                    },
                    "k": {
                        "type": "integer",
                        "description": "Maximum number of passages to return",
                        "minimum": 1
                    }
                },
                "required": ["query"]
            }),
            true, // Read-only
        )
    }

    fn parse_args(&self, args: &Value) -> std::result::Result<(String, usize), String> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| "missing required 'query' parameter".to_string())?;

        let k = match args.get("k") {
            None | Some(Value::Null) => self.default_k,
            Some(value) => value
                .as_u64()
                .filter(|k| *k >= 1)
                .map(|k| k as usize)
                .ok_or_else(|| "'k' must be a positive integer".to_string())?,
        };

        Ok((query.to_string(), k))
    }
}

#[async_trait]
impl Tool for LookupKnowledgeTool {
    fn name(&self) -> &str {
        LOOKUP_KNOWLEDGE
    }

    fn schema(&self) -> ToolSchema {
        Self::tool_schema()
    }

    async fn execute(&self, args: &Value) -> Result<ToolResult> {
        let start = Instant::now();

        let (query, k) = match self.parse_args(args) {
            Ok(parsed) => parsed,
            Err(message) => {
                return Ok(ToolResult::failure(
                    LOOKUP_KNOWLEDGE.to_string(),
                    message,
                    start.elapsed(),
                ))
            }
        };

        info!("RAG Search: {}", query);

        let handle = Arc::clone(&self.handle);
        let outcome = tokio::task::spawn_blocking(move || handle.search(&query, k))
            .await
            .map_err(|e| RagError::Generic(format!("search task failed: {}", e)))?;

        Ok(match outcome {
            Ok(output) => ToolResult::success(LOOKUP_KNOWLEDGE.to_string(), output, start.elapsed()),
            Err(e) => {
                error!(error = %e, "lookup_knowledge failed");
                ToolResult::failure(LOOKUP_KNOWLEDGE.to_string(), e.to_string(), start.elapsed())
            }
        })
    }
}
