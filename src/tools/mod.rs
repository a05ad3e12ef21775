//! Tool layer consumed by an external agent runtime
//!
//! Provides:
//! - `lookup_knowledge`: knowledge base search as a tool call
//! - Tool registry with JSON schemas
//! - Tool runtime coordinator

pub mod types;
pub mod registry;
pub mod lookup;
pub mod runtime;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::Result;

// Re-export commonly used types
pub use types::{ToolResult, ToolSchema, ToolStats};
pub use registry::ToolRegistry;
pub use lookup::{LookupKnowledgeTool, LOOKUP_KNOWLEDGE};
pub use runtime::ToolRuntime;

/// A callable tool.
///
/// Domain failures (bad arguments, a search that could not run) are
/// reported as a failed [`ToolResult`]; `Err` is reserved for the runtime
/// itself breaking.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn schema(&self) -> ToolSchema;

    async fn execute(&self, args: &Value) -> Result<ToolResult>;
}
