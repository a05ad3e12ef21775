//! Tool runtime coordinator
//!
//! Entry point for an agent runtime: dispatch a tool call by name, record
//! telemetry, and always hand back a [`ToolResult`].

use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{error, warn};

use crate::errors::Result;
use crate::rag::EngineHandle;
use crate::telemetry::{TelemetryCollector, TelemetryEvent};
use crate::tools::lookup::LookupKnowledgeTool;
use crate::tools::registry::ToolRegistry;
use crate::tools::types::{ToolResult, ToolStats};

/// Tool runtime coordinator
pub struct ToolRuntime {
    registry: ToolRegistry,
    telemetry: Option<TelemetryCollector>,
    stats: Mutex<ToolStats>,
}

impl ToolRuntime {
    /// Create a runtime with the given registry
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            telemetry: None,
            stats: Mutex::new(ToolStats::default()),
        }
    }

    /// Create a runtime exposing `lookup_knowledge` over `handle`
    pub fn with_knowledge(handle: Arc<EngineHandle>, default_k: usize) -> Self {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(LookupKnowledgeTool::with_default_k(handle, default_k)));
        Self::new(registry)
    }

    /// Record tool events into `telemetry`
    pub fn with_telemetry(mut self, telemetry: TelemetryCollector) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Execute tool asynchronously
    ///
    /// # Flow
    /// 1. Look the tool up in the registry
    /// 2. Run it
    /// 3. Turn a tool error into a failed result
    /// 4. Record stats and telemetry
    /// 5. Return the result to the agent runtime
    pub async fn execute(&self, tool: &str, args: &Value) -> Result<ToolResult> {
        let start = Instant::now();
        self.record(TelemetryEvent::ToolStarted {
            tool: tool.to_string(),
            timestamp: Instant::now(),
        });

        let result = match self.registry.get(tool) {
            Some(implementation) => match implementation.execute(args).await {
                Ok(result) => result,
                Err(e) => {
                    error!(tool = %tool, error = %e, "Tool execution failed");
                    ToolResult::failure(tool.to_string(), e.to_string(), start.elapsed())
                }
            },
            None => {
                warn!(tool = %tool, "Unknown tool requested");
                ToolResult::failure(
                    tool.to_string(),
                    format!("Unknown tool: {}", tool),
                    start.elapsed(),
                )
            }
        };

        self.record(TelemetryEvent::ToolCompleted {
            tool: tool.to_string(),
            duration_ms: result.duration_ms,
            success: result.success,
            timestamp: Instant::now(),
        });
        self.stats
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .record(&result);

        Ok(result)
    }

    fn record(&self, event: TelemetryEvent) {
        if let Some(telemetry) = &self.telemetry {
            telemetry.record(event);
        }
    }

    /// Get tool registry
    pub fn get_registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Get all tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.registry.tool_names()
    }

    /// Check if tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Execution statistics so far
    pub fn stats(&self) -> ToolStats {
        self.stats
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEncoder;
    use crate::errors::RagError;
    use crate::tools::{Tool, ToolSchema};
    use async_trait::async_trait;
    use serde_json::json;

    /// Tool whose runtime breaks on every call
    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &str {
            "broken"
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema::new("broken", "Always errors", json!({"type": "object"}), true)
        }

        async fn execute(&self, _args: &Value) -> Result<ToolResult> {
            Err(RagError::Generic("search task failed: worker panicked".to_string()))
        }
    }

    fn setup_runtime() -> (ToolRuntime, TelemetryCollector) {
        let handle = Arc::new(EngineHandle::new());
        handle
            .initialize(
                vec![
                    "Basil is a herb.".to_string(),
                    "RAG means Retrieval-Augmented Generation.".to_string(),
                ],
                Arc::new(HashingEncoder::default()),
            )
            .unwrap();
        let telemetry = TelemetryCollector::new();
        let runtime = ToolRuntime::with_knowledge(handle, 3).with_telemetry(telemetry.clone());
        (runtime, telemetry)
    }

    #[test]
    fn test_runtime_creation() {
        let (runtime, _telemetry) = setup_runtime();
        assert_eq!(runtime.tool_names(), vec!["lookup_knowledge"]);
        assert!(runtime.has_tool("lookup_knowledge"));
        assert!(!runtime.has_tool("read_file"));
        assert_eq!(runtime.get_registry().len(), 1);
    }

    #[tokio::test]
    async fn test_execute_lookup() {
        let (runtime, telemetry) = setup_runtime();

        let result = runtime
            .execute("lookup_knowledge", &json!({"query": "Tell me about basil"}))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.output.lines().next(), Some("Basil is a herb."));

        let stats = telemetry.get_stats();
        assert_eq!(stats.tools_executed, 1);
        assert_eq!(stats.tools_succeeded, 1);
        assert_eq!(stats.searches, 1);
        assert_eq!(runtime.stats().total_executions, 1);
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let (runtime, telemetry) = setup_runtime();

        let result = runtime.execute("web_fetch", &json!({})).await.unwrap();

        assert!(!result.success);
        assert!(result.error.unwrap().contains("Unknown tool"));
        assert_eq!(telemetry.get_stats().tools_failed, 1);
        assert_eq!(runtime.stats().failed_executions, 1);
    }

    #[tokio::test]
    async fn test_tool_error_counts_as_failure() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(BrokenTool));
        let telemetry = TelemetryCollector::new();
        let runtime = ToolRuntime::new(registry).with_telemetry(telemetry.clone());

        let result = runtime.execute("broken", &json!({})).await.unwrap();

        assert!(!result.success);
        assert!(result.output.is_empty());
        assert!(result.error.unwrap().contains("worker panicked"));

        let stats = telemetry.get_stats();
        assert_eq!(stats.tools_executed, 1);
        assert_eq!(stats.tools_succeeded, 0);
        assert_eq!(stats.tools_failed, 1);
        assert_eq!(runtime.stats().total_executions, 1);
        assert_eq!(runtime.stats().failed_executions, 1);
    }
}
