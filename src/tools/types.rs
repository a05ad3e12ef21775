//! Tool execution types and structures
//!
//! Core types for tool schemas and results as seen by an agent runtime.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of tool execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool name that was executed
    pub tool: String,

    /// Text handed back to the language model
    pub output: String,

    /// Whether execution was successful
    pub success: bool,

    /// Execution duration in milliseconds
    pub duration_ms: u64,

    /// Optional error message if failed
    pub error: Option<String>,
}

impl ToolResult {
    /// Create successful result
    pub fn success(tool: String, output: String, duration: Duration) -> Self {
        Self {
            tool,
            output,
            success: true,
            duration_ms: duration.as_millis() as u64,
            error: None,
        }
    }

    /// Create failed result
    pub fn failure(tool: String, error: String, duration: Duration) -> Self {
        Self {
            tool,
            output: String::new(),
            success: false,
            duration_ms: duration.as_millis() as u64,
            error: Some(error),
        }
    }
}

/// Tool schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name
    pub name: String,

    /// Tool description
    pub description: String,

    /// Parameter schema (JSON Schema)
    pub parameters: serde_json::Value,

    /// Whether tool is read-only (safe for parallel execution)
    pub read_only: bool,
}

impl ToolSchema {
    /// Create new tool schema
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
        read_only: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            read_only,
        }
    }
}

/// Tool execution statistics
#[derive(Debug, Clone, Default)]
pub struct ToolStats {
    /// Total executions
    pub total_executions: u64,

    /// Successful executions
    pub successful_executions: u64,

    /// Failed executions
    pub failed_executions: u64,

    /// Total execution time (ms)
    pub total_duration_ms: u64,
}

impl ToolStats {
    /// Record a finished execution
    pub fn record(&mut self, result: &ToolResult) {
        self.total_executions += 1;
        self.total_duration_ms += result.duration_ms;
        if result.success {
            self.successful_executions += 1;
        } else {
            self.failed_executions += 1;
        }
    }

    /// Calculate average duration
    pub fn average_duration_ms(&self) -> f64 {
        if self.total_executions == 0 {
            0.0
        } else {
            self.total_duration_ms as f64 / self.total_executions as f64
        }
    }

    /// Calculate success rate
    pub fn success_rate(&self) -> f64 {
        if self.total_executions == 0 {
            0.0
        } else {
            self.successful_executions as f64 / self.total_executions as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success(
            "test".to_string(),
            "output".to_string(),
            Duration::from_millis(100),
        );

        assert!(result.success);
        assert_eq!(result.tool, "test");
        assert_eq!(result.output, "output");
        assert_eq!(result.duration_ms, 100);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_tool_result_failure() {
        let result = ToolResult::failure(
            "test".to_string(),
            "error".to_string(),
            Duration::from_millis(50),
        );

        assert!(!result.success);
        assert!(result.output.is_empty());
        assert_eq!(result.error.unwrap(), "error");
        assert_eq!(result.duration_ms, 50);
    }

    #[test]
    fn test_tool_result_serializes() {
        let result = ToolResult::success(
            "lookup_knowledge".to_string(),
            "Basil is a herb.".to_string(),
            Duration::from_millis(3),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["tool"], "lookup_knowledge");
        assert_eq!(json["success"], true);
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_tool_stats() {
        let mut stats = ToolStats::default();
        assert_eq!(stats.success_rate(), 0.0);

        stats.record(&ToolResult::success(
            "t".to_string(),
            String::new(),
            Duration::from_millis(10),
        ));
        stats.record(&ToolResult::failure(
            "t".to_string(),
            "e".to_string(),
            Duration::from_millis(30),
        ));

        assert_eq!(stats.total_executions, 2);
        assert_eq!(stats.success_rate(), 0.5);
        assert_eq!(stats.average_duration_ms(), 20.0);
    }
}
