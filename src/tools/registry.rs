//! Tool registry
//!
//! Maps tool names to implementations and their JSON schemas.
//!
//! Tools:
//! - lookup_knowledge: Search the knowledge base

use std::collections::HashMap;
use std::sync::Arc;

use crate::tools::types::ToolSchema;
use crate::tools::Tool;

/// Tool registry
#[derive(Clone, Default)]
pub struct ToolRegistry {
    /// Map of tool name to implementation
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Schemas of all registered tools, sorted by name
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Get number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::EngineHandle;
    use crate::tools::LookupKnowledgeTool;

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(LookupKnowledgeTool::new(Arc::new(EngineHandle::new()))));
        registry
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("lookup_knowledge").is_none());
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = registry();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("lookup_knowledge"));
        assert!(!registry.contains("nonexistent"));
        assert_eq!(registry.tool_names(), vec!["lookup_knowledge"]);
    }

    #[test]
    fn test_schemas() {
        let registry = registry();
        let schemas = registry.schemas();
        assert_eq!(schemas.len(), 1);
        assert!(schemas[0].description.contains("knowledge base"));
        assert!(schemas[0].read_only);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = registry();
        registry.register(Arc::new(LookupKnowledgeTool::new(Arc::new(EngineHandle::new()))));
        assert_eq!(registry.len(), 1);
    }
}
