//! Knowledge base loading
//!
//! The knowledge base is an ordered list of documents kept outside the
//! engine. Supported formats, chosen by file extension:
//! - `.toml`: `documents = ["...", ...]` with optional `name` and `version`
//! - `.json`: an array of strings, or an object with a `documents` array
//! - anything else: one document per non-empty line, `#` starts a comment

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{RagError, Result};

/// An ordered, validated collection of documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub documents: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonKnowledge {
    List(Vec<String>),
    Object(KnowledgeBase),
}

impl KnowledgeBase {
    /// Build from an in-memory list of documents
    pub fn from_documents(documents: Vec<String>) -> Result<Self> {
        let kb = Self {
            name: None,
            version: None,
            documents,
        };
        kb.validate()?;
        Ok(kb)
    }

    /// Load from a file, picking the format from its extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RagError::Configuration(format!(
                "Failed to read knowledge base {}: {}",
                path.display(),
                e
            ))
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let kb = match extension.as_deref() {
            Some("toml") => Self::parse_toml(&contents),
            Some("json") => Self::parse_json(&contents),
            _ => Ok(Self::parse_lines(&contents)),
        }
        .map_err(|e| match e {
            RagError::Configuration(msg) => {
                RagError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        kb.validate()?;
        Ok(kb)
    }

    fn parse_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| RagError::Configuration(format!("Failed to parse knowledge base: {}", e)))
    }

    fn parse_json(contents: &str) -> Result<Self> {
        let parsed: JsonKnowledge = serde_json::from_str(contents)
            .map_err(|e| RagError::Configuration(format!("Failed to parse knowledge base: {}", e)))?;

        Ok(match parsed {
            JsonKnowledge::List(documents) => Self {
                name: None,
                version: None,
                documents,
            },
            JsonKnowledge::Object(kb) => kb,
        })
    }

    fn parse_lines(contents: &str) -> Self {
        let documents = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        Self {
            name: None,
            version: None,
            documents,
        }
    }

    /// Reject empty collections and blank documents
    pub fn validate(&self) -> Result<()> {
        validate_documents(&self.documents)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Consume the knowledge base, keeping only the documents
    pub fn into_documents(self) -> Vec<String> {
        self.documents
    }
}

/// Check the document collection invariants shared by loading and indexing
pub fn validate_documents(documents: &[String]) -> Result<()> {
    if documents.is_empty() {
        return Err(RagError::Configuration(
            "knowledge base must contain at least one document".to_string(),
        ));
    }

    if let Some(position) = documents.iter().position(|d| d.trim().is_empty()) {
        return Err(RagError::Configuration(format!(
            "document {} is empty",
            position
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_documents() {
        let kb = KnowledgeBase::from_documents(vec!["Basil is a herb.".to_string()]).unwrap();
        assert_eq!(kb.len(), 1);
        assert!(!kb.is_empty());
    }

    #[test]
    fn test_empty_rejected() {
        let err = KnowledgeBase::from_documents(Vec::new()).unwrap_err();
        assert!(matches!(err, RagError::Configuration(_)));
    }

    #[test]
    fn test_blank_document_rejected() {
        let err =
            KnowledgeBase::from_documents(vec!["ok".to_string(), "   ".to_string()]).unwrap_err();
        assert!(err.to_string().contains("document 1"));
    }

    #[test]
    fn test_load_toml() {
        let file = temp_file(
            ".toml",
            r#"
name = "demo"
version = "2"
documents = ["Basil is a herb.", "RAG means Retrieval-Augmented Generation."]
"#,
        );
        let kb = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(kb.name.as_deref(), Some("demo"));
        assert_eq!(kb.version.as_deref(), Some("2"));
        assert_eq!(kb.documents[1], "RAG means Retrieval-Augmented Generation.");
    }

    #[test]
    fn test_load_json_list_and_object() {
        let list = temp_file(".json", r#"["one", "two"]"#);
        assert_eq!(KnowledgeBase::load(list.path()).unwrap().len(), 2);

        let object = temp_file(".json", r#"{"name": "kb", "documents": ["one"]}"#);
        let kb = KnowledgeBase::load(object.path()).unwrap();
        assert_eq!(kb.name.as_deref(), Some("kb"));
        assert_eq!(kb.documents, vec!["one"]);
    }

    #[test]
    fn test_load_lines_skips_comments_and_blanks() {
        let file = temp_file(".txt", "# facts\nBasil is a herb.\n\n  Pesto uses basil.  \n");
        let kb = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(kb.documents, vec!["Basil is a herb.", "Pesto uses basil."]);
    }

    #[test]
    fn test_load_empty_file_rejected() {
        let file = temp_file(".txt", "# nothing here\n");
        assert!(matches!(
            KnowledgeBase::load(file.path()),
            Err(RagError::Configuration(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = KnowledgeBase::load("/nonexistent/knowledge.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/knowledge.toml"));
    }

    #[test]
    fn test_load_invalid_toml_names_path() {
        let file = temp_file(".toml", "documents = [");
        let err = KnowledgeBase::load(file.path()).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}
