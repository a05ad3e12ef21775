//! voicerag - knowledge lookup for voice assistants
//!
//! Embeds a static knowledge base, keeps the vectors in a nearest-neighbour
//! index and answers free-text questions with the closest passages.
//!
//! # Architecture
//!
//! - **embedding**: text encoders (BERT sentence embeddings, feature hashing)
//! - **index**: vector indexes (exact flat L2)
//! - **rag**: the retrieval engine and its shared handle
//! - **tools**: the `lookup_knowledge` tool for agent runtimes

pub mod errors;
pub mod embedding;
pub mod index;
pub mod knowledge;
pub mod rag;

// Re-export commonly used types
pub use errors::{RagError, Result};
pub use rag::{EngineHandle, RetrievalEngine};

// Runtime and interface layer
pub mod telemetry;
pub mod tools;
pub mod config;
pub mod bootstrap;
pub mod cli;
pub mod repl;
