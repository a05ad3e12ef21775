pub mod engine;

pub use engine::{format_results, EngineBuilder, RankedDocument, RetrievalEngine, DEFAULT_TOP_K};
