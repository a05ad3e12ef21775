// Retrieval-augmented generation lookup
//
// Components:
// - Retrieval Engine: encode documents, index them, rank by distance
// - Engine Handle: shared slot holding the engine once it is built

pub mod retrieval;
pub mod handle;

// Re-export key types
pub use retrieval::{EngineBuilder, RankedDocument, RetrievalEngine, DEFAULT_TOP_K};
pub use handle::EngineHandle;
