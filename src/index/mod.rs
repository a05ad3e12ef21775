//! Vector indexes
//!
//! Slots are assigned in insertion order starting at 0, which is how the
//! retrieval engine keeps slot `i` tied to document `i`.

pub mod flat;

pub use flat::FlatL2Index;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// One search hit: an index slot and its distance to the query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub slot: usize,
    pub distance: f32,
}

/// A nearest-neighbour index over fixed-dimension vectors.
///
/// `nearest_neighbors` returns at most `k` hits ordered by ascending
/// distance, with equal distances ordered by slot. Implementations must be
/// safe for concurrent reads once built.
pub trait VectorIndex: Send + Sync {
    /// Append a vector, returning its slot
    fn add(&mut self, vector: Vec<f32>) -> Result<usize>;

    /// Search for the `k` nearest neighbours of `query`
    fn nearest_neighbors(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;

    /// Number of stored vectors
    fn len(&self) -> usize;

    /// Vector dimension accepted by this index
    fn dimension(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
