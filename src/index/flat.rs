//! Exact brute-force index using squared Euclidean distance.
//!
//! Every search scans all stored vectors. That is the right trade for a
//! knowledge base of tens of documents; larger corpora want an approximate
//! index behind the same trait.

use std::cmp::Ordering;

use crate::errors::{RagError, Result};
use crate::index::{Neighbor, VectorIndex};

/// Flat L2 index
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatL2Index {
    /// Create an empty index for vectors of `dimension` components
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    /// Create an index with room for `capacity` vectors
    pub fn with_capacity(dimension: usize, capacity: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::with_capacity(capacity),
        }
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        if actual != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual,
            });
        }
        Ok(())
    }
}

/// Squared Euclidean distance between two equal-length vectors
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Ascending distance, then ascending slot
fn rank_order(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.slot.cmp(&b.slot))
}

impl VectorIndex for FlatL2Index {
    fn add(&mut self, vector: Vec<f32>) -> Result<usize> {
        self.check_dimension(vector.len())?;
        self.vectors.push(vector);
        Ok(self.vectors.len() - 1)
    }

    fn nearest_neighbors(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        self.check_dimension(query.len())?;

        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(slot, vector)| Neighbor {
                slot,
                distance: squared_l2(query, vector),
            })
            .collect();

        neighbors.sort_by(rank_order);
        neighbors.truncate(k);
        Ok(neighbors)
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(vectors: &[[f32; 2]]) -> FlatL2Index {
        let mut index = FlatL2Index::new(2);
        for v in vectors {
            index.add(v.to_vec()).unwrap();
        }
        index
    }

    #[test]
    fn test_add_assigns_sequential_slots() {
        let mut index = FlatL2Index::new(2);
        assert_eq!(index.add(vec![0.0, 0.0]).unwrap(), 0);
        assert_eq!(index.add(vec![1.0, 0.0]).unwrap(), 1);
        assert_eq!(index.len(), 2);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_add_rejects_wrong_dimension() {
        let mut index = FlatL2Index::new(3);
        let err = index.add(vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert!(index.is_empty());
    }

    #[test]
    fn test_search_rejects_wrong_dimension() {
        let index = index_with(&[[0.0, 0.0]]);
        assert!(index.nearest_neighbors(&[0.0], 1).is_err());
    }

    #[test]
    fn test_squared_l2() {
        assert_eq!(squared_l2(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(squared_l2(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_results_ordered_by_distance() {
        let index = index_with(&[[5.0, 0.0], [1.0, 0.0], [3.0, 0.0]]);
        let hits = index.nearest_neighbors(&[0.0, 0.0], 3).unwrap();
        let slots: Vec<usize> = hits.iter().map(|n| n.slot).collect();
        assert_eq!(slots, vec![1, 2, 0]);
        assert_eq!(hits[0].distance, 1.0);
        assert_eq!(hits[2].distance, 25.0);
    }

    #[test]
    fn test_ties_broken_by_slot() {
        let index = index_with(&[[0.0, 1.0], [1.0, 0.0], [0.0, -1.0], [-1.0, 0.0]]);
        let hits = index.nearest_neighbors(&[0.0, 0.0], 4).unwrap();
        let slots: Vec<usize> = hits.iter().map(|n| n.slot).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_k_larger_than_index() {
        let index = index_with(&[[0.0, 0.0], [1.0, 1.0]]);
        let hits = index.nearest_neighbors(&[0.0, 0.0], 10).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let index = FlatL2Index::with_capacity(2, 8);
        assert!(index.nearest_neighbors(&[0.0, 0.0], 3).unwrap().is_empty());
    }
}
