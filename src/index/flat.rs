//! Exhaustive L2 flat backend.
//!
//! Stores every point and compares each query against all of them. Knn
//! results are ordered by `(distance, index)`, so exact ties always resolve
//! to the lower point index.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{FlatKnnError, Result};
use crate::index::distance::squared_euclidean;
use crate::index::traits::FlatBackend;

/// Variable-length result of a radius search over a batch of queries.
///
/// Neighbors of query `q` live at `labels[lims[q]..lims[q + 1]]` and
/// `distances[lims[q]..lims[q + 1]]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadiusResult {
    pub lims: Vec<usize>,
    pub labels: Vec<i64>,
    pub distances: Vec<f32>,
}

impl RadiusResult {
    pub fn new() -> Self {
        Self {
            lims: vec![0],
            labels: Vec::new(),
            distances: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.lims.clear();
        self.lims.push(0);
        self.labels.clear();
        self.distances.clear();
    }

    /// Number of queries recorded.
    pub fn num_queries(&self) -> usize {
        self.lims.len().saturating_sub(1)
    }

    /// Total neighbors across all queries.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels and squared distances found for query `q`.
    pub fn query(&self, q: usize) -> (&[i64], &[f32]) {
        let (start, end) = (self.lims[q], self.lims[q + 1]);
        (&self.labels[start..end], &self.distances[start..end])
    }

    fn push(&mut self, label: i64, distance2: f32) {
        self.labels.push(label);
        self.distances.push(distance2);
    }

    fn finish_query(&mut self) {
        self.lims.push(self.labels.len());
    }
}

/// Heap entry ordered by distance, then by point index.
#[derive(Debug, Clone, Copy)]
struct Scored {
    distance2: f32,
    index: usize,
}

impl PartialEq for Scored {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scored {}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.distance2.total_cmp(&other.distance2) {
            Ordering::Equal => self.index.cmp(&other.index),
            ord => ord,
        }
    }
}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Brute-force L2 index over f32 points.
#[derive(Debug, Clone)]
pub struct FlatL2 {
    dimension: usize,
    points: Vec<f32>,
}

impl FlatL2 {
    fn point(&self, i: usize) -> &[f32] {
        &self.points[i * self.dimension..(i + 1) * self.dimension]
    }

    fn knn_one(&self, query: &[f32], k: usize, distances: &mut [f32], labels: &mut [i64]) {
        // Max-heap of the k best seen so far; the root is the current worst.
        let mut heap: BinaryHeap<Scored> = BinaryHeap::with_capacity(k + 1);
        for i in 0..self.ntotal() {
            let candidate = Scored {
                distance2: squared_euclidean(query, self.point(i)),
                index: i,
            };
            if heap.len() < k {
                heap.push(candidate);
            } else if let Some(worst) = heap.peek() {
                if candidate < *worst {
                    heap.pop();
                    heap.push(candidate);
                }
            }
        }

        let found = heap.into_sorted_vec();
        for slot in 0..k {
            match found.get(slot) {
                Some(s) => {
                    labels[slot] = s.index as i64;
                    distances[slot] = s.distance2;
                }
                None => {
                    labels[slot] = -1;
                    distances[slot] = f32::INFINITY;
                }
            }
        }
    }
}

impl FlatBackend for FlatL2 {
    fn new(dimension: usize) -> Self {
        Self {
            dimension,
            points: Vec::new(),
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn ntotal(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.points.len() / self.dimension
        }
    }

    fn add(&mut self, data: &[f32]) -> Result<()> {
        if self.dimension == 0 || data.len() % self.dimension != 0 {
            return Err(FlatKnnError::InvalidShape(format!(
                "{} values is not a whole number of {}-d points",
                data.len(),
                self.dimension
            )));
        }
        self.points.extend_from_slice(data);
        Ok(())
    }

    fn search(&self, queries: &[f32], k: usize, distances: &mut [f32], labels: &mut [i64]) {
        if k == 0 || self.dimension == 0 {
            return;
        }
        for (q, query) in queries.chunks_exact(self.dimension).enumerate() {
            let out = q * k..(q + 1) * k;
            self.knn_one(query, k, &mut distances[out.clone()], &mut labels[out]);
        }
    }

    fn range_search(&self, queries: &[f32], radius2: f32, result: &mut RadiusResult) {
        result.clear();
        if self.dimension == 0 {
            return;
        }
        for query in queries.chunks_exact(self.dimension) {
            for i in 0..self.ntotal() {
                let d2 = squared_euclidean(query, self.point(i));
                if d2 <= radius2 {
                    result.push(i as i64, d2);
                }
            }
            result.finish_query();
        }
    }
}
