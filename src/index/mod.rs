//! Index module for flatknn.
//!
//! Provides the `FlatBackend` trait, the exhaustive `FlatL2` backend, distance
//! kernels, and `KnnIndex`, the adapter that ingests point sets and answers
//! Knn and radius queries.

pub mod distance;
pub mod flat;
pub mod knn;
pub mod traits;

// Re-export the core types at the module level so callers can write
// `use crate::index::{KnnIndex, FlatL2}`.
pub use flat::{FlatL2, RadiusResult};
pub use knn::{KnnIndex, SearchOutcome};
pub use traits::FlatBackend;
