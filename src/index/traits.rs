//! Core trait definition for flat search backends.
//!
//! `KnnIndex` owns exactly one backend and talks to it only through this
//! trait, so any exhaustive or approximate implementation can be swapped in.

use crate::error::Result;
use crate::index::flat::RadiusResult;

/// Trait that all search backends must satisfy.
///
/// Every buffer crossing this boundary is column-major f32: `dimension()`
/// consecutive values per point or per query.
pub trait FlatBackend {
    /// Create an empty backend for vectors of `dimension` coordinates.
    fn new(dimension: usize) -> Self
    where
        Self: Sized;

    /// Return the dimensionality of vectors in this backend.
    fn dimension(&self) -> usize;

    /// Return the total number of vectors added so far.
    fn ntotal(&self) -> usize;

    /// Append the points in `data` (`data.len() / dimension()` of them).
    ///
    /// # Errors
    /// Returns `FlatKnnError::InvalidShape` if `data.len()` is not a multiple
    /// of the dimension.
    fn add(&mut self, data: &[f32]) -> Result<()>;

    /// Find the `k` nearest points for each query column.
    ///
    /// Writes `k` entries per query into `distances` and `labels`, ascending
    /// by squared distance. Slots beyond `ntotal()` are filled with label `-1`
    /// and distance `f32::INFINITY`. Both buffers must hold
    /// `k * queries.len() / dimension()` entries.
    fn search(&self, queries: &[f32], k: usize, distances: &mut [f32], labels: &mut [i64]);

    /// Collect every point with squared distance `<= radius2` for each query
    /// column. `result` is cleared first.
    fn range_search(&self, queries: &[f32], radius2: f32, result: &mut RadiusResult);
}
