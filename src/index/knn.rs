//! `KnnIndex`: ingests a point set into an owned flat buffer and answers Knn
//! and radius queries through a [`FlatBackend`].
//!
//! The buffer and the backend are always replaced or dropped together. An
//! empty ingest unbuilds the index; a rejected geometry or malformed shape
//! leaves the previous store untouched. No search reaches the backend unless
//! the index is built and the query dimension matches.

use tracing::{debug, instrument, warn};

use crate::config::SearchConfig;
use crate::error::{FlatKnnError, Result, RADIUS_OK};
use crate::geometry::{Feature, Geometry};
use crate::index::flat::{FlatL2, RadiusResult};
use crate::index::traits::FlatBackend;
use crate::metrics;
use crate::query::QueryMatrix;
use crate::types::{DenseMatrix, KnnOverflowPolicy, Neighbor, SearchMode, SearchParam};

/// Result of the dispatching [`KnnIndex::search`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Knn search wrote this many entries per query.
    Knn(usize),
    /// Radius search succeeded. `lims` splits the flattened output per query.
    Radius { lims: Vec<usize> },
}

impl SearchOutcome {
    /// Integer form: the per-query count for Knn, `1` for radius.
    pub fn sentinel(&self) -> i32 {
        match self {
            SearchOutcome::Knn(k) => i32::try_from(*k).unwrap_or(i32::MAX),
            SearchOutcome::Radius { .. } => RADIUS_OK,
        }
    }
}

impl crate::error::SentinelExt for Result<SearchOutcome> {
    fn into_sentinel(self) -> i32 {
        match self {
            Ok(outcome) => outcome.sentinel(),
            Err(e) => e.sentinel(),
        }
    }
}

/// Flat nearest-neighbor index over an owned column-major f32 point set.
#[derive(Debug, Clone)]
pub struct KnnIndex<B: FlatBackend = FlatL2> {
    data: Vec<f32>,
    dimension: usize,
    dataset_size: usize,
    backend: Option<B>,
    overflow: KnnOverflowPolicy,
}

impl<B: FlatBackend> Default for KnnIndex<B> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            dimension: 0,
            dataset_size: 0,
            backend: None,
            overflow: KnnOverflowPolicy::default(),
        }
    }
}

impl KnnIndex<FlatL2> {
    /// An unbuilt index on the default flat L2 backend.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_matrix(data: &DenseMatrix) -> Result<Self> {
        let mut index = Self::new();
        index.set_matrix_data(data)?;
        Ok(index)
    }

    pub fn from_geometry(geometry: &Geometry) -> Result<Self> {
        let mut index = Self::new();
        index.set_geometry(geometry)?;
        Ok(index)
    }

    pub fn from_feature(feature: &Feature) -> Result<Self> {
        let mut index = Self::new();
        index.set_feature(feature)?;
        Ok(index)
    }

    pub fn from_tensor(data: &[f32], shape: [usize; 2]) -> Result<Self> {
        let mut index = Self::new();
        index.set_tensor_data(data, shape)?;
        Ok(index)
    }
}

impl<B: FlatBackend> KnnIndex<B> {
    /// An unbuilt index on backend `B`.
    pub fn unbuilt() -> Self {
        Self::default()
    }

    /// An unbuilt index configured from `config`.
    pub fn with_config(config: &SearchConfig) -> Self {
        Self {
            overflow: config.knn_overflow,
            ..Self::default()
        }
    }

    pub fn overflow_policy(&self) -> KnnOverflowPolicy {
        self.overflow
    }

    pub fn set_overflow_policy(&mut self, policy: KnnOverflowPolicy) {
        self.overflow = policy;
    }

    /// Whether a point set has been ingested successfully.
    pub fn is_built(&self) -> bool {
        self.backend.is_some() && !self.data.is_empty() && self.dataset_size > 0
    }

    /// Coordinates per point, 0 when unbuilt.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of points, 0 when unbuilt.
    pub fn dataset_size(&self) -> usize {
        self.dataset_size
    }

    /// The owned column-major point buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Coordinates of point `i`.
    pub fn point(&self, i: usize) -> Option<&[f32]> {
        if i >= self.dataset_size {
            return None;
        }
        Some(&self.data[i * self.dimension..(i + 1) * self.dimension])
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    // ─── Ingestion ───

    /// Ingest a dense matrix: rows are coordinates, columns are points.
    pub fn set_matrix_data(&mut self, data: &DenseMatrix) -> Result<()> {
        let flat: Vec<f32> = data.as_slice().iter().map(|&v| v as f32).collect();
        self.set_raw_data(data.rows(), data.cols(), flat, "matrix")
    }

    /// Ingest the 3-D positions of a point cloud or a mesh.
    ///
    /// Other geometry variants are rejected with a warning; nothing is
    /// extracted from them.
    pub fn set_geometry(&mut self, geometry: &Geometry) -> Result<()> {
        let positions: &[[f64; 3]] = match geometry {
            Geometry::PointCloud(pc) => &pc.points,
            Geometry::TriangleMesh(mesh) => &mesh.vertices,
            Geometry::HalfEdgeTriangleMesh(mesh) => &mesh.vertices,
            Geometry::Image(_) | Geometry::Unspecified => {
                let geometry_type = geometry.geometry_type();
                warn!(%geometry_type, "set_geometry: unsupported geometry type");
                metrics::INGESTIONS_TOTAL
                    .with_label_values(&["geometry", "rejected"])
                    .inc();
                return Err(FlatKnnError::UnsupportedGeometry {
                    geometry_type: geometry_type.to_string(),
                });
            }
        };

        let flat: Vec<f32> = positions.iter().flatten().map(|&v| v as f32).collect();
        self.set_raw_data(3, positions.len(), flat, "geometry")
    }

    /// Ingest a feature matrix, one descriptor column per point.
    pub fn set_feature(&mut self, feature: &Feature) -> Result<()> {
        let flat: Vec<f32> = feature.data.as_slice().iter().map(|&v| v as f32).collect();
        self.set_raw_data(feature.dimension(), feature.num(), flat, "feature")
    }

    /// Ingest a row-major f32 tensor of shape `[num_points, dimension]`.
    pub fn set_tensor_data(&mut self, data: &[f32], shape: [usize; 2]) -> Result<()> {
        let [num_points, dimension] = shape;
        if num_points.checked_mul(dimension) != Some(data.len()) {
            warn!(
                num_points,
                dimension,
                len = data.len(),
                "set_tensor_data: shape does not match data length"
            );
            metrics::INGESTIONS_TOTAL
                .with_label_values(&["tensor", "rejected"])
                .inc();
            return Err(FlatKnnError::InvalidShape(format!(
                "tensor shape [{num_points}, {dimension}] does not match {} values",
                data.len()
            )));
        }
        // A row-major [n, d] tensor has the same layout as a column-major d x n matrix.
        self.set_raw_data(dimension, num_points, data.to_vec(), "tensor")
    }

    fn set_raw_data(
        &mut self,
        dimension: usize,
        dataset_size: usize,
        data: Vec<f32>,
        source: &str,
    ) -> Result<()> {
        if dimension == 0 || dataset_size == 0 {
            warn!(
                source,
                dimension, dataset_size, "set_raw_data: failed due to no data"
            );
            // An empty ingest drops the previous store; searches must not see stale points.
            self.clear();
            metrics::INGESTIONS_TOTAL
                .with_label_values(&[source, "rejected"])
                .inc();
            return Err(FlatKnnError::NoData {
                rows: dimension,
                cols: dataset_size,
            });
        }

        let mut backend = B::new(dimension);
        if let Err(e) = backend.add(&data) {
            warn!(source, error = %e, "set_raw_data: backend rejected points");
            metrics::INGESTIONS_TOTAL
                .with_label_values(&[source, "rejected"])
                .inc();
            return Err(e);
        }

        self.data = data;
        self.dimension = dimension;
        self.dataset_size = dataset_size;
        self.backend = Some(backend);

        metrics::INGESTIONS_TOTAL
            .with_label_values(&[source, "ok"])
            .inc();
        debug!(source, dimension, dataset_size, "index built");
        Ok(())
    }

    fn clear(&mut self) {
        self.data = Vec::new();
        self.dimension = 0;
        self.dataset_size = 0;
        self.backend = None;
    }

    // ─── Search ───

    /// Run the search selected by `param`.
    ///
    /// For Knn, `indices` and `distance2` are used as presized buffers and are
    /// never grown. For radius, both are replaced with the flattened result
    /// and the per-query split is returned in [`SearchOutcome::Radius`].
    pub fn search<Q: QueryMatrix + ?Sized>(
        &self,
        query: &Q,
        param: &SearchParam,
        indices: &mut Vec<i64>,
        distance2: &mut Vec<f32>,
    ) -> Result<SearchOutcome> {
        match *param {
            SearchParam::Knn { knn } => self
                .search_knn(query, knn, indices, distance2)
                .map(SearchOutcome::Knn),
            SearchParam::Radius { radius } => {
                let mut result = RadiusResult::new();
                self.search_radius(query, radius, &mut result)?;
                *indices = result.labels;
                *distance2 = result.distances;
                Ok(SearchOutcome::Radius { lims: result.lims })
            }
            SearchParam::Hybrid { .. } => {
                metrics::SEARCHES_TOTAL.with_label_values(&["hybrid"]).inc();
                let err = FlatKnnError::UnsupportedSearchMode {
                    mode: param.mode().to_string(),
                };
                record_failure(param.mode(), &err);
                Err(err)
            }
        }
    }

    /// Find the `knn` nearest points to every query column.
    ///
    /// Writes `knn` entries per query (the effective count under
    /// [`KnnOverflowPolicy::Clamp`]) into `indices` and `distance2`, ascending
    /// by squared distance, and returns that count. Callers size both buffers
    /// to at least `count * query.cols()`.
    #[instrument(level = "debug", skip(self, query, indices, distance2), fields(dimension = self.dimension))]
    pub fn search_knn<Q: QueryMatrix + ?Sized>(
        &self,
        query: &Q,
        knn: usize,
        indices: &mut [i64],
        distance2: &mut [f32],
    ) -> Result<usize> {
        metrics::SEARCHES_TOTAL.with_label_values(&["knn"]).inc();
        let backend = self
            .check_query(query)
            .inspect_err(|e| record_failure(SearchMode::Knn, e))?;

        let k = match self.overflow {
            KnnOverflowPolicy::Clamp => knn.min(self.dataset_size),
            KnnOverflowPolicy::Fail if knn > self.dataset_size => {
                let err = FlatKnnError::KnnExceedsDataset {
                    knn,
                    dataset_size: self.dataset_size,
                };
                record_failure(SearchMode::Knn, &err);
                return Err(err);
            }
            KnnOverflowPolicy::Fail => knn,
        };

        let needed = k * query.cols();
        let actual = indices.len().min(distance2.len());
        if actual < needed {
            let err = FlatKnnError::OutputTooSmall { needed, actual };
            record_failure(SearchMode::Knn, &err);
            return Err(err);
        }
        if k == 0 {
            return Ok(0);
        }

        let queries = query.to_column_major();
        backend.search(
            &queries,
            k,
            &mut distance2[..needed],
            &mut indices[..needed],
        );
        debug!(queries = query.cols(), k, "knn search complete");
        Ok(k)
    }

    /// Find every point within `radius` of each query column.
    ///
    /// A point is included when its squared distance is `<= radius * radius`.
    /// Order within a query follows the backend's scan order.
    #[instrument(level = "debug", skip(self, query, result), fields(dimension = self.dimension))]
    pub fn search_radius<Q: QueryMatrix + ?Sized>(
        &self,
        query: &Q,
        radius: f32,
        result: &mut RadiusResult,
    ) -> Result<()> {
        metrics::SEARCHES_TOTAL.with_label_values(&["radius"]).inc();
        let backend = self
            .check_query(query)
            .inspect_err(|e| record_failure(SearchMode::Radius, e))?;

        if !radius.is_finite() || radius < 0.0 {
            let err = FlatKnnError::InvalidRadius { radius };
            record_failure(SearchMode::Radius, &err);
            return Err(err);
        }

        let queries = query.to_column_major();
        backend.range_search(&queries, radius * radius, result);
        debug!(queries = query.cols(), found = result.len(), "radius search complete");
        Ok(())
    }

    /// Knn for a single query, returned as owned neighbors.
    pub fn nearest<Q: QueryMatrix + ?Sized>(&self, query: &Q, knn: usize) -> Result<Vec<Neighbor>> {
        if query.cols() != 1 {
            return Err(FlatKnnError::InvalidShape(format!(
                "expected a single query, got {}",
                query.cols()
            )));
        }
        let k = knn.min(self.dataset_size);
        let mut indices = vec![-1i64; k];
        let mut distance2 = vec![0.0f32; k];
        let count = self.search_knn(query, knn, &mut indices, &mut distance2)?;
        Ok(indices
            .into_iter()
            .zip(distance2)
            .take(count)
            .map(|(index, distance2)| Neighbor { index, distance2 })
            .collect())
    }

    /// Radius search for a single query, returned as owned neighbors.
    pub fn within<Q: QueryMatrix + ?Sized>(&self, query: &Q, radius: f32) -> Result<Vec<Neighbor>> {
        if query.cols() != 1 {
            return Err(FlatKnnError::InvalidShape(format!(
                "expected a single query, got {}",
                query.cols()
            )));
        }
        let mut result = RadiusResult::new();
        self.search_radius(query, radius, &mut result)?;
        Ok(result
            .labels
            .into_iter()
            .zip(result.distances)
            .map(|(index, distance2)| Neighbor { index, distance2 })
            .collect())
    }

    /// Shared preconditions: built, and query rows equal the index dimension.
    fn check_query<Q: QueryMatrix + ?Sized>(&self, query: &Q) -> Result<&B> {
        let backend = match &self.backend {
            Some(b) if self.is_built() => b,
            _ => return Err(FlatKnnError::NotBuilt),
        };
        if query.rows() != self.dimension {
            return Err(FlatKnnError::DimensionMismatch {
                expected: self.dimension,
                actual: query.rows(),
            });
        }
        Ok(backend)
    }
}

fn record_failure(mode: SearchMode, err: &FlatKnnError) {
    let mode_label = mode.to_string();
    metrics::SEARCH_FAILURES_TOTAL
        .with_label_values(&[mode_label.as_str(), err.reason()])
        .inc();
    debug!(%mode, error = %err, "search failed");
}
