//! flatknn: flat nearest-neighbor index over point clouds and feature matrices.

pub mod config;
pub mod error;
pub mod geometry;
pub mod index;
pub mod metrics;
pub mod query;
pub mod types;

pub use error::{FlatKnnError, Result, SentinelExt};
pub use geometry::{Feature, Geometry, GeometryType, HalfEdgeTriangleMesh, PointCloud, TriangleMesh};
pub use index::{FlatBackend, FlatL2, KnnIndex, RadiusResult, SearchOutcome};
pub use query::QueryMatrix;
pub use types::{DenseMatrix, KnnOverflowPolicy, Neighbor, SearchMode, SearchParam};
