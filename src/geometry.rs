//! Minimal geometry carriers accepted by the index.
//!
//! Only the parts the index reads (point and vertex positions) are modelled.
//! [`Geometry`] is a closed set: ingestion matches on it and rejects every
//! variant that does not expose 3-D positions.

use serde::{Deserialize, Serialize};

use crate::types::DenseMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryType {
    Unspecified,
    PointCloud,
    TriangleMesh,
    HalfEdgeTriangleMesh,
    Image,
}

impl std::fmt::Display for GeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryType::Unspecified => write!(f, "unspecified"),
            GeometryType::PointCloud => write!(f, "point_cloud"),
            GeometryType::TriangleMesh => write!(f, "triangle_mesh"),
            GeometryType::HalfEdgeTriangleMesh => write!(f, "half_edge_triangle_mesh"),
            GeometryType::Image => write!(f, "image"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    pub points: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub normals: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<[f64; 3]>,
}

impl PointCloud {
    pub fn new(points: Vec<[f64; 3]>) -> Self {
        Self {
            points,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<[f64; 3]>,
    #[serde(default)]
    pub triangles: Vec<[usize; 3]>,
}

/// A half-edge record: the directed edge `vertex_indices[0] -> vertex_indices[1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfEdge {
    pub next: Option<usize>,
    pub twin: Option<usize>,
    pub vertex_indices: [usize; 2],
    pub triangle_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HalfEdgeTriangleMesh {
    pub vertices: Vec<[f64; 3]>,
    #[serde(default)]
    pub triangles: Vec<[usize; 3]>,
    #[serde(default)]
    pub half_edges: Vec<HalfEdge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub num_channels: usize,
    pub data: Vec<u8>,
}

/// Any geometry a caller may hand to the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Unspecified,
    PointCloud(PointCloud),
    TriangleMesh(TriangleMesh),
    HalfEdgeTriangleMesh(HalfEdgeTriangleMesh),
    Image(Image),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Unspecified => GeometryType::Unspecified,
            Geometry::PointCloud(_) => GeometryType::PointCloud,
            Geometry::TriangleMesh(_) => GeometryType::TriangleMesh,
            Geometry::HalfEdgeTriangleMesh(_) => GeometryType::HalfEdgeTriangleMesh,
            Geometry::Image(_) => GeometryType::Image,
        }
    }

    /// 3-D positions of this geometry, or `None` for variants without them.
    pub fn positions(&self) -> Option<&[[f64; 3]]> {
        match self {
            Geometry::PointCloud(pc) => Some(&pc.points),
            Geometry::TriangleMesh(mesh) => Some(&mesh.vertices),
            Geometry::HalfEdgeTriangleMesh(mesh) => Some(&mesh.vertices),
            Geometry::Image(_) | Geometry::Unspecified => None,
        }
    }
}

impl From<PointCloud> for Geometry {
    fn from(pc: PointCloud) -> Self {
        Geometry::PointCloud(pc)
    }
}

impl From<TriangleMesh> for Geometry {
    fn from(mesh: TriangleMesh) -> Self {
        Geometry::TriangleMesh(mesh)
    }
}

impl From<HalfEdgeTriangleMesh> for Geometry {
    fn from(mesh: HalfEdgeTriangleMesh) -> Self {
        Geometry::HalfEdgeTriangleMesh(mesh)
    }
}

/// Per-point feature descriptors, one column per point (e.g. FPFH output).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub data: DenseMatrix,
}

impl Feature {
    pub fn new(data: DenseMatrix) -> Self {
        Self { data }
    }

    pub fn dimension(&self) -> usize {
        self.data.rows()
    }

    pub fn num(&self) -> usize {
        self.data.cols()
    }
}
