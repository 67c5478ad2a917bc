use serde::{Deserialize, Serialize};

use crate::error::{FlatKnnError, Result};

/// Query mode for a single search call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchParam {
    /// Fixed number of nearest neighbors.
    Knn { knn: usize },
    /// Every point within `radius` (Euclidean, not squared).
    Radius { radius: f32 },
    /// Radius bounded by a maximum neighbor count. Not supported by the flat
    /// index; searching with it always fails.
    Hybrid { radius: f32, max_nn: usize },
}

impl SearchParam {
    pub fn knn(knn: usize) -> Self {
        SearchParam::Knn { knn }
    }

    pub fn radius(radius: f32) -> Self {
        SearchParam::Radius { radius }
    }

    pub fn hybrid(radius: f32, max_nn: usize) -> Self {
        SearchParam::Hybrid { radius, max_nn }
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            SearchParam::Knn { .. } => SearchMode::Knn,
            SearchParam::Radius { .. } => SearchMode::Radius,
            SearchParam::Hybrid { .. } => SearchMode::Hybrid,
        }
    }
}

/// Tag of a [`SearchParam`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Knn,
    Radius,
    Hybrid,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Knn => write!(f, "knn"),
            SearchMode::Radius => write!(f, "radius"),
            SearchMode::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// What to do when a Knn query asks for more neighbors than the index holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnnOverflowPolicy {
    /// Return `min(k, dataset_size)` neighbors per query.
    #[default]
    Clamp,
    /// Reject the query.
    Fail,
}

/// Dense column-major f64 matrix. Rows are coordinates, columns are points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Wrap column-major `data` of shape `rows x cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(FlatKnnError::InvalidShape(format!(
                "{rows}x{cols} matrix needs {} values, got {}",
                rows.saturating_mul(cols),
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix whose columns are the given points.
    pub fn from_columns<const D: usize>(columns: &[[f64; D]]) -> Self {
        Self {
            rows: D,
            cols: columns.len(),
            data: columns.iter().flatten().copied().collect(),
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[col * self.rows + row]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[col * self.rows + row] = value;
    }

    pub fn column(&self, col: usize) -> &[f64] {
        &self.data[col * self.rows..(col + 1) * self.rows]
    }
}

/// A single neighbor returned from a search, in caller-friendly form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub index: i64,
    pub distance2: f32,
}
