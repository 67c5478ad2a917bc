//! Query shapes accepted by the index.
//!
//! A query is a column block: `rows()` coordinates per column, `cols()`
//! queries. A single vector is a block with one column. Values are read
//! through [`QueryMatrix::value`] and downcast to f32, the working precision
//! of the index.

use crate::types::DenseMatrix;

pub trait QueryMatrix {
    /// Coordinates per query column.
    fn rows(&self) -> usize;

    /// Number of query columns.
    fn cols(&self) -> usize;

    /// Coordinate `row` of query `col`, in working precision.
    fn value(&self, row: usize, col: usize) -> f32;

    /// Copy the block into a contiguous column-major f32 buffer.
    fn to_column_major(&self) -> Vec<f32> {
        let (rows, cols) = (self.rows(), self.cols());
        let mut out = Vec::with_capacity(rows * cols);
        for c in 0..cols {
            for r in 0..rows {
                out.push(self.value(r, c));
            }
        }
        out
    }
}

impl<T: QueryMatrix + ?Sized> QueryMatrix for &T {
    fn rows(&self) -> usize {
        (**self).rows()
    }

    fn cols(&self) -> usize {
        (**self).cols()
    }

    fn value(&self, row: usize, col: usize) -> f32 {
        (**self).value(row, col)
    }

    fn to_column_major(&self) -> Vec<f32> {
        (**self).to_column_major()
    }
}

// Single vectors.

impl QueryMatrix for [f32] {
    fn rows(&self) -> usize {
        self.len()
    }

    fn cols(&self) -> usize {
        1
    }

    fn value(&self, row: usize, _col: usize) -> f32 {
        self[row]
    }

    fn to_column_major(&self) -> Vec<f32> {
        self.to_vec()
    }
}

impl QueryMatrix for [f64] {
    fn rows(&self) -> usize {
        self.len()
    }

    fn cols(&self) -> usize {
        1
    }

    fn value(&self, row: usize, _col: usize) -> f32 {
        self[row] as f32
    }
}

impl<const N: usize> QueryMatrix for [f32; N] {
    fn rows(&self) -> usize {
        N
    }

    fn cols(&self) -> usize {
        1
    }

    fn value(&self, row: usize, _col: usize) -> f32 {
        self[row]
    }

    fn to_column_major(&self) -> Vec<f32> {
        self.to_vec()
    }
}

impl<const N: usize> QueryMatrix for [f64; N] {
    fn rows(&self) -> usize {
        N
    }

    fn cols(&self) -> usize {
        1
    }

    fn value(&self, row: usize, _col: usize) -> f32 {
        self[row] as f32
    }
}

impl QueryMatrix for Vec<f32> {
    fn rows(&self) -> usize {
        self.len()
    }

    fn cols(&self) -> usize {
        1
    }

    fn value(&self, row: usize, _col: usize) -> f32 {
        self[row]
    }

    fn to_column_major(&self) -> Vec<f32> {
        self.clone()
    }
}

impl QueryMatrix for Vec<f64> {
    fn rows(&self) -> usize {
        self.len()
    }

    fn cols(&self) -> usize {
        1
    }

    fn value(&self, row: usize, _col: usize) -> f32 {
        self[row] as f32
    }
}

// Batches.

impl QueryMatrix for DenseMatrix {
    fn rows(&self) -> usize {
        DenseMatrix::rows(self)
    }

    fn cols(&self) -> usize {
        DenseMatrix::cols(self)
    }

    fn value(&self, row: usize, col: usize) -> f32 {
        self.get(row, col) as f32
    }

    fn to_column_major(&self) -> Vec<f32> {
        self.as_slice().iter().map(|&v| v as f32).collect()
    }
}

impl<const N: usize> QueryMatrix for [[f64; N]] {
    fn rows(&self) -> usize {
        N
    }

    fn cols(&self) -> usize {
        self.len()
    }

    fn value(&self, row: usize, col: usize) -> f32 {
        self[col][row] as f32
    }
}

impl<const N: usize> QueryMatrix for Vec<[f64; N]> {
    fn rows(&self) -> usize {
        N
    }

    fn cols(&self) -> usize {
        self.len()
    }

    fn value(&self, row: usize, col: usize) -> f32 {
        self[col][row] as f32
    }
}

impl<const N: usize> QueryMatrix for [[f32; N]] {
    fn rows(&self) -> usize {
        N
    }

    fn cols(&self) -> usize {
        self.len()
    }

    fn value(&self, row: usize, col: usize) -> f32 {
        self[col][row]
    }

    fn to_column_major(&self) -> Vec<f32> {
        self.iter().flatten().copied().collect()
    }
}
