//! # Base Matrix Module
//!
//! Resizable 2-D container with the row operations needed by the elimination:
//! appending, deleting, swapping and cloning rows. Cells live in a `nalgebra::DMatrix<T>`;
//! rows are added and removed with nalgebra's `insert_row`/`remove_row`.
//!
//! The row and column counts are taken from the storage. A matrix without rows reports 0 columns,
//! so the first appended row fixes the width of the matrix.

use nalgebra::{DMatrix, Scalar};
use std::ops::{Index, IndexMut};
use thiserror::Error;

use super::rational::RationalError;

/// error types of matrix row operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("row has {found} elements while matrix has {expected} columns")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("invalid index {index}: matrix has {len} rows")]
    InvalidIndex { index: usize, len: usize },
    #[error("invalid column index {index}: matrix has {len} columns")]
    InvalidColumn { index: usize, len: usize },
    #[error("arithmetic error in matrix: {0}")]
    Arithmetic(#[from] RationalError),
}

/// Generic matrix with row operations
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: Scalar> {
    data: DMatrix<T>,
}

impl<T: Scalar> Default for Matrix<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Matrix<T> {
    /// empty 0x0 matrix
    pub fn new() -> Self {
        Self {
            data: DMatrix::from_vec(0, 0, Vec::new()),
        }
    }

    /// rows x cols matrix filled with one value
    pub fn with_size(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            data: DMatrix::from_element(rows, cols, fill),
        }
    }

    /// Builds a matrix from a vector of rows; every row must have the length of the first one.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, MatrixError> {
        let mut matrix = Self::new();
        for row in rows {
            matrix.append_row(row)?;
        }
        Ok(matrix)
    }

    pub fn rows_count(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols_count(&self) -> usize {
        if self.data.nrows() == 0 {
            return 0;
        }
        self.data.ncols()
    }

    pub fn is_valid_row_index(&self, index: usize) -> bool {
        index < self.rows_count()
    }

    pub fn is_valid_col_index(&self, index: usize) -> bool {
        index < self.cols_count()
    }

    fn check_row(&self, index: usize) -> Result<(), MatrixError> {
        if self.is_valid_row_index(index) {
            Ok(())
        } else {
            Err(MatrixError::InvalidIndex {
                index,
                len: self.rows_count(),
            })
        }
    }

    pub(crate) fn check_col(&self, index: usize) -> Result<(), MatrixError> {
        if self.is_valid_col_index(index) {
            Ok(())
        } else {
            Err(MatrixError::InvalidColumn {
                index,
                len: self.cols_count(),
            })
        }
    }

    /// Appends a row at the bottom of the matrix
    pub fn append_row(&mut self, row: Vec<T>) -> Result<&mut Self, MatrixError> {
        let rows = self.rows_count();
        if rows == 0 {
            self.data = DMatrix::from_row_slice(1, row.len(), &row);
            return Ok(self);
        }
        let cols = self.cols_count();
        if row.len() != cols {
            return Err(MatrixError::DimensionMismatch {
                expected: cols,
                found: row.len(),
            });
        }
        let Some(first) = row.first().cloned() else {
            self.data = DMatrix::from_vec(rows + 1, 0, Vec::new());
            return Ok(self);
        };
        let old = std::mem::replace(&mut self.data, DMatrix::from_vec(0, 0, Vec::new()));
        let mut grown = old.insert_row(rows, first);
        for (j, value) in row.into_iter().enumerate() {
            grown[(rows, j)] = value;
        }
        self.data = grown;
        Ok(self)
    }

    /// Removes the row with the given index
    pub fn delete_row(&mut self, index: usize) -> Result<&mut Self, MatrixError> {
        self.check_row(index)?;
        let old = std::mem::replace(&mut self.data, DMatrix::from_vec(0, 0, Vec::new()));
        self.data = old.remove_row(index);
        Ok(self)
    }

    pub fn swap_rows(&mut self, first: usize, second: usize) -> Result<&mut Self, MatrixError> {
        self.check_row(first)?;
        self.check_row(second)?;
        if first != second {
            self.data.swap_rows(first, second);
        }
        Ok(self)
    }

    /// independent copy of one row
    pub fn clone_row(&self, index: usize) -> Result<Vec<T>, MatrixError> {
        self.check_row(index)?;
        Ok(self.data.row(index).iter().cloned().collect())
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if self.is_valid_row_index(row) && self.is_valid_col_index(col) {
            Some(&self.data[(row, col)])
        } else {
            None
        }
    }

    /// all rows as vectors, top to bottom
    pub fn rows(&self) -> Vec<Vec<T>> {
        (0..self.rows_count())
            .map(|i| self.data.row(i).iter().cloned().collect())
            .collect()
    }
}

impl<T: Scalar + ToString> Matrix<T> {
    /// string representation of every cell
    pub fn to_string_rows(&self) -> Vec<Vec<String>> {
        (0..self.rows_count())
            .map(|i| self.data.row(i).iter().map(|cell| cell.to_string()).collect())
            .collect()
    }
}

impl<T: Scalar> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &T {
        &self.data[index]
    }
}

impl<T: Scalar> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut T {
        &mut self.data[index]
    }
}
