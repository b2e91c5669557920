//! Compressed-column sparse complex matrix
//!
//! [`SparseMatrix`] stores only entries that are non-zero under its zero
//! threshold. Entries live in three parallel arrays:
//!
//! - `col_ptrs`: `width + 1` non-decreasing offsets, `col_ptrs[width] == nnz`
//! - `row_indices`: row of each stored entry, ascending within a column
//! - `values`: the stored amplitudes
//!
//! The same type backs gate operators (square, `2^n x 2^n`) and state
//! vectors (`2^n x 1`).

use crate::complex::{ComplexExt, ZERO};
use crate::error::{MathError, Result};
use crate::tolerance::DEFAULT_ZERO_EPSILON;
use num_complex::Complex64;
use std::fmt;

/// Compressed sparse column matrix over `Complex64`
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    height: usize,
    width: usize,
    col_ptrs: Vec<usize>,
    row_indices: Vec<usize>,
    values: Vec<Complex64>,
    epsilon: f64,
}

impl SparseMatrix {
    /// Create an all-zero matrix with the default zero threshold
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            col_ptrs: vec![0; width + 1],
            row_indices: Vec::new(),
            values: Vec::new(),
            epsilon: DEFAULT_ZERO_EPSILON,
        }
    }

    /// Replace the zero threshold, pruning any stored entry that falls under it
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        if self.values.iter().any(|v| v.is_near_zero(epsilon)) {
            let mut builder = CscBuilder::new(self.height, self.width, epsilon);
            for col in 0..self.width {
                for idx in self.col_ptrs[col]..self.col_ptrs[col + 1] {
                    builder.push(self.row_indices[idx], self.values[idx]);
                }
                builder.finish_column();
            }
            return builder.build();
        }
        self
    }

    /// Square identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        Self {
            height: n,
            width: n,
            col_ptrs: (0..=n).collect(),
            row_indices: (0..n).collect(),
            values: vec![Complex64::new(1.0, 0.0); n],
            epsilon: DEFAULT_ZERO_EPSILON,
        }
    }

    /// Build from row-major dense rows
    ///
    /// # Errors
    /// Returns [`MathError::RaggedRows`] if rows differ in length.
    pub fn from_dense(rows: &[Vec<Complex64>]) -> Result<Self> {
        Self::from_dense_with(rows, DEFAULT_ZERO_EPSILON)
    }

    /// [`from_dense`](Self::from_dense) pruning at `epsilon`
    pub fn from_dense_with(rows: &[Vec<Complex64>], epsilon: f64) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        for (row, r) in rows.iter().enumerate() {
            if r.len() != width {
                return Err(MathError::RaggedRows {
                    row,
                    expected: width,
                    actual: r.len(),
                });
            }
        }

        let mut builder = CscBuilder::new(height, width, epsilon);
        for col in 0..width {
            for (row, r) in rows.iter().enumerate() {
                builder.push(row, r[col]);
            }
            builder.finish_column();
        }
        Ok(builder.build())
    }

    /// Build from a fixed-size square array such as a gate constant
    pub fn from_array<const N: usize>(matrix: &[[Complex64; N]; N]) -> Self {
        Self::from_array_with(matrix, DEFAULT_ZERO_EPSILON)
    }

    /// [`from_array`](Self::from_array) pruning at `epsilon`
    pub fn from_array_with<const N: usize>(matrix: &[[Complex64; N]; N], epsilon: f64) -> Self {
        let mut builder = CscBuilder::new(N, N, epsilon);
        for col in 0..N {
            for (row, r) in matrix.iter().enumerate() {
                builder.push(row, r[col]);
            }
            builder.finish_column();
        }
        builder.build()
    }

    /// Build from per-column `(row, value)` lists
    ///
    /// Each column is sorted by row, duplicate rows are summed and near-zero
    /// results are dropped.
    pub fn from_columns(height: usize, columns: Vec<Vec<(usize, Complex64)>>) -> Result<Self> {
        Self::from_columns_with(height, columns, DEFAULT_ZERO_EPSILON)
    }

    /// [`from_columns`](Self::from_columns) pruning at `epsilon`
    pub fn from_columns_with(
        height: usize,
        columns: Vec<Vec<(usize, Complex64)>>,
        epsilon: f64,
    ) -> Result<Self> {
        let width = columns.len();
        let mut builder = CscBuilder::new(height, width, epsilon);
        for (col, mut entries) in columns.into_iter().enumerate() {
            if let Some(&(row, _)) = entries.iter().find(|(row, _)| *row >= height) {
                return Err(MathError::IndexOutOfBounds {
                    row,
                    col,
                    height,
                    width,
                });
            }
            builder.push_unsorted(&mut entries);
        }
        Ok(builder.build())
    }

    /// Column vector of the given height with the listed non-zero entries
    pub fn column_vector(height: usize, entries: &[(usize, Complex64)]) -> Result<Self> {
        Self::from_columns(height, vec![entries.to_vec()])
    }

    pub fn column_vector_with(
        height: usize,
        entries: &[(usize, Complex64)],
        epsilon: f64,
    ) -> Result<Self> {
        Self::from_columns_with(height, vec![entries.to_vec()], epsilon)
    }

    pub(crate) fn from_parts(
        height: usize,
        width: usize,
        col_ptrs: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<Complex64>,
        epsilon: f64,
    ) -> Self {
        debug_assert_eq!(col_ptrs.len(), width + 1);
        debug_assert_eq!(col_ptrs[width], values.len());
        debug_assert_eq!(row_indices.len(), values.len());
        Self {
            height,
            width,
            col_ptrs,
            row_indices,
            values,
            epsilon,
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of stored (non-zero) entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Zero threshold used when pruning
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[inline]
    pub fn col_pointers(&self) -> &[usize] {
        &self.col_ptrs
    }

    #[inline]
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    #[inline]
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    #[inline]
    pub fn is_column_vector(&self) -> bool {
        self.width == 1
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.height == self.width
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.height || col >= self.width {
            return Err(MathError::IndexOutOfBounds {
                row,
                col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(())
    }

    /// Read one entry; absent entries are zero
    ///
    /// # Errors
    /// Returns [`MathError::IndexOutOfBounds`] outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Result<Complex64> {
        self.check_bounds(row, col)?;
        let range = self.col_ptrs[col]..self.col_ptrs[col + 1];
        Ok(self.row_indices[range.clone()]
            .iter()
            .position(|&r| r == row)
            .map_or(ZERO, |offset| self.values[range.start + offset]))
    }

    /// Write one entry
    ///
    /// Inserting a near-zero value stores nothing; overwriting an existing
    /// entry with a near-zero value removes it.
    ///
    /// # Errors
    /// Returns [`MathError::IndexOutOfBounds`] outside the matrix.
    pub fn put(&mut self, row: usize, col: usize, value: Complex64) -> Result<()> {
        self.check_bounds(row, col)?;
        let start = self.col_ptrs[col];
        let end = self.col_ptrs[col + 1];
        let zero = value.is_near_zero(self.epsilon);

        // First stored row in the column that is >= row
        let pos = start
            + self.row_indices[start..end]
                .iter()
                .take_while(|&&r| r < row)
                .count();

        if pos < end && self.row_indices[pos] == row {
            if zero {
                self.row_indices.remove(pos);
                self.values.remove(pos);
                self.col_ptrs[col + 1..].iter_mut().for_each(|p| *p -= 1);
            } else {
                self.values[pos] = value;
            }
        } else if !zero {
            self.row_indices.insert(pos, row);
            self.values.insert(pos, value);
            self.col_ptrs[col + 1..].iter_mut().for_each(|p| *p += 1);
        }
        Ok(())
    }

    /// Stored entries of one column as `(row, value)`
    ///
    /// # Errors
    /// Returns [`MathError::IndexOutOfBounds`] if `col >= width`.
    pub fn column(&self, col: usize) -> Result<impl Iterator<Item = (usize, Complex64)> + '_> {
        if col >= self.width {
            return Err(MathError::IndexOutOfBounds {
                row: 0,
                col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(self.column_entries(col))
    }

    #[inline]
    pub(crate) fn column_entries(&self, col: usize) -> impl Iterator<Item = (usize, Complex64)> + '_ {
        let range = self.col_ptrs[col]..self.col_ptrs[col + 1];
        self.row_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// All stored entries as `(row, col, value)`, column then row order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Complex64)> + '_ {
        (0..self.width).flat_map(move |col| {
            self.column_entries(col).map(move |(row, value)| (row, col, value))
        })
    }

    /// Copy of this matrix multiplied by a scalar
    pub fn scaled(&self, factor: Complex64) -> Self {
        let mut builder = CscBuilder::new(self.height, self.width, self.epsilon);
        for col in 0..self.width {
            for (row, value) in self.column_entries(col) {
                builder.push(row, value * factor);
            }
            builder.finish_column();
        }
        builder.build()
    }

    /// Sum of squared magnitudes of every stored entry
    pub fn sum_magnitude_squared(&self) -> f64 {
        self.values.iter().map(ComplexExt::magnitude_squared).sum()
    }

    /// Dense row-major copy, for debugging and display of small matrices
    ///
    /// # Errors
    /// Returns [`MathError::DenseLimitExceeded`] if `height * width > limit`.
    pub fn to_dense(&self, limit: usize) -> Result<Vec<Vec<Complex64>>> {
        let size = self.height.saturating_mul(self.width);
        if size > limit {
            return Err(MathError::DenseLimitExceeded {
                height: self.height,
                width: self.width,
                limit,
            });
        }
        let mut dense = vec![vec![ZERO; self.width]; self.height];
        for (row, col, value) in self.iter() {
            dense[row][col] = value;
        }
        Ok(dense)
    }

    /// Entry-wise comparison within `epsilon`
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        if self.height != other.height || self.width != other.width {
            return false;
        }
        let close = |a: &Self, b: &Self| {
            a.iter().all(|(row, col, value)| {
                b.get(row, col)
                    .map(|v| (v - value).is_near_zero(epsilon))
                    .unwrap_or(false)
            })
        };
        close(self, other) && close(other, self)
    }
}

impl fmt::Display for SparseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "SparseMatrix {}x{} ({} non-zero)",
            self.height,
            self.width,
            self.nnz()
        )?;
        for (row, col, value) in self.iter() {
            writeln!(f, "  ({}, {}): {:.6} + {:.6}i", row, col, value.re, value.im)?;
        }
        Ok(())
    }
}

/// Incremental column-by-column assembler for [`SparseMatrix`]
///
/// Columns are appended left to right. Within a column, [`CscBuilder::push`]
/// expects strictly ascending rows; [`CscBuilder::push_unsorted`] sorts and
/// merges first. Near-zero values are never stored.
#[derive(Debug)]
pub struct CscBuilder {
    height: usize,
    width: usize,
    epsilon: f64,
    col_ptrs: Vec<usize>,
    row_indices: Vec<usize>,
    values: Vec<Complex64>,
}

impl CscBuilder {
    pub fn new(height: usize, width: usize, epsilon: f64) -> Self {
        let mut col_ptrs = Vec::with_capacity(width + 1);
        col_ptrs.push(0);
        Self {
            height,
            width,
            epsilon,
            col_ptrs,
            row_indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Reserve room for `additional` entries
    pub fn reserve(&mut self, additional: usize) {
        self.row_indices.reserve(additional);
        self.values.reserve(additional);
    }

    /// Append an entry to the current column
    #[inline]
    pub fn push(&mut self, row: usize, value: Complex64) {
        debug_assert!(row < self.height);
        if !value.is_near_zero(self.epsilon) {
            self.row_indices.push(row);
            self.values.push(value);
        }
    }

    /// Close the current column
    #[inline]
    pub fn finish_column(&mut self) {
        self.col_ptrs.push(self.values.len());
    }

    /// Append a whole column given in any row order, summing duplicates
    pub fn push_unsorted(&mut self, entries: &mut [(usize, Complex64)]) {
        entries.sort_unstable_by_key(|&(row, _)| row);
        let mut iter = entries.iter().copied().peekable();
        while let Some((row, mut value)) = iter.next() {
            while let Some(&(next_row, next_value)) = iter.peek() {
                if next_row != row {
                    break;
                }
                value += next_value;
                iter.next();
            }
            self.push(row, value);
        }
        self.finish_column();
    }

    /// Finish assembly; unfinished trailing columns are closed as empty
    pub fn build(mut self) -> SparseMatrix {
        while self.col_ptrs.len() < self.width + 1 {
            self.col_ptrs.push(self.values.len());
        }
        SparseMatrix::from_parts(
            self.height,
            self.width,
            self.col_ptrs,
            self.row_indices,
            self.values,
            self.epsilon,
        )
    }
}
