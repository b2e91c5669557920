//! Stateless sparse matrix arithmetic
//!
//! Every function returns a fresh matrix and leaves its inputs untouched.
//! Results inherit the zero threshold of the left operand.
//!
//! Products only ever visit stored entries: [`multiply`] walks each column of
//! the right operand and, for every stored `B(k, j)`, the stored column `k`
//! of the left operand. [`tensor_product`] writes its output directly in
//! column-then-row order.

use crate::complex::{ComplexExt, ZERO};
use crate::error::{MathError, Result};
use crate::sparse::{CscBuilder, SparseMatrix};
use num_complex::Complex64;
use rayon::prelude::*;

/// Result height at which products switch to the rayon implementation
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 16384;

/// Largest dense product accepted by [`multiply_dense`]
pub const DENSE_CROSS_CHECK_LIMIT: usize = 1 << 20;

fn shape(m: &SparseMatrix) -> (usize, usize) {
    (m.height(), m.width())
}

/// Entry-wise sum of two matrices of identical shape
pub fn add(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
    if shape(a) != shape(b) {
        return Err(MathError::mismatch("add", shape(a), shape(b)));
    }

    let mut builder = CscBuilder::new(a.height(), a.width(), a.epsilon());
    builder.reserve(a.nnz() + b.nnz());
    for col in 0..a.width() {
        let mut left = a.column_entries(col).peekable();
        let mut right = b.column_entries(col).peekable();
        loop {
            match (left.peek().copied(), right.peek().copied()) {
                (Some((ra, va)), Some((rb, vb))) if ra == rb => {
                    builder.push(ra, va + vb);
                    left.next();
                    right.next();
                }
                (Some((ra, va)), Some((rb, _))) if ra < rb => {
                    builder.push(ra, va);
                    left.next();
                }
                (_, Some((rb, vb))) => {
                    builder.push(rb, vb);
                    right.next();
                }
                (Some((ra, va)), None) => {
                    builder.push(ra, va);
                    left.next();
                }
                (None, None) => break,
            }
        }
        builder.finish_column();
    }
    Ok(builder.build())
}

/// Sparse accumulator for one output column
///
/// `dense` is indexed by output row; `touched` records which rows were
/// written so only those are read back and cleared.
struct ColumnAccumulator {
    dense: Vec<Complex64>,
    occupied: Vec<bool>,
    touched: Vec<usize>,
}

impl ColumnAccumulator {
    fn new(height: usize) -> Self {
        Self {
            dense: vec![ZERO; height],
            occupied: vec![false; height],
            touched: Vec::new(),
        }
    }

    #[inline]
    fn accumulate(&mut self, row: usize, value: Complex64) {
        if !self.occupied[row] {
            self.occupied[row] = true;
            self.touched.push(row);
        }
        self.dense[row] += value;
    }

    /// Drain into sorted `(row, value)` pairs, dropping near-zero sums
    fn drain(&mut self, epsilon: f64) -> Vec<(usize, Complex64)> {
        self.touched.sort_unstable();
        let mut out = Vec::with_capacity(self.touched.len());
        for &row in &self.touched {
            let value = self.dense[row];
            if !value.is_near_zero(epsilon) {
                out.push((row, value));
            }
            self.dense[row] = ZERO;
            self.occupied[row] = false;
        }
        self.touched.clear();
        out
    }
}

fn product_column(
    a: &SparseMatrix,
    b: &SparseMatrix,
    col: usize,
    acc: &mut ColumnAccumulator,
) -> Vec<(usize, Complex64)> {
    for (k, b_kj) in b.column_entries(col) {
        for (i, a_ik) in a.column_entries(k) {
            acc.accumulate(i, a_ik * b_kj);
        }
    }
    acc.drain(a.epsilon())
}

fn assemble(height: usize, epsilon: f64, columns: Vec<Vec<(usize, Complex64)>>) -> SparseMatrix {
    let mut builder = CscBuilder::new(height, columns.len(), epsilon);
    builder.reserve(columns.iter().map(Vec::len).sum());
    for column in columns {
        for (row, value) in column {
            builder.push(row, value);
        }
        builder.finish_column();
    }
    builder.build()
}

/// Matrix product `a x b`
///
/// # Errors
/// Returns [`MathError::DimensionMismatch`] unless `a.width == b.height`.
pub fn multiply(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
    multiply_with(a, b, usize::MAX)
}

/// Matrix product that fans out across columns of `b` once the result
/// reaches `parallel_threshold` rows and `b` has more than one column
pub fn multiply_with(
    a: &SparseMatrix,
    b: &SparseMatrix,
    parallel_threshold: usize,
) -> Result<SparseMatrix> {
    if a.width() != b.height() {
        return Err(MathError::mismatch("multiply", shape(a), shape(b)));
    }

    let columns: Vec<_> = if a.height() >= parallel_threshold && b.width() > 1 {
        (0..b.width())
            .into_par_iter()
            .map_init(
                || ColumnAccumulator::new(a.height()),
                |acc, col| product_column(a, b, col, acc),
            )
            .collect()
    } else {
        let mut acc = ColumnAccumulator::new(a.height());
        (0..b.width())
            .map(|col| product_column(a, b, col, &mut acc))
            .collect()
    };
    Ok(assemble(a.height(), a.epsilon(), columns))
}

/// Operator applied to a state: `op x vector`
///
/// # Errors
/// Returns [`MathError::NotAColumnVector`] if `vector` has more than one
/// column, or a dimension mismatch if the operator width differs from its height.
pub fn apply_to_vector(op: &SparseMatrix, vector: &SparseMatrix) -> Result<SparseMatrix> {
    if !vector.is_column_vector() {
        return Err(MathError::NotAColumnVector {
            height: vector.height(),
            width: vector.width(),
        });
    }
    if op.width() != vector.height() {
        return Err(MathError::mismatch("apply", shape(op), shape(vector)));
    }
    let mut acc = ColumnAccumulator::new(op.height());
    let column = product_column(op, vector, 0, &mut acc);
    Ok(assemble(op.height(), op.epsilon(), vec![column]))
}

/// Dense O(n^3) product used to cross-check [`multiply`] on small inputs
///
/// # Errors
/// Fails on shape mismatch or when either operand exceeds
/// [`DENSE_CROSS_CHECK_LIMIT`] entries.
pub fn multiply_dense(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
    if a.width() != b.height() {
        return Err(MathError::mismatch("multiply_dense", shape(a), shape(b)));
    }
    let left = a.to_dense(DENSE_CROSS_CHECK_LIMIT)?;
    let right = b.to_dense(DENSE_CROSS_CHECK_LIMIT)?;

    let mut builder = CscBuilder::new(a.height(), b.width(), a.epsilon());
    for j in 0..b.width() {
        for (i, row) in left.iter().enumerate() {
            let mut sum = ZERO;
            for (k, &a_ik) in row.iter().enumerate() {
                sum += a_ik * right[k][j];
            }
            builder.push(i, sum);
        }
        builder.finish_column();
    }
    Ok(builder.build())
}

fn transpose_map(m: &SparseMatrix, map: impl Fn(Complex64) -> Complex64) -> SparseMatrix {
    let (height, width) = (m.width(), m.height());
    let mut counts = vec![0usize; width + 1];
    for &row in m.row_indices() {
        counts[row + 1] += 1;
    }
    for i in 0..width {
        counts[i + 1] += counts[i];
    }

    let col_ptrs = counts.clone();
    let mut next = counts;
    let mut row_indices = vec![0usize; m.nnz()];
    let mut values = vec![ZERO; m.nnz()];
    for (row, col, value) in m.iter() {
        let slot = next[row];
        row_indices[slot] = col;
        values[slot] = map(value);
        next[row] += 1;
    }
    SparseMatrix::from_parts(height, width, col_ptrs, row_indices, values, m.epsilon())
}

/// Transpose
pub fn transpose(m: &SparseMatrix) -> SparseMatrix {
    transpose_map(m, |v| v)
}

/// Conjugate transpose (adjoint)
pub fn conjugate_transpose(m: &SparseMatrix) -> SparseMatrix {
    transpose_map(m, |v| v.conj())
}

/// Outer product `v · w†` of two column vectors
///
/// With `w == v` this is the projector onto `v`.
pub fn outer_product(v: &SparseMatrix, w: &SparseMatrix) -> Result<SparseMatrix> {
    for m in [v, w] {
        if !m.is_column_vector() {
            return Err(MathError::NotAColumnVector {
                height: m.height(),
                width: m.width(),
            });
        }
    }

    let mut builder = CscBuilder::new(v.height(), w.height(), v.epsilon());
    builder.reserve(v.nnz() * w.nnz());
    let mut w_entries = w.column_entries(0).peekable();
    for col in 0..w.height() {
        if let Some(&(row, w_j)) = w_entries.peek() {
            if row == col {
                let factor = w_j.conj();
                for (i, v_i) in v.column_entries(0) {
                    builder.push(i, v_i * factor);
                }
                w_entries.next();
            }
        }
        builder.finish_column();
    }
    Ok(builder.build())
}

fn tensor_columns(a: &SparseMatrix, b: &SparseMatrix, j1: usize) -> Vec<Vec<(usize, Complex64)>> {
    let h2 = b.height();
    (0..b.width())
        .map(|j2| {
            let mut column = Vec::new();
            for (i1, a_val) in a.column_entries(j1) {
                for (i2, b_val) in b.column_entries(j2) {
                    column.push((i1 * h2 + i2, a_val * b_val));
                }
            }
            column
        })
        .collect()
}

/// Kronecker product `a ⊗ b`
///
/// Entry `(i1*h2 + i2, j1*w2 + j2)` of the result is `a(i1, j1) * b(i2, j2)`.
pub fn tensor_product(a: &SparseMatrix, b: &SparseMatrix) -> SparseMatrix {
    tensor_product_with(a, b, usize::MAX)
}

/// Kronecker product that distributes left-operand columns over rayon once
/// the result height reaches `parallel_threshold`
pub fn tensor_product_with(
    a: &SparseMatrix,
    b: &SparseMatrix,
    parallel_threshold: usize,
) -> SparseMatrix {
    let height = a.height() * b.height();

    let columns: Vec<Vec<(usize, Complex64)>> = if height >= parallel_threshold {
        (0..a.width())
            .into_par_iter()
            .flat_map_iter(|j1| tensor_columns(a, b, j1))
            .collect()
    } else {
        (0..a.width())
            .flat_map(|j1| tensor_columns(a, b, j1))
            .collect()
    };
    assemble(height, a.epsilon(), columns)
}

/// Kronecker product of a sequence, left to right; the empty product is `1x1` identity
pub fn tensor_chain<'a, I>(factors: I, parallel_threshold: usize) -> SparseMatrix
where
    I: IntoIterator<Item = &'a SparseMatrix>,
{
    let mut iter = factors.into_iter();
    let Some(first) = iter.next() else {
        return SparseMatrix::identity(1);
    };
    iter.fold(first.clone(), |acc, m| {
        tensor_product_with(&acc, m, parallel_threshold)
    })
}

/// Whether `m · m† == I` within `epsilon`
pub fn is_unitary(m: &SparseMatrix, epsilon: f64) -> bool {
    if !m.is_square() {
        return false;
    }
    multiply(m, &conjugate_transpose(m))
        .map(|p| p.approx_eq(&SparseMatrix::identity(m.height()), epsilon))
        .unwrap_or(false)
}
