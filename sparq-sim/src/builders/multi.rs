//! Controlled and multi-target operators by direct entry placement
//!
//! For basis column `j`:
//! - if any control bit of `j` is clear the column is the identity column
//! - otherwise the target bits of `j` form a local index `l`, and every entry
//!   `(r, v)` of column `l` of the local matrix lands on row `j` with its
//!   target bits replaced by `r`
//!
//! The local matrix is the 4x4 block for swap-like gates and `G ⊗ .. ⊗ G`
//! (one factor per target) otherwise. Target `i` in the operand list maps to
//! bit `i` of the local index.

use crate::error::Result;
use num_complex::Complex64;
use rayon::prelude::*;
use sparq_core::{ops, SparseMatrix};
use sparq_gates::GateKind;

/// Local operator acting on the target qubits only
pub fn local_matrix(
    kind: GateKind,
    angle: Option<f64>,
    num_targets: usize,
    epsilon: f64,
) -> Result<SparseMatrix> {
    let base = kind.matrix(angle)?.to_sparse_with(epsilon);
    if kind.is_swap_like() {
        return Ok(base);
    }
    Ok(ops::tensor_chain(std::iter::repeat(&base).take(num_targets), usize::MAX))
}

#[inline]
fn gather(index: usize, qubits: &[usize]) -> usize {
    qubits
        .iter()
        .enumerate()
        .fold(0, |acc, (i, &q)| acc | (((index >> q) & 1) << i))
}

#[inline]
fn scatter(base: usize, local: usize, qubits: &[usize]) -> usize {
    qubits
        .iter()
        .enumerate()
        .fold(base, |acc, (i, &q)| acc | (((local >> i) & 1) << q))
}

fn column_entries(
    j: usize,
    local: &SparseMatrix,
    targets: &[usize],
    control_mask: usize,
    target_mask: usize,
) -> Vec<(usize, Complex64)> {
    if j & control_mask != control_mask {
        return vec![(j, Complex64::new(1.0, 0.0))];
    }
    let l = gather(j, targets);
    let cleared = j & !target_mask;
    let start = local.col_pointers()[l];
    let end = local.col_pointers()[l + 1];
    local.row_indices()[start..end]
        .iter()
        .zip(&local.values()[start..end])
        .map(|(&r, &v)| (scatter(cleared, r, targets), v))
        .collect()
}

/// Full-register operator for `kind` on `targets`, guarded by `controls`
///
/// Operands must already be validated: in range and pairwise distinct.
pub fn build(
    num_qubits: usize,
    kind: GateKind,
    angle: Option<f64>,
    targets: &[usize],
    controls: &[usize],
    epsilon: f64,
    parallel_threshold: usize,
) -> Result<SparseMatrix> {
    let local = local_matrix(kind, angle, targets.len(), epsilon)?;
    let dim = 1usize << num_qubits;
    let control_mask = controls.iter().fold(0usize, |m, &c| m | (1 << c));
    let target_mask = targets.iter().fold(0usize, |m, &t| m | (1 << t));

    let columns: Vec<Vec<(usize, Complex64)>> = if dim >= parallel_threshold {
        (0..dim)
            .into_par_iter()
            .map(|j| column_entries(j, &local, targets, control_mask, target_mask))
            .collect()
    } else {
        (0..dim)
            .map(|j| column_entries(j, &local, targets, control_mask, target_mask))
            .collect()
    };
    Ok(SparseMatrix::from_columns_with(dim, columns, epsilon)?)
}
