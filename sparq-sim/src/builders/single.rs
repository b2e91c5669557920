//! Full-register operator for one uncontrolled single-qubit gate

use crate::error::Result;
use sparq_core::{ops, SparseMatrix};
use sparq_gates::GateKind;

/// `I ⊗ .. ⊗ G ⊗ .. ⊗ I` with `G` at `target`
///
/// The highest qubit is the leftmost factor, so qubit `k` is bit `k` of the
/// basis index.
pub fn build(
    num_qubits: usize,
    kind: GateKind,
    angle: Option<f64>,
    target: usize,
    epsilon: f64,
    parallel_threshold: usize,
) -> Result<SparseMatrix> {
    debug_assert!(!kind.is_swap_like());
    let gate = kind.matrix(angle)?.to_sparse_with(epsilon);
    let id = SparseMatrix::identity(2).with_epsilon(epsilon);
    let factors: Vec<&SparseMatrix> = (0..num_qubits)
        .rev()
        .map(|q| if q == target { &gate } else { &id })
        .collect();
    Ok(ops::tensor_chain(factors, parallel_threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sparq_core::ops::is_unitary;

    #[test]
    fn test_x_on_qubit_one() {
        let op = build(2, GateKind::PauliX, None, 1, 1e-10, usize::MAX).unwrap();
        assert_eq!(op.height(), 4);
        assert_eq!(op.nnz(), 4);
        // |00⟩ -> |10⟩, |01⟩ -> |11⟩
        assert_relative_eq!(op.get(2, 0).unwrap().re, 1.0);
        assert_relative_eq!(op.get(3, 1).unwrap().re, 1.0);
        assert_relative_eq!(op.get(0, 2).unwrap().re, 1.0);
    }

    #[test]
    fn test_hadamard_unitary() {
        let op = build(3, GateKind::Hadamard, None, 0, 1e-10, usize::MAX).unwrap();
        assert_eq!(op.nnz(), 16);
        assert!(is_unitary(&op, 1e-10));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let seq = build(5, GateKind::RotationY, Some(0.3), 2, 1e-10, usize::MAX).unwrap();
        let par = build(5, GateKind::RotationY, Some(0.3), 2, 1e-10, 2).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_missing_angle() {
        assert!(build(1, GateKind::RotationX, None, 0, 1e-10, usize::MAX).is_err());
    }
}
