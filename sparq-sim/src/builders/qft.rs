//! Quantum Fourier transform over a contiguous qubit range
//!
//! Forward circuit on `lo..=hi`, highest qubit first:
//!
//! ```text
//! for i in hi..=lo (descending):
//!     H(i)
//!     for j in i-1..=lo (descending): CR1(control j, target i, π / 2^(i-j))
//! SWAP(lo + k, hi - k) for k < len / 2
//! ```
//!
//! The inverse is the same list reversed with every step replaced by its
//! adjoint (`CR1` becomes `CR1I`).

use crate::director::GateDirector;
use crate::error::{Result, SimulatorError};
use crate::work::WorkItem;
use sparq_core::{ops, SparseMatrix};
use sparq_gates::GateKind;
use std::f64::consts::PI;

fn step_name(kind: GateKind, controlled: bool) -> String {
    if controlled {
        format!("C{}", kind.name())
    } else {
        kind.name().to_string()
    }
}

fn step(
    kind: GateKind,
    angle: Option<f64>,
    targets: &[usize],
    controls: &[usize],
    num_qubits: usize,
) -> Result<WorkItem> {
    WorkItem::new(
        &step_name(kind, !controls.is_empty()),
        targets,
        controls,
        angle,
        num_qubits,
    )
}

/// Elementary gates of the transform on `targets`, in application order
///
/// `targets` must be contiguous and ascending.
pub fn fourier_steps(targets: &[usize], inverse: bool, num_qubits: usize) -> Result<Vec<WorkItem>> {
    let (lo, hi) = match (targets.first(), targets.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => {
            return Err(SimulatorError::InvalidOperands(
                "Fourier transform needs at least one qubit".to_string(),
            ))
        }
    };

    let mut plan: Vec<(GateKind, Option<f64>, Vec<usize>, Vec<usize>)> = Vec::new();
    for i in (lo..=hi).rev() {
        plan.push((GateKind::Hadamard, None, vec![i], vec![]));
        for j in (lo..i).rev() {
            let theta = PI / (1u64 << (i - j)) as f64;
            plan.push((GateKind::Phase, Some(theta), vec![i], vec![j]));
        }
    }
    let len = hi - lo + 1;
    for k in 0..len / 2 {
        plan.push((GateKind::Swap, None, vec![lo + k, hi - k], vec![]));
    }

    if inverse {
        plan.reverse();
        for entry in plan.iter_mut() {
            let (kind, angle) = entry.0.adjoint(entry.1).ok_or_else(|| {
                SimulatorError::InvalidOperands(format!("{} has no catalog adjoint", entry.0))
            })?;
            entry.0 = kind;
            entry.1 = angle;
        }
    }

    plan.iter()
        .map(|(kind, angle, t, c)| step(*kind, *angle, t, c, num_qubits))
        .collect()
}

/// Product of every step operator, first step rightmost
pub fn build(director: &GateDirector, targets: &[usize], inverse: bool) -> Result<SparseMatrix> {
    let n = director.num_qubits();
    let steps = fourier_steps(targets, inverse, n)?;
    let mut acc = SparseMatrix::identity(1 << n).with_epsilon(director.tolerance().zero);
    for item in &steps {
        let op = director.build(item)?;
        acc = ops::multiply_with(&op, &acc, director.parallel_threshold())?;
    }
    Ok(acc)
}
