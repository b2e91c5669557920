//! Gate director: work item in, full-register operator out

use crate::builders::{multi, qft, single};
use crate::error::Result;
use crate::work::{Operands, QubitList, WorkItem};
use sparq_core::{SparseMatrix, Tolerance};
use sparq_gates::{GateKind, GateSpec};
use tracing::trace;

/// Construction algorithm chosen for a work item
#[derive(Debug, Clone, PartialEq)]
pub enum BuildStrategy {
    /// Uncontrolled single-target gate, tensored with identities
    SingleQubit {
        kind: GateKind,
        target: usize,
        angle: Option<f64>,
    },
    /// Controlled, multi-target or swap-like gate, placed entry by entry
    MultiQubit {
        kind: GateKind,
        angle: Option<f64>,
        targets: QubitList,
        controls: QubitList,
    },
    /// Whole Fourier transform as one aggregate operator
    Fourier { targets: QubitList, inverse: bool },
}

/// Builds operators for a register of fixed size
#[derive(Debug, Clone)]
pub struct GateDirector {
    num_qubits: usize,
    tolerance: Tolerance,
    parallel_threshold: usize,
}

impl GateDirector {
    pub fn new(num_qubits: usize, tolerance: Tolerance, parallel_threshold: usize) -> Self {
        Self {
            num_qubits,
            tolerance,
            parallel_threshold,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Resolve the gate name and pick a builder
    ///
    /// Operands are re-checked against this register, so an item built for a
    /// larger register is rejected here.
    pub fn strategy(&self, item: &WorkItem) -> Result<BuildStrategy> {
        item.check_register(self.num_qubits)?;

        if item.is_fourier() {
            return Ok(BuildStrategy::Fourier {
                targets: item.targets(),
                inverse: item.name() == crate::work::IQFT,
            });
        }

        let spec = GateSpec::lookup(item.name())?;
        let strategy = match item.operands() {
            Operands::Single { target } if !spec.kind.is_swap_like() => BuildStrategy::SingleQubit {
                kind: spec.kind,
                target: *target,
                angle: item.angle(),
            },
            _ => BuildStrategy::MultiQubit {
                kind: spec.kind,
                angle: item.angle(),
                targets: item.targets(),
                controls: item.controls(),
            },
        };
        Ok(strategy)
    }

    /// Full `2^n x 2^n` operator for `item`
    pub fn build(&self, item: &WorkItem) -> Result<SparseMatrix> {
        let strategy = self.strategy(item)?;
        trace!(item = %item, ?strategy, "building operator");
        self.build_strategy(&strategy)
    }

    pub fn build_strategy(&self, strategy: &BuildStrategy) -> Result<SparseMatrix> {
        let eps = self.tolerance.zero;
        match strategy {
            BuildStrategy::SingleQubit {
                kind,
                target,
                angle,
            } => single::build(
                self.num_qubits,
                *kind,
                *angle,
                *target,
                eps,
                self.parallel_threshold,
            ),
            BuildStrategy::MultiQubit {
                kind,
                angle,
                targets,
                controls,
            } => multi::build(
                self.num_qubits,
                *kind,
                *angle,
                targets,
                controls,
                eps,
                self.parallel_threshold,
            ),
            BuildStrategy::Fourier { targets, inverse } => qft::build(self, targets, *inverse),
        }
    }
}
