//! Queued gate instructions
//!
//! A [`WorkItem`] is one validated gate call: an operator name, its qubit
//! operands and an optional angle. Items are immutable once built; every
//! constructor checks the operands against the register size so an invalid
//! call never reaches the queue.

use crate::error::{Result, SimulatorError};
use smallvec::SmallVec;
use sparq_gates::GateSpec;
use std::fmt;
use std::ops::Range;

/// Inline storage for qubit index lists
pub type QubitList = SmallVec<[usize; 4]>;

/// Name of the forward Fourier transform operator
pub const QFT: &str = "QFT";
/// Name of the inverse Fourier transform operator
pub const IQFT: &str = "IQFT";

/// Qubit operands of a work item, by arity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operands {
    /// One target, no controls
    Single { target: usize },
    /// One control and one target
    Controlled { control: usize, target: usize },
    /// Two targets of a swap-like gate
    Pair { first: usize, second: usize },
    /// Any other combination
    Multi {
        controls: QubitList,
        targets: QubitList,
    },
}

impl Operands {
    fn classify(targets: &[usize], controls: &[usize], swap_like: bool) -> Self {
        match (targets, controls) {
            ([target], []) => Operands::Single { target: *target },
            ([target], [control]) => Operands::Controlled {
                control: *control,
                target: *target,
            },
            ([first, second], []) if swap_like => Operands::Pair {
                first: *first,
                second: *second,
            },
            _ => Operands::Multi {
                controls: SmallVec::from_slice(controls),
                targets: SmallVec::from_slice(targets),
            },
        }
    }

    pub fn targets(&self) -> QubitList {
        match self {
            Operands::Single { target } | Operands::Controlled { target, .. } => {
                smallvec::smallvec![*target]
            }
            Operands::Pair { first, second } => smallvec::smallvec![*first, *second],
            Operands::Multi { targets, .. } => targets.clone(),
        }
    }

    pub fn controls(&self) -> QubitList {
        match self {
            Operands::Controlled { control, .. } => smallvec::smallvec![*control],
            Operands::Multi { controls, .. } => controls.clone(),
            _ => QubitList::new(),
        }
    }
}

/// One queued gate instance
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    name: String,
    operands: Operands,
    angle: Option<f64>,
}

fn check_indices(targets: &[usize], controls: &[usize], num_qubits: usize) -> Result<()> {
    let all: QubitList = targets.iter().chain(controls).copied().collect();
    if let Some(&qubit) = all.iter().find(|&&q| q >= num_qubits) {
        return Err(SimulatorError::InvalidQubit { qubit, num_qubits });
    }
    for i in 0..all.len() {
        for j in (i + 1)..all.len() {
            if all[i] == all[j] {
                return Err(SimulatorError::DuplicateQubit { qubit: all[i] });
            }
        }
    }
    Ok(())
}

impl WorkItem {
    /// Validate and build a gate work item
    ///
    /// # Errors
    /// - [`SimulatorError::InvalidQubit`] for an index outside `0..num_qubits`
    /// - [`SimulatorError::DuplicateQubit`] if targets and controls overlap or repeat
    /// - [`SimulatorError::Gate`] for an unknown name, wrong arity or bad angle
    pub fn new(
        name: &str,
        targets: &[usize],
        controls: &[usize],
        angle: Option<f64>,
        num_qubits: usize,
    ) -> Result<Self> {
        check_indices(targets, controls, num_qubits)?;

        let canonical = name.trim().to_ascii_uppercase();
        if canonical == QFT || canonical == IQFT {
            return Self::fourier_checked(&canonical, targets, controls, angle);
        }

        let spec = GateSpec::lookup(name)?;
        spec.check(targets.len(), controls.len(), angle)?;
        Ok(Self {
            name: canonical,
            operands: Operands::classify(targets, controls, spec.kind.is_swap_like()),
            angle,
        })
    }

    /// Single-target gate
    pub fn single(name: &str, target: usize, angle: Option<f64>, num_qubits: usize) -> Result<Self> {
        Self::new(name, &[target], &[], angle, num_qubits)
    }

    /// Gate with one control and one target
    pub fn controlled(
        name: &str,
        control: usize,
        target: usize,
        angle: Option<f64>,
        num_qubits: usize,
    ) -> Result<Self> {
        Self::new(name, &[target], &[control], angle, num_qubits)
    }

    /// Fourier transform over the contiguous qubit range `range`
    pub fn fourier(range: Range<usize>, inverse: bool, num_qubits: usize) -> Result<Self> {
        let targets: QubitList = range.collect();
        let name = if inverse { IQFT } else { QFT };
        Self::new(name, &targets, &[], None, num_qubits)
    }

    fn fourier_checked(
        name: &str,
        targets: &[usize],
        controls: &[usize],
        angle: Option<f64>,
    ) -> Result<Self> {
        if targets.is_empty() {
            return Err(SimulatorError::InvalidOperands(format!(
                "{} needs at least one qubit",
                name
            )));
        }
        if !controls.is_empty() || angle.is_some() {
            return Err(SimulatorError::InvalidOperands(format!(
                "{} takes neither controls nor an angle",
                name
            )));
        }
        if targets.windows(2).any(|w| w[1] != w[0] + 1) {
            return Err(SimulatorError::InvalidOperands(format!(
                "{} needs a contiguous ascending qubit range",
                name
            )));
        }
        Ok(Self {
            name: name.to_string(),
            operands: Operands::Multi {
                controls: QubitList::new(),
                targets: SmallVec::from_slice(targets),
            },
            angle: None,
        })
    }

    /// Uppercase operator name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operands(&self) -> &Operands {
        &self.operands
    }

    pub fn angle(&self) -> Option<f64> {
        self.angle
    }

    pub fn targets(&self) -> QubitList {
        self.operands.targets()
    }

    pub fn controls(&self) -> QubitList {
        self.operands.controls()
    }

    /// Whether this item is a whole Fourier transform
    pub fn is_fourier(&self) -> bool {
        self.name == QFT || self.name == IQFT
    }

    /// Re-check operand indices against a register size
    pub fn check_register(&self, num_qubits: usize) -> Result<()> {
        check_indices(&self.targets(), &self.controls(), num_qubits)
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(theta) = self.angle {
            write!(f, "({:.4})", theta)?;
        }
        write!(f, " targets={:?}", self.targets().as_slice())?;
        let controls = self.controls();
        if !controls.is_empty() {
            write!(f, " controls={:?}", controls.as_slice())?;
        }
        Ok(())
    }
}
