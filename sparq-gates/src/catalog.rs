//! Closed catalog of named gates
//!
//! Every accepted spelling maps to a [`GateKind`] plus the number of control
//! qubits the spelling implies (`CX` needs one, `TOFFOLI` two). Lookup is
//! case-insensitive and total over the names listed in [`GateSpec::lookup`].

use crate::error::{GateError, Result};
use crate::matrices::{self, Matrix2, Matrix4};
use sparq_core::tolerance::DEFAULT_ZERO_EPSILON;
use sparq_core::SparseMatrix;
use std::fmt;

/// The base unitary of a gate, independent of how many controls guard it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    Identity,
    Hadamard,
    PauliX,
    PauliY,
    PauliZ,
    S,
    SInverse,
    T,
    TInverse,
    Swap,
    ISwap,
    RotationX,
    RotationY,
    RotationZ,
    Phase,
    PhaseInverse,
}

/// Matrix of a base gate at its natural size
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateMatrix {
    Single(Matrix2),
    Two(Matrix4),
}

impl GateMatrix {
    pub fn to_sparse(&self) -> SparseMatrix {
        self.to_sparse_with(DEFAULT_ZERO_EPSILON)
    }

    /// Sparse form pruned at `epsilon`
    pub fn to_sparse_with(&self, epsilon: f64) -> SparseMatrix {
        match self {
            GateMatrix::Single(m) => SparseMatrix::from_array_with(m, epsilon),
            GateMatrix::Two(m) => SparseMatrix::from_array_with(m, epsilon),
        }
    }
}

impl GateKind {
    /// Short uppercase name of the uncontrolled gate
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Identity => "ID",
            GateKind::Hadamard => "H",
            GateKind::PauliX => "X",
            GateKind::PauliY => "Y",
            GateKind::PauliZ => "Z",
            GateKind::S => "S",
            GateKind::SInverse => "SI",
            GateKind::T => "T",
            GateKind::TInverse => "TI",
            GateKind::Swap => "SWAP",
            GateKind::ISwap => "ISWAP",
            GateKind::RotationX => "RX",
            GateKind::RotationY => "RY",
            GateKind::RotationZ => "RZ",
            GateKind::Phase => "R1",
            GateKind::PhaseInverse => "R1I",
        }
    }

    /// Whether the matrix is generated from an angle
    pub fn is_parametrized(&self) -> bool {
        matches!(
            self,
            GateKind::RotationX
                | GateKind::RotationY
                | GateKind::RotationZ
                | GateKind::Phase
                | GateKind::PhaseInverse
        )
    }

    /// Whether the gate acts on a pair of targets as a 4x4 block
    pub fn is_swap_like(&self) -> bool {
        matches!(self, GateKind::Swap | GateKind::ISwap)
    }

    /// Qubits the base matrix acts on
    pub fn num_qubits(&self) -> usize {
        if self.is_swap_like() {
            2
        } else {
            1
        }
    }

    /// Check the angle argument against the gate's parameter rule
    pub fn check_angle(&self, angle: Option<f64>) -> Result<()> {
        match (self.is_parametrized(), angle) {
            (true, None) => Err(GateError::MissingAngle {
                gate: self.name().to_string(),
            }),
            (true, Some(theta)) if !theta.is_finite() => Err(GateError::InvalidAngle {
                gate: self.name().to_string(),
                angle: theta,
            }),
            (false, Some(_)) => Err(GateError::UnexpectedAngle {
                gate: self.name().to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Base matrix, generated from `angle` for parametrized kinds
    ///
    /// # Errors
    /// Fails if the angle rule from [`GateKind::check_angle`] is violated.
    pub fn matrix(&self, angle: Option<f64>) -> Result<GateMatrix> {
        self.check_angle(angle)?;
        let theta = angle.unwrap_or(0.0);
        let single = match self {
            GateKind::Swap => return Ok(GateMatrix::Two(matrices::SWAP)),
            GateKind::ISwap => return Ok(GateMatrix::Two(matrices::ISWAP)),
            GateKind::Identity => matrices::IDENTITY,
            GateKind::Hadamard => matrices::HADAMARD,
            GateKind::PauliX => matrices::PAULI_X,
            GateKind::PauliY => matrices::PAULI_Y,
            GateKind::PauliZ => matrices::PAULI_Z,
            GateKind::S => matrices::S_GATE,
            GateKind::SInverse => matrices::S_INVERSE,
            GateKind::T => matrices::T_GATE,
            GateKind::TInverse => matrices::T_INVERSE,
            GateKind::RotationX => matrices::rotation_x(theta),
            GateKind::RotationY => matrices::rotation_y(theta),
            GateKind::RotationZ => matrices::rotation_z(theta),
            GateKind::Phase => matrices::phase(theta),
            GateKind::PhaseInverse => matrices::phase_inverse(theta),
        };
        Ok(GateMatrix::Single(single))
    }

    /// Kind and angle of the adjoint gate, when the catalog contains it
    ///
    /// iSWAP† has no entry of its own, so it yields `None`.
    pub fn adjoint(&self, angle: Option<f64>) -> Option<(GateKind, Option<f64>)> {
        let adjoint = match self {
            GateKind::S => (GateKind::SInverse, angle),
            GateKind::SInverse => (GateKind::S, angle),
            GateKind::T => (GateKind::TInverse, angle),
            GateKind::TInverse => (GateKind::T, angle),
            GateKind::Phase => (GateKind::PhaseInverse, angle),
            GateKind::PhaseInverse => (GateKind::Phase, angle),
            GateKind::RotationX | GateKind::RotationY | GateKind::RotationZ => {
                (*self, angle.map(|theta| -theta))
            }
            GateKind::ISwap => return None,
            GateKind::Identity
            | GateKind::Hadamard
            | GateKind::PauliX
            | GateKind::PauliY
            | GateKind::PauliZ
            | GateKind::Swap => (*self, angle),
        };
        Some(adjoint)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved gate name: base kind plus operand requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSpec {
    pub kind: GateKind,
    /// Minimum number of control qubits implied by the name
    pub controls: usize,
    /// Exact number of targets, when the name fixes it
    pub targets: Option<usize>,
}

impl GateSpec {
    const fn plain(kind: GateKind) -> Self {
        Self {
            kind,
            controls: 0,
            targets: None,
        }
    }

    const fn controlled(kind: GateKind, controls: usize) -> Self {
        Self {
            kind,
            controls,
            targets: None,
        }
    }

    /// Resolve a gate name
    ///
    /// Accepted names (case-insensitive):
    /// `ID I H X NOT Y Z S SI SDG T TI TDG SWAP ISWAP RX RY RZ R1 P PHASE R1I`,
    /// their one-control forms `CX CNOT CY CZ CH CS CSI CT CTI CRX CRY CRZ CR1 CR1I
    /// CSWAP FREDKIN CXX`, and the two-control forms `CCX TOFFOLI CCZ`.
    ///
    /// # Errors
    /// Returns [`GateError::UnknownGate`] for any other name.
    pub fn lookup(name: &str) -> Result<Self> {
        use GateKind::*;

        let upper = name.trim().to_ascii_uppercase();
        let spec = match upper.as_str() {
            "ID" | "I" => Self::plain(Identity),
            "H" => Self::plain(Hadamard),
            "X" | "NOT" => Self::plain(PauliX),
            "Y" => Self::plain(PauliY),
            "Z" => Self::plain(PauliZ),
            "S" => Self::plain(S),
            "SI" | "SDG" => Self::plain(SInverse),
            "T" => Self::plain(T),
            "TI" | "TDG" => Self::plain(TInverse),
            "SWAP" => Self::plain(Swap),
            "ISWAP" => Self::plain(ISwap),
            "RX" => Self::plain(RotationX),
            "RY" => Self::plain(RotationY),
            "RZ" => Self::plain(RotationZ),
            "R1" | "P" | "PHASE" => Self::plain(Phase),
            "R1I" => Self::plain(PhaseInverse),

            "CX" | "CNOT" => Self::controlled(PauliX, 1),
            "CY" => Self::controlled(PauliY, 1),
            "CZ" => Self::controlled(PauliZ, 1),
            "CH" => Self::controlled(Hadamard, 1),
            "CS" => Self::controlled(S, 1),
            "CSI" => Self::controlled(SInverse, 1),
            "CT" => Self::controlled(T, 1),
            "CTI" => Self::controlled(TInverse, 1),
            "CRX" => Self::controlled(RotationX, 1),
            "CRY" => Self::controlled(RotationY, 1),
            "CRZ" => Self::controlled(RotationZ, 1),
            "CR1" => Self::controlled(Phase, 1),
            "CR1I" => Self::controlled(PhaseInverse, 1),
            "CSWAP" | "FREDKIN" => Self::controlled(Swap, 1),
            "CXX" => Self {
                kind: PauliX,
                controls: 1,
                targets: Some(2),
            },
            "CCX" | "TOFFOLI" => Self::controlled(PauliX, 2),
            "CCZ" => Self::controlled(PauliZ, 2),

            _ => return Err(GateError::UnknownGate(name.to_string())),
        };
        Ok(spec)
    }

    /// Number of targets this gate must receive, if fixed
    pub fn required_targets(&self) -> Option<usize> {
        if self.kind.is_swap_like() {
            Some(2)
        } else {
            self.targets
        }
    }

    /// Check operand counts and the angle rule
    pub fn check(&self, targets: usize, controls: usize, angle: Option<f64>) -> Result<()> {
        let gate = || self.kind.name().to_string();
        match self.required_targets() {
            Some(expected) if expected != targets => {
                return Err(GateError::TargetCount {
                    gate: gate(),
                    expected,
                    actual: targets,
                })
            }
            None if targets == 0 => {
                return Err(GateError::TargetCount {
                    gate: gate(),
                    expected: 1,
                    actual: 0,
                })
            }
            _ => {}
        }
        if controls < self.controls {
            return Err(GateError::MissingControls {
                gate: gate(),
                required: self.controls,
                actual: controls,
            });
        }
        self.kind.check_angle(angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparq_core::ops;

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(GateSpec::lookup("h").unwrap().kind, GateKind::Hadamard);
        assert_eq!(GateSpec::lookup("Si").unwrap().kind, GateKind::SInverse);
        assert_eq!(GateSpec::lookup("r1i").unwrap().kind, GateKind::PhaseInverse);
    }

    #[test]
    fn test_lookup_controlled() {
        let cx = GateSpec::lookup("CX").unwrap();
        assert_eq!((cx.kind, cx.controls), (GateKind::PauliX, 1));
        let toffoli = GateSpec::lookup("TOFFOLI").unwrap();
        assert_eq!((toffoli.kind, toffoli.controls), (GateKind::PauliX, 2));
        let cswap = GateSpec::lookup("CSWAP").unwrap();
        assert_eq!(cswap.required_targets(), Some(2));
        assert_eq!(GateSpec::lookup("CXX").unwrap().required_targets(), Some(2));
    }

    #[test]
    fn test_lookup_unknown() {
        assert_eq!(
            GateSpec::lookup("FOO"),
            Err(GateError::UnknownGate("FOO".to_string()))
        );
        assert!(GateSpec::lookup("").is_err());
    }

    #[test]
    fn test_angle_rules() {
        assert!(matches!(
            GateKind::RotationX.matrix(None),
            Err(GateError::MissingAngle { .. })
        ));
        assert!(matches!(
            GateKind::Hadamard.matrix(Some(0.5)),
            Err(GateError::UnexpectedAngle { .. })
        ));
        assert!(matches!(
            GateKind::Phase.check_angle(Some(f64::NAN)),
            Err(GateError::InvalidAngle { .. })
        ));
        assert!(GateKind::RotationY.matrix(Some(0.5)).is_ok());
    }

    #[test]
    fn test_operand_checks() {
        let swap = GateSpec::lookup("SWAP").unwrap();
        assert!(matches!(
            swap.check(1, 0, None),
            Err(GateError::TargetCount { expected: 2, actual: 1, .. })
        ));
        assert!(swap.check(2, 0, None).is_ok());

        let cz = GateSpec::lookup("CZ").unwrap();
        assert!(matches!(
            cz.check(1, 0, None),
            Err(GateError::MissingControls { required: 1, actual: 0, .. })
        ));
        assert!(cz.check(1, 1, None).is_ok());

        let x = GateSpec::lookup("X").unwrap();
        assert!(x.check(0, 0, None).is_err());
        assert!(x.check(3, 0, None).is_ok());
    }

    #[test]
    fn test_every_kind_is_unitary() {
        let kinds = [
            GateKind::Identity,
            GateKind::Hadamard,
            GateKind::PauliX,
            GateKind::PauliY,
            GateKind::PauliZ,
            GateKind::S,
            GateKind::SInverse,
            GateKind::T,
            GateKind::TInverse,
            GateKind::Swap,
            GateKind::ISwap,
            GateKind::RotationX,
            GateKind::RotationY,
            GateKind::RotationZ,
            GateKind::Phase,
            GateKind::PhaseInverse,
        ];
        for kind in kinds {
            let angle = kind.is_parametrized().then_some(1.234);
            let m = kind.matrix(angle).unwrap().to_sparse();
            assert_eq!(m.height(), 1 << kind.num_qubits());
            assert!(ops::is_unitary(&m, 1e-10), "{} is not unitary", kind);
        }
    }

    #[test]
    fn test_adjoint_inverts() {
        for (kind, angle) in [
            (GateKind::S, None),
            (GateKind::T, None),
            (GateKind::Phase, Some(0.4)),
            (GateKind::RotationX, Some(0.4)),
            (GateKind::RotationZ, Some(-1.1)),
        ] {
            let (adj, adj_angle) = kind.adjoint(angle).unwrap();
            let g = kind.matrix(angle).unwrap().to_sparse();
            let g_adj = adj.matrix(adj_angle).unwrap().to_sparse();
            let p = ops::multiply(&g, &g_adj).unwrap();
            assert!(p.approx_eq(&sparq_core::SparseMatrix::identity(2), 1e-10));
        }
        assert!(GateKind::ISwap.adjoint(None).is_none());
    }

    #[test]
    fn test_to_sparse_with_finer_epsilon() {
        let rx = GateKind::RotationX.matrix(Some(1e-10)).unwrap();
        assert_eq!(rx.to_sparse().nnz(), 2);
        let fine = rx.to_sparse_with(1e-14);
        assert_eq!(fine.nnz(), 4);
        assert_eq!(fine.epsilon(), 1e-14);
    }
}
