//! Error types for the simulator

use sparq_core::MathError;
use sparq_gates::GateError;
use sparq_state::StateError;
use std::fmt;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;

/// Errors that can occur while building or running a circuit
#[derive(Debug, Clone, PartialEq)]
pub enum SimulatorError {
    /// Invalid configuration
    InvalidConfig(String),

    /// Invalid qubit index
    InvalidQubit { qubit: usize, num_qubits: usize },

    /// Same qubit named twice among a gate's targets and controls
    DuplicateQubit { qubit: usize },

    /// Operand shape does not fit the gate
    InvalidOperands(String),

    /// Register larger than the configured maximum
    TooManyQubits { num_qubits: usize, max_qubits: usize },

    /// Gate lookup or argument failure
    Gate(GateError),

    /// State construction, measurement or persistence failure
    State(StateError),

    /// Matrix dimension failure while building or applying an operator
    Math(MathError),

    /// An earlier measurement found the state degenerate; reset to continue
    CircuitPoisoned { reason: String },
}

impl fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulatorError::InvalidConfig(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            SimulatorError::InvalidQubit { qubit, num_qubits } => {
                write!(
                    f,
                    "Invalid qubit index {}: circuit has {} qubits",
                    qubit, num_qubits
                )
            }
            SimulatorError::DuplicateQubit { qubit } => {
                write!(f, "Duplicate qubit {} in gate operation", qubit)
            }
            SimulatorError::InvalidOperands(msg) => {
                write!(f, "Invalid operands: {}", msg)
            }
            SimulatorError::TooManyQubits {
                num_qubits,
                max_qubits,
            } => {
                write!(
                    f,
                    "Too many qubits: requested {}, max supported is {}",
                    num_qubits, max_qubits
                )
            }
            SimulatorError::Gate(err) => write!(f, "Gate error: {}", err),
            SimulatorError::State(err) => write!(f, "State error: {}", err),
            SimulatorError::Math(err) => write!(f, "Math error: {}", err),
            SimulatorError::CircuitPoisoned { reason } => {
                write!(f, "Circuit unusable until reset: {}", reason)
            }
        }
    }
}

impl std::error::Error for SimulatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulatorError::Gate(err) => Some(err),
            SimulatorError::State(err) => Some(err),
            SimulatorError::Math(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GateError> for SimulatorError {
    fn from(err: GateError) -> Self {
        SimulatorError::Gate(err)
    }
}

impl From<StateError> for SimulatorError {
    fn from(err: StateError) -> Self {
        SimulatorError::State(err)
    }
}

impl From<MathError> for SimulatorError {
    fn from(err: MathError) -> Self {
        SimulatorError::Math(err)
    }
}

impl SimulatorError {
    /// Whether this error leaves the circuit unusable until reset
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SimulatorError::State(StateError::MeasurementDegenerate { .. })
                | SimulatorError::CircuitPoisoned { .. }
        )
    }
}
