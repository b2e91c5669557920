//! Error types for gate lookup and matrix generation

use thiserror::Error;

/// Errors raised while resolving a gate name or its arguments
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GateError {
    /// Name not present in the catalog
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// Parametrized gate used without an angle
    #[error("Gate '{gate}' requires an angle")]
    MissingAngle { gate: String },

    /// Fixed gate given an angle it cannot use
    #[error("Gate '{gate}' does not take an angle")]
    UnexpectedAngle { gate: String },

    /// Angle is NaN or infinite
    #[error("Gate '{gate}' received non-finite angle {angle}")]
    InvalidAngle { gate: String, angle: f64 },

    /// Wrong number of target qubits for the gate
    #[error("Gate '{gate}' requires {expected} target qubits, but {actual} were provided")]
    TargetCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Fewer controls than the gate name demands
    #[error("Gate '{gate}' requires at least {required} control qubits, but {actual} were provided")]
    MissingControls {
        gate: String,
        required: usize,
        actual: usize,
    },
}

/// Result type for gate operations
pub type Result<T> = std::result::Result<T, GateError>;
