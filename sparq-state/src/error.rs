//! Error types for state tracking, measurement and persistence

use sparq_core::MathError;
use thiserror::Error;

/// Errors that can occur while creating, measuring or storing a state
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// A register needs at least one qubit
    #[error("State must have at least one qubit")]
    ZeroQubits,

    /// Requested register is larger than the supported maximum
    #[error("{num_qubits} qubits exceeds the maximum of {max}")]
    TooManyQubits { num_qubits: usize, max: usize },

    /// Invalid qubit index
    #[error("Invalid qubit index {index} for {num_qubits}-qubit state")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// Vector height is not a power of two, or the vector is not a column
    #[error("Invalid state dimension {height}x{width}, expected a 2^n x 1 column")]
    InvalidDimension { height: usize, width: usize },

    /// State not normalized
    #[error("State vector not normalized, norm² = {norm_sqr}")]
    NotNormalized { norm_sqr: f64 },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Measurement would keep (numerically) no probability mass
    #[error("Measurement of qubit {qubit} is degenerate: retained probability {mass:e}")]
    MeasurementDegenerate { qubit: usize, mass: f64 },

    /// State cannot be written as a product of single-qubit states
    #[error("State is entangled and cannot be split into per-qubit records")]
    NotSeparable,

    /// Malformed persisted data
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Underlying file system failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Error from the matrix layer
    #[error(transparent)]
    Math(#[from] MathError),
}

impl From<std::io::Error> for StateError {
    fn from(err: std::io::Error) -> Self {
        StateError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        StateError::Parse {
            line: err.line(),
            message: err.to_string(),
        }
    }
}

/// Result type for state operations
pub type Result<T> = std::result::Result<T, StateError>;
