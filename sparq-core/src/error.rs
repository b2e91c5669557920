//! Error types for sparse matrix algebra

use thiserror::Error;

/// Errors raised by matrix construction and arithmetic
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MathError {
    /// Entry coordinates outside the matrix
    #[error("Index ({row}, {col}) out of bounds for {height}x{width} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    /// Operand shapes are incompatible for the requested operation
    #[error("Dimension mismatch in {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// An operation that needs a single column received a wider matrix
    #[error("Expected a column vector, got a {height}x{width} matrix")]
    NotAColumnVector { height: usize, width: usize },

    /// Dense conversion requested for a matrix above the configured limit
    #[error("Dense view of {height}x{width} matrix exceeds limit of {limit} entries")]
    DenseLimitExceeded {
        height: usize,
        width: usize,
        limit: usize,
    },

    /// Rows of a dense input have differing lengths
    #[error("Ragged dense input: row {row} has {actual} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl MathError {
    /// Create a dimension mismatch error
    pub fn mismatch(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Self {
        Self::DimensionMismatch { op, left, right }
    }
}

/// Result type for matrix operations
pub type Result<T> = std::result::Result<T, MathError>;
