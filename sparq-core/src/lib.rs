//! Complex and sparse matrix algebra for the sparq simulator
//!
//! This crate provides the numerical foundation the rest of the workspace
//! builds on:
//! - [`SparseMatrix`]: compressed-column storage for operators and state vectors
//! - [`ops`]: addition, products, transposes, outer and Kronecker products
//! - [`format`]: Dirac notation and basis-state views of a state vector
//! - [`Tolerance`]: the zero and norm thresholds threaded through every comparison
//!
//! # Example
//! ```
//! use sparq_core::{ops, SparseMatrix};
//!
//! let id = SparseMatrix::identity(2);
//! let id4 = ops::tensor_product(&id, &id);
//! assert_eq!(id4.height(), 4);
//! assert_eq!(id4.nnz(), 4);
//! ```

pub mod complex;
pub mod error;
pub mod format;
pub mod ops;
pub mod sparse;
pub mod tolerance;

pub use complex::ComplexExt;
pub use error::{MathError, Result};
pub use num_complex::Complex64;
pub use sparse::{CscBuilder, SparseMatrix};
pub use tolerance::Tolerance;
