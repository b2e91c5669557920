//! Gate catalog for the sparq simulator
//!
//! - [`matrices`]: fixed gate matrices and analytic generators for rotations
//! - [`catalog`]: the closed [`GateKind`] set and name lookup through [`GateSpec`]
//!
//! # Example
//!
//! ```
//! use sparq_gates::{GateKind, GateSpec};
//!
//! let cx = GateSpec::lookup("cx").unwrap();
//! assert_eq!(cx.kind, GateKind::PauliX);
//! assert_eq!(cx.controls, 1);
//!
//! let rz = GateKind::RotationZ.matrix(Some(0.5)).unwrap().to_sparse();
//! assert_eq!(rz.nnz(), 2);
//! ```

pub mod catalog;
pub mod error;
pub mod matrices;

pub use catalog::{GateKind, GateMatrix, GateSpec};
pub use error::{GateError, Result};
