//! Operator construction strategies
//!
//! Each builder expands one work item into a `2^n x 2^n` sparse operator.
//! [`crate::director::GateDirector`] picks the builder once per item.

pub mod multi;
pub mod qft;
pub mod single;

pub use qft::fourier_steps;
