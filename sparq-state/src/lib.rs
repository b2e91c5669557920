//! State tracking for the sparq simulator
//!
//! This crate owns the register's state vector and everything that reads or
//! collapses it:
//! - [`StateTracker`]: the `2^n x 1` sparse amplitude column with norm checks
//! - [`measurement`]: probability, collapse and seedable [`Sampler`]s
//! - [`persistence`]: JSON snapshots and per-qubit amplitude records
//!
//! # Example
//!
//! ```
//! use sparq_state::{measurement, SeededSampler, StateTracker};
//!
//! let mut state = StateTracker::new(2).unwrap();
//! let mut sampler = SeededSampler::new(42);
//! let m = measurement::measure_qubit(&mut state, 0, &mut sampler).unwrap();
//! assert_eq!(m.outcome, 0);
//! ```

pub mod error;
pub mod measurement;
pub mod persistence;
pub mod tracker;

pub use error::{Result, StateError};
pub use measurement::{MeasurementOutcome, Sampler, SeededSampler};
pub use persistence::{QubitRecord, StateSnapshot};
pub use tracker::{NormCheck, StateTracker, MAX_QUBITS};
