//! Circuit execution for the sparq simulator
//!
//! Gate calls become validated [`WorkItem`]s in a FIFO [`WorkQueue`]. The
//! [`Backend`] drains the queue one item at a time: the [`GateDirector`]
//! expands each item into a full-register sparse operator, which is
//! left-multiplied into the state. Measurement samples and collapses single
//! qubits with an injectable, seedable sampler.
//!
//! # Features
//!
//! - **Sparse throughout**: operators and state are compressed-column matrices
//! - **Three builders**: tensor chains, controlled entry placement and the Fourier transform
//! - **Resumable drains**: [`Backend::step`] applies one gate at a time
//! - **Atomic failure**: a gate that cannot be built leaves queue and state untouched
//!
//! # Example
//!
//! ```
//! use sparq_sim::{Interpreter, SimulatorConfig};
//!
//! let mut circuit = Interpreter::with_config(2, SimulatorConfig::default().with_seed(7)).unwrap();
//! circuit.h(0).unwrap().cx(0, 1).unwrap();
//! let bits = circuit.measure_all().unwrap();
//! assert!(bits == "00" || bits == "11");
//! ```

pub mod backend;
pub mod builders;
pub mod config;
pub mod director;
pub mod error;
pub mod interpreter;
pub mod queue;
pub mod result;
pub mod statistics;
pub mod work;

pub use backend::{Backend, CircuitPhase};
pub use builders::fourier_steps;
pub use config::SimulatorConfig;
pub use director::{BuildStrategy, GateDirector};
pub use error::{Result, SimulatorError};
pub use interpreter::Interpreter;
pub use queue::WorkQueue;
pub use result::{MeasurementCounts, SimulationTrace, TraceStep};
pub use statistics::ExecutionStatistics;
pub use work::{Operands, WorkItem};
