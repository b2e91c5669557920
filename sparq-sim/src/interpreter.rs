//! Named-gate facade over [`Backend`]
//!
//! Every gate method validates its operands immediately and queues one work
//! item; nothing touches the state until a drain or a measurement.
//!
//! ```ignore
//! let mut circuit = Interpreter::new(2)?;
//! circuit.h(0)?.cx(0, 1)?;
//! circuit.simulate()?;
//! let bit = circuit.measure(1)?;
//! ```

use crate::backend::Backend;
use crate::builders::fourier_steps;
use crate::config::SimulatorConfig;
use crate::error::Result;
use crate::result::{MeasurementCounts, SimulationTrace};
use crate::statistics::ExecutionStatistics;
use crate::work::WorkItem;
use sparq_core::{format, Complex64, SparseMatrix};
use sparq_state::{MeasurementOutcome, Sampler, StateSnapshot, StateTracker};
use std::ops::Range;

/// Circuit builder and runner
#[derive(Debug)]
pub struct Interpreter {
    backend: Backend,
}

macro_rules! single_gates {
    ($($method:ident => $name:literal),* $(,)?) => {
        $(
            #[doc = concat!("Queue `", $name, "` on `target`")]
            pub fn $method(&mut self, target: usize) -> Result<&mut Self> {
                self.gate($name, &[target], &[], None)
            }
        )*
    };
}

macro_rules! rotation_gates {
    ($($method:ident => $name:literal),* $(,)?) => {
        $(
            #[doc = concat!("Queue `", $name, "(angle)` on `target`")]
            pub fn $method(&mut self, angle: f64, target: usize) -> Result<&mut Self> {
                self.gate($name, &[target], &[], Some(angle))
            }
        )*
    };
}

macro_rules! controlled_gates {
    ($($method:ident => $name:literal),* $(,)?) => {
        $(
            #[doc = concat!("Queue `", $name, "` with one control")]
            pub fn $method(&mut self, control: usize, target: usize) -> Result<&mut Self> {
                self.gate($name, &[target], &[control], None)
            }
        )*
    };
}

macro_rules! controlled_rotation_gates {
    ($($method:ident => $name:literal),* $(,)?) => {
        $(
            #[doc = concat!("Queue `", $name, "(angle)` with one control")]
            pub fn $method(&mut self, angle: f64, control: usize, target: usize) -> Result<&mut Self> {
                self.gate($name, &[target], &[control], Some(angle))
            }
        )*
    };
}

impl Interpreter {
    /// `num_qubits` register in `|0..0⟩` with the default configuration
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::with_config(num_qubits, SimulatorConfig::default())
    }

    pub fn with_config(num_qubits: usize, config: SimulatorConfig) -> Result<Self> {
        Ok(Self {
            backend: Backend::new(num_qubits, config)?,
        })
    }

    /// Interpreter measuring with an injected randomness source
    pub fn with_sampler<S>(num_qubits: usize, config: SimulatorConfig, sampler: S) -> Result<Self>
    where
        S: Sampler + Send + 'static,
    {
        Ok(Self {
            backend: Backend::with_sampler(num_qubits, config, sampler)?,
        })
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn num_qubits(&self) -> usize {
        self.backend.num_qubits()
    }

    /// Start over on a fresh register of `num_qubits`
    pub fn device(&mut self, num_qubits: usize) -> Result<&mut Self> {
        self.backend.device(num_qubits)?;
        Ok(self)
    }

    /// Back to `|0..0⟩`, pending work dropped
    pub fn reset(&mut self) -> Result<&mut Self> {
        self.backend.reset()?;
        Ok(self)
    }

    /// Queue any catalog gate by name
    pub fn gate(
        &mut self,
        name: &str,
        targets: &[usize],
        controls: &[usize],
        angle: Option<f64>,
    ) -> Result<&mut Self> {
        self.backend.enqueue_gate(name, targets, controls, angle)?;
        Ok(self)
    }

    single_gates! {
        id => "ID",
        x => "X",
        y => "Y",
        z => "Z",
        h => "H",
        s => "S",
        si => "SI",
        t => "T",
        ti => "TI",
    }

    rotation_gates! {
        rx => "RX",
        ry => "RY",
        rz => "RZ",
        r1 => "R1",
        r1i => "R1I",
    }

    controlled_gates! {
        cx => "CX",
        cy => "CY",
        cz => "CZ",
        ch => "CH",
        cs => "CS",
        csi => "CSI",
        ct => "CT",
        cti => "CTI",
    }

    controlled_rotation_gates! {
        crx => "CRX",
        cry => "CRY",
        crz => "CRZ",
        cr1 => "CR1",
        cr1i => "CR1I",
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<&mut Self> {
        self.gate("SWAP", &[a, b], &[], None)
    }

    pub fn iswap(&mut self, a: usize, b: usize) -> Result<&mut Self> {
        self.gate("ISWAP", &[a, b], &[], None)
    }

    /// Fredkin gate
    pub fn cswap(&mut self, control: usize, a: usize, b: usize) -> Result<&mut Self> {
        self.gate("CSWAP", &[a, b], &[control], None)
    }

    pub fn toffoli(&mut self, c1: usize, c2: usize, target: usize) -> Result<&mut Self> {
        self.gate("CCX", &[target], &[c1, c2], None)
    }

    /// X on both targets when `control` is set
    pub fn cxx(&mut self, control: usize, t1: usize, t2: usize) -> Result<&mut Self> {
        self.gate("CXX", &[t1, t2], &[control], None)
    }

    /// Fourier transform over `range` as one aggregate operator
    pub fn qft(&mut self, range: Range<usize>) -> Result<&mut Self> {
        let item = WorkItem::fourier(range, false, self.num_qubits())?;
        self.backend.enqueue(item)?;
        Ok(self)
    }

    /// Inverse Fourier transform over `range` as one aggregate operator
    pub fn iqft(&mut self, range: Range<usize>) -> Result<&mut Self> {
        let item = WorkItem::fourier(range, true, self.num_qubits())?;
        self.backend.enqueue(item)?;
        Ok(self)
    }

    /// Queue the transform's elementary gates one by one
    pub fn qft_incremental(&mut self, range: Range<usize>, inverse: bool) -> Result<&mut Self> {
        // validates the range before anything is queued
        let whole = WorkItem::fourier(range, inverse, self.num_qubits())?;
        let steps = fourier_steps(&whole.targets(), inverse, self.num_qubits())?;
        for item in steps {
            self.backend.enqueue(item)?;
        }
        Ok(self)
    }

    /// Apply every pending gate, returning a per-step trace
    pub fn simulate(&mut self) -> Result<SimulationTrace> {
        self.backend.simulate()
    }

    /// Apply every pending gate without formatting
    pub fn simulate_silent(&mut self) -> Result<usize> {
        self.backend.simulate_silent()
    }

    /// Apply only the next pending gate
    pub fn step(&mut self) -> Result<Option<WorkItem>> {
        self.backend.step()
    }

    /// Drain pending work, then measure and collapse `qubit`
    pub fn measure(&mut self, qubit: usize) -> Result<u8> {
        Ok(self.measure_outcome(qubit)?.outcome)
    }

    /// Like [`Interpreter::measure`] with the pre-collapse probability
    pub fn measure_outcome(&mut self, qubit: usize) -> Result<MeasurementOutcome> {
        self.backend.simulate_silent()?;
        self.backend.measure(qubit)
    }

    /// Drain pending work, then measure every qubit
    pub fn measure_all(&mut self) -> Result<String> {
        self.backend.simulate_silent()?;
        self.backend.measure_all()
    }

    /// Outcome histogram of the pending circuit; the circuit itself is unchanged
    pub fn sample(&mut self, shots: usize) -> Result<MeasurementCounts> {
        self.backend.sample(shots)
    }

    /// Sample with the configured shot count
    pub fn sample_default(&mut self) -> Result<MeasurementCounts> {
        let shots = self.backend.config().shots;
        self.backend.sample(shots)
    }

    /// Current state vector as a `2^n x 1` sparse column
    pub fn state_vector(&self) -> &SparseMatrix {
        self.backend.tracker().vector()
    }

    pub fn tracker(&self) -> &StateTracker {
        self.backend.tracker()
    }

    /// Serializable copy of the current state
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(self.backend.tracker())
    }

    /// Load a saved state; pending work is kept
    pub fn restore(&mut self, snapshot: &StateSnapshot) -> Result<&mut Self> {
        let tracker = snapshot.restore(self.backend.config().tolerance)?;
        self.backend.restore_state(tracker)?;
        Ok(self)
    }

    /// Dense amplitudes, refused above the configured debug limit
    pub fn dense_state(&self) -> Result<Vec<Complex64>> {
        let limit = self.backend.config().dense_debug_limit;
        Ok(self.backend.tracker().to_dense(limit)?)
    }

    /// Dirac notation of the current state
    pub fn dirac(&self) -> String {
        self.backend.tracker().to_string()
    }

    /// Phase in degrees of every stored amplitude, keyed by basis label
    pub fn phase(&self) -> Result<Vec<(String, f64)>> {
        Ok(format::phases(self.state_vector())?)
    }

    /// Number of queued, unapplied gates
    pub fn pending(&self) -> usize {
        self.backend.queue().len()
    }

    pub fn statistics(&self) -> Option<&ExecutionStatistics> {
        self.backend.statistics()
    }
}
