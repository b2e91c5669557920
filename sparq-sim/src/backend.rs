//! Execution backend
//!
//! The backend exclusively owns the state tracker, the pending queue and the
//! measurement sampler. All state mutation goes through [`Backend::step`] and
//! the measurement methods, one item at a time in FIFO order.

use crate::config::SimulatorConfig;
use crate::director::GateDirector;
use crate::error::{Result, SimulatorError};
use crate::queue::WorkQueue;
use crate::result::{MeasurementCounts, SimulationTrace, TraceStep};
use crate::statistics::ExecutionStatistics;
use crate::work::WorkItem;
use sparq_state::{measurement, MeasurementOutcome, NormCheck, Sampler, SeededSampler, StateError, StateTracker};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Lifecycle of a circuit instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitPhase {
    /// Work items are pending
    Building,
    /// The queue is being applied
    Draining,
    /// Nothing pending; the state is stable
    Idle,
}

/// Owns one register and drives its queued circuit
pub struct Backend {
    config: SimulatorConfig,
    tracker: StateTracker,
    queue: WorkQueue,
    director: GateDirector,
    sampler: Box<dyn Sampler + Send>,
    phase: CircuitPhase,
    poisoned: Option<String>,
    statistics: Option<ExecutionStatistics>,
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("num_qubits", &self.tracker.num_qubits())
            .field("pending", &self.queue.len())
            .field("phase", &self.phase)
            .field("poisoned", &self.poisoned)
            .finish()
    }
}

impl Backend {
    /// Register of `num_qubits` in `|0..0⟩`, sampler seeded from `config.seed`
    pub fn new(num_qubits: usize, config: SimulatorConfig) -> Result<Self> {
        let sampler = SeededSampler::from_seed_option(config.seed);
        Self::with_sampler(num_qubits, config, sampler)
    }

    /// Same as [`Backend::new`] with an injected randomness source
    pub fn with_sampler<S>(num_qubits: usize, config: SimulatorConfig, sampler: S) -> Result<Self>
    where
        S: Sampler + Send + 'static,
    {
        config.validate().map_err(SimulatorError::InvalidConfig)?;
        let tracker = Self::fresh_tracker(num_qubits, &config)?;
        let director = GateDirector::new(num_qubits, config.tolerance, config.parallel_threshold);
        let statistics = config.collect_statistics.then(ExecutionStatistics::new);
        Ok(Self {
            config,
            tracker,
            queue: WorkQueue::new(),
            director,
            sampler: Box::new(sampler),
            phase: CircuitPhase::Idle,
            poisoned: None,
            statistics,
        })
    }

    fn fresh_tracker(num_qubits: usize, config: &SimulatorConfig) -> Result<StateTracker> {
        if num_qubits > config.max_qubits {
            return Err(SimulatorError::TooManyQubits {
                num_qubits,
                max_qubits: config.max_qubits,
            });
        }
        Ok(StateTracker::with_tolerance(num_qubits, config.tolerance)?)
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn num_qubits(&self) -> usize {
        self.tracker.num_qubits()
    }

    pub fn phase(&self) -> CircuitPhase {
        self.phase
    }

    pub fn tracker(&self) -> &StateTracker {
        &self.tracker
    }

    pub fn queue(&self) -> &WorkQueue {
        &self.queue
    }

    pub fn director(&self) -> &GateDirector {
        &self.director
    }

    /// Collected statistics, when enabled in the configuration
    pub fn statistics(&self) -> Option<&ExecutionStatistics> {
        self.statistics.as_ref()
    }

    /// Reason the backend refuses work, if an earlier measurement degenerated
    pub fn poisoned(&self) -> Option<&str> {
        self.poisoned.as_deref()
    }

    /// Swap the randomness source
    pub fn set_sampler<S>(&mut self, sampler: S)
    where
        S: Sampler + Send + 'static,
    {
        self.sampler = Box::new(sampler);
    }

    fn ensure_live(&self) -> Result<()> {
        match &self.poisoned {
            Some(reason) => Err(SimulatorError::CircuitPoisoned {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Replace the register with a fresh `num_qubits` register
    ///
    /// Drops pending work, clears poisoning and restarts statistics.
    pub fn device(&mut self, num_qubits: usize) -> Result<()> {
        let tracker = Self::fresh_tracker(num_qubits, &self.config)?;
        self.director = GateDirector::new(
            num_qubits,
            self.config.tolerance,
            self.config.parallel_threshold,
        );
        self.tracker = tracker;
        self.clear();
        Ok(())
    }

    /// Return to `|0..0⟩` on the current register size
    pub fn reset(&mut self) -> Result<()> {
        self.device(self.num_qubits())
    }

    fn clear(&mut self) {
        self.queue.clear();
        self.phase = CircuitPhase::Idle;
        self.poisoned = None;
        self.statistics = self.config.collect_statistics.then(ExecutionStatistics::new);
    }

    /// Replace the state, keeping pending work
    ///
    /// Pending items that no longer fit the register fail when built.
    pub fn restore_state(&mut self, tracker: StateTracker) -> Result<()> {
        self.ensure_live()?;
        let n = tracker.num_qubits();
        if n > self.config.max_qubits {
            return Err(SimulatorError::TooManyQubits {
                num_qubits: n,
                max_qubits: self.config.max_qubits,
            });
        }
        if n != self.director.num_qubits() {
            self.director =
                GateDirector::new(n, self.config.tolerance, self.config.parallel_threshold);
        }
        self.tracker = tracker;
        Ok(())
    }

    /// Append a validated item
    pub fn enqueue(&mut self, item: WorkItem) -> Result<()> {
        self.ensure_live()?;
        item.check_register(self.num_qubits())?;
        self.queue.push(item);
        self.phase = CircuitPhase::Building;
        Ok(())
    }

    /// Validate raw gate-call arguments and append
    pub fn enqueue_gate(
        &mut self,
        name: &str,
        targets: &[usize],
        controls: &[usize],
        angle: Option<f64>,
    ) -> Result<()> {
        let item = WorkItem::new(name, targets, controls, angle, self.num_qubits())?;
        self.enqueue(item)
    }

    /// Apply the next pending item
    ///
    /// Returns the applied item, or `None` when nothing is pending. If the
    /// operator cannot be built or applied, queue and state are unchanged.
    pub fn step(&mut self) -> Result<Option<WorkItem>> {
        self.ensure_live()?;
        let Some(item) = self.queue.peek() else {
            self.phase = CircuitPhase::Idle;
            return Ok(None);
        };

        let build_start = Instant::now();
        let operator = self.director.build(item)?;
        let build_time = build_start.elapsed();

        let apply_start = Instant::now();
        let check = self.tracker.apply(&operator)?;
        let apply_time = apply_start.elapsed();

        let Some(item) = self.queue.pop() else {
            return Ok(None);
        };
        debug!(
            "applied {} (operator nnz {}, state nnz {})",
            item,
            operator.nnz(),
            self.tracker.vector().nnz()
        );
        if let NormCheck::Restored { norm_sqr } = check {
            warn!("norm drifted to {:.12} after {}, rescaled", norm_sqr, item);
        }

        if let Some(stats) = self.statistics.as_mut() {
            stats.gates_applied += 1;
            stats.operator_build_time += build_time;
            stats.gate_application_time += apply_time;
            stats.peak_operator_nnz = stats.peak_operator_nnz.max(operator.nnz());
            if matches!(check, NormCheck::Restored { .. }) {
                stats.renormalizations += 1;
            }
        }

        self.phase = if self.queue.is_empty() {
            CircuitPhase::Idle
        } else {
            CircuitPhase::Draining
        };
        Ok(Some(item))
    }

    /// Drain the queue, recording each item and the state it produced
    pub fn simulate(&mut self) -> Result<SimulationTrace> {
        self.ensure_live()?;
        info!("simulating {} pending operations on {} qubits", self.queue.len(), self.num_qubits());
        let mut trace = SimulationTrace::default();
        self.phase = CircuitPhase::Draining;
        while let Some(item) = self.step()? {
            trace.steps.push(TraceStep {
                operation: item.to_string(),
                state: self.tracker.to_string(),
            });
        }
        info!("simulation finished after {} operations", trace.len());
        Ok(trace)
    }

    /// Drain the queue without formatting; returns the number of items applied
    pub fn simulate_silent(&mut self) -> Result<usize> {
        self.ensure_live()?;
        let mut applied = 0;
        self.phase = CircuitPhase::Draining;
        while self.step()?.is_some() {
            applied += 1;
        }
        Ok(applied)
    }

    /// Measure and collapse `qubit`
    ///
    /// Pending work is not applied first. A degenerate state poisons the
    /// backend until [`Backend::reset`] or [`Backend::device`].
    pub fn measure(&mut self, qubit: usize) -> Result<MeasurementOutcome> {
        self.ensure_live()?;
        let num_qubits = self.num_qubits();
        if qubit >= num_qubits {
            return Err(SimulatorError::InvalidQubit { qubit, num_qubits });
        }

        let start = Instant::now();
        let result = measurement::measure_qubit(&mut self.tracker, qubit, &mut *self.sampler);
        if let Some(stats) = self.statistics.as_mut() {
            stats.measurement_time += start.elapsed();
            stats.measurements += 1;
        }

        match result {
            Ok(outcome) => {
                debug!(
                    "measured qubit {} -> {} (p = {:.6})",
                    qubit, outcome.outcome, outcome.probability
                );
                Ok(outcome)
            }
            Err(err @ StateError::MeasurementDegenerate { .. }) => {
                warn!("{}; circuit poisoned until reset", err);
                self.poisoned = Some(err.to_string());
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Measure qubits `0..n`; the bitstring prints qubit `n-1` first
    pub fn measure_all(&mut self) -> Result<String> {
        let n = self.num_qubits();
        let mut bits = vec!['0'; n];
        for qubit in 0..n {
            if self.measure(qubit)?.outcome == 1 {
                bits[n - 1 - qubit] = '1';
            }
        }
        Ok(bits.into_iter().collect())
    }

    /// Outcome histogram over `shots` runs of the pending circuit
    ///
    /// The pending queue is applied once to a copy of the state; each shot
    /// then measures every qubit of a fresh copy of that result. The
    /// backend's own queue and state are left as they were.
    pub fn sample(&mut self, shots: usize) -> Result<MeasurementCounts> {
        self.ensure_live()?;
        if shots == 0 {
            return Err(SimulatorError::InvalidConfig("shots must be > 0".to_string()));
        }
        info!("sampling {} shots over {} pending operations", shots, self.queue.len());

        let mut prepared = self.tracker.clone();
        for item in self.queue.iter() {
            let operator = self.director.build(item)?;
            prepared.apply(&operator)?;
        }

        let start = Instant::now();
        let mut counts = MeasurementCounts::new();
        for _ in 0..shots {
            let mut shot = prepared.clone();
            let bits = measurement::measure_all(&mut shot, &mut *self.sampler)?;
            counts.add(bits, 1);
        }
        if let Some(stats) = self.statistics.as_mut() {
            stats.measurement_time += start.elapsed();
            stats.measurements += shots * prepared.num_qubits();
        }

        info!("sampling finished with {} distinct outcomes", counts.num_outcomes());
        Ok(counts)
    }
}
