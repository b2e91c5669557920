//! Simulation result types

use ahash::AHashMap;
use std::fmt;

/// Measurement outcome counts
///
/// Maps bitstrings (qubit `n-1` first) to the number of times they were observed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasurementCounts {
    counts: AHashMap<String, usize>,
    total_shots: usize,
}

impl MeasurementCounts {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` observations of `bitstring`
    pub fn add(&mut self, bitstring: impl Into<String>, count: usize) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
        self.total_shots += count;
    }

    /// Count for a specific bitstring
    pub fn get(&self, bitstring: &str) -> usize {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Observed frequency of a bitstring
    pub fn probability(&self, bitstring: &str) -> f64 {
        if self.total_shots == 0 {
            0.0
        } else {
            self.get(bitstring) as f64 / self.total_shots as f64
        }
    }

    pub fn total_shots(&self) -> usize {
        self.total_shots
    }

    /// Number of distinct outcomes observed
    pub fn num_outcomes(&self) -> usize {
        self.counts.len()
    }

    /// Most frequent outcome; ties resolve to the smaller bitstring
    pub fn most_common(&self) -> Option<(&str, usize)> {
        self.sorted().into_iter().next()
    }

    /// Outcomes by descending count, then ascending bitstring
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut sorted: Vec<_> = self
            .counts
            .iter()
            .map(|(bs, &count)| (bs.as_str(), count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }

    /// Observed frequencies
    pub fn to_probabilities(&self) -> AHashMap<String, f64> {
        self.counts
            .keys()
            .map(|bs| (bs.clone(), self.probability(bs)))
            .collect()
    }
}

impl fmt::Display for MeasurementCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Measurement Counts ({} shots):", self.total_shots)?;
        for (bitstring, count) in self.sorted() {
            writeln!(
                f,
                "  |{}⟩: {} ({:.2}%)",
                bitstring,
                count,
                self.probability(bitstring) * 100.0
            )?;
        }
        Ok(())
    }
}

/// One drained work item and the state it produced
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStep {
    /// Human-readable work item, e.g. `CX targets=[1] controls=[0]`
    pub operation: String,
    /// Dirac notation of the state after the step
    pub state: String,
}

/// Formatted record of a `simulate` call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationTrace {
    pub steps: Vec<TraceStep>,
}

impl SimulationTrace {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// State text after the final step, if any step ran
    pub fn final_state(&self) -> Option<&str> {
        self.steps.last().map(|s| s.state.as_str())
    }
}

impl fmt::Display for SimulationTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "[{}] {}", i + 1, step.operation)?;
            writeln!(f, "{}", step.state)?;
        }
        Ok(())
    }
}
