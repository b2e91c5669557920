//! Execution statistics tracking

use std::time::Duration;

/// Counters and timings accumulated while draining and measuring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionStatistics {
    /// Work items applied to the state
    pub gates_applied: usize,

    /// Time spent expanding work items into full operators
    pub operator_build_time: Duration,

    /// Time spent multiplying operators into the state
    pub gate_application_time: Duration,

    /// Time spent sampling and collapsing
    pub measurement_time: Duration,

    /// Largest stored-entry count of any operator built
    pub peak_operator_nnz: usize,

    /// Times the norm drifted and was rescaled
    pub renormalizations: usize,

    /// Qubit measurements performed
    pub measurements: usize,
}

impl ExecutionStatistics {
    /// Create a new statistics object
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_time(&self) -> Duration {
        self.operator_build_time + self.gate_application_time + self.measurement_time
    }

    /// Gates applied per second of build plus application time
    pub fn gates_per_second(&self) -> f64 {
        let secs = (self.operator_build_time + self.gate_application_time).as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.gates_applied as f64 / secs
        }
    }

    /// Share of gate time spent building operators, in percent
    pub fn build_overhead_percent(&self) -> f64 {
        let total = (self.operator_build_time + self.gate_application_time).as_secs_f64();
        if total == 0.0 {
            0.0
        } else {
            100.0 * self.operator_build_time.as_secs_f64() / total
        }
    }
}

impl std::fmt::Display for ExecutionStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Execution Statistics:")?;
        writeln!(f, "  Total time: {:?}", self.total_time())?;
        writeln!(
            f,
            "    Operator build: {:?} ({:.1}%)",
            self.operator_build_time,
            self.build_overhead_percent()
        )?;
        writeln!(f, "    Gate application: {:?}", self.gate_application_time)?;
        writeln!(f, "    Measurement: {:?}", self.measurement_time)?;

        writeln!(f, "\n  Gates:")?;
        writeln!(f, "    Applied: {}", self.gates_applied)?;
        writeln!(f, "    Execution rate: {:.0} gates/sec", self.gates_per_second())?;
        writeln!(f, "    Peak operator entries: {}", self.peak_operator_nnz)?;

        writeln!(f, "\n  State:")?;
        writeln!(f, "    Renormalizations: {}", self.renormalizations)?;
        writeln!(f, "    Measurements: {}", self.measurements)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_with_zero_time() {
        let stats = ExecutionStatistics::new();
        assert_eq!(stats.gates_per_second(), 0.0);
        assert_eq!(stats.build_overhead_percent(), 0.0);
    }

    #[test]
    fn test_rates() {
        let stats = ExecutionStatistics {
            gates_applied: 10,
            operator_build_time: Duration::from_millis(250),
            gate_application_time: Duration::from_millis(750),
            ..Default::default()
        };
        assert!((stats.gates_per_second() - 10.0).abs() < 1e-9);
        assert!((stats.build_overhead_percent() - 25.0).abs() < 1e-9);
        assert_eq!(stats.total_time(), Duration::from_secs(1));
    }

    #[test]
    fn test_display() {
        let stats = ExecutionStatistics {
            gates_applied: 3,
            ..Default::default()
        };
        let text = stats.to_string();
        assert!(text.contains("Applied: 3"));
    }
}
