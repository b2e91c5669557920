//! Simulator configuration

use sparq_core::ops::DEFAULT_PARALLEL_THRESHOLD;
use sparq_core::Tolerance;
use sparq_state::MAX_QUBITS;

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Zero and norm thresholds used by every matrix, state and measurement
    ///
    /// Default: zero = 1e-10, norm = 1e-8
    pub tolerance: Tolerance,

    /// Number of shots drawn by `sample`
    ///
    /// Default: 1024
    pub shots: usize,

    /// Random number generator seed for reproducibility
    ///
    /// If None, the sampler is seeded from the operating system.
    ///
    /// Default: None (random)
    pub seed: Option<u64>,

    /// Operator height at which tensor products and operator products
    /// fan out over rayon
    ///
    /// Default: 16384
    pub parallel_threshold: usize,

    /// Enable execution statistics collection
    ///
    /// Default: false
    pub collect_statistics: bool,

    /// Largest register `device` accepts
    ///
    /// Default: 20
    pub max_qubits: usize,

    /// Largest matrix (in entries) that may be rendered densely for debugging
    ///
    /// Default: 65536
    pub dense_debug_limit: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            shots: 1024,
            seed: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            collect_statistics: false,
            max_qubits: 20,
            dense_debug_limit: 1 << 16,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration optimized for speed
    ///
    /// - No statistics collection
    /// - Parallel products from 4096 rows
    pub fn fast() -> Self {
        Self {
            collect_statistics: false,
            parallel_threshold: 1 << 12,
            ..Default::default()
        }
    }

    /// Create a configuration for debugging
    ///
    /// - Statistics collection
    /// - Deterministic seed
    pub fn debug() -> Self {
        Self {
            collect_statistics: true,
            seed: Some(42),
            ..Default::default()
        }
    }

    /// Set the number of measurement shots
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Set the random seed for deterministic execution
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable statistics collection
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.collect_statistics = enabled;
        self
    }

    /// Set the numeric tolerance
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the parallel threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Set the largest accepted register
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    pub fn with_dense_debug_limit(mut self, limit: usize) -> Self {
        self.dense_debug_limit = limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.shots == 0 {
            return Err("shots must be > 0".to_string());
        }

        for (name, value) in [("zero", self.tolerance.zero), ("norm", self.tolerance.norm)] {
            if !(value > 0.0 && value < 1e-3) {
                return Err(format!("{} tolerance must be in (0, 1e-3), got {}", name, value));
            }
        }

        if self.max_qubits == 0 || self.max_qubits > MAX_QUBITS {
            return Err(format!(
                "max_qubits must be in 1..={}, got {}",
                MAX_QUBITS, self.max_qubits
            ));
        }

        if self.parallel_threshold == 0 {
            return Err("parallel_threshold must be > 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulatorConfig::default();
        assert_eq!(config.tolerance.zero, 1e-10);
        assert_eq!(config.parallel_threshold, 16384);
        assert_eq!(config.shots, 1024);
        assert_eq!(config.seed, None);
        assert!(!config.collect_statistics);
    }

    #[test]
    fn test_presets() {
        let fast = SimulatorConfig::fast();
        assert_eq!(fast.parallel_threshold, 4096);
        assert!(!fast.collect_statistics);

        let debug = SimulatorConfig::debug();
        assert_eq!(debug.seed, Some(42));
        assert!(debug.collect_statistics);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SimulatorConfig::new()
            .with_shots(2048)
            .with_seed(7)
            .with_max_qubits(12)
            .with_parallel_threshold(64);

        assert_eq!(config.shots, 2048);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_qubits, 12);
        assert_eq!(config.parallel_threshold, 64);
    }

    #[test]
    fn test_validate() {
        assert!(SimulatorConfig::default().validate().is_ok());

        let invalid = SimulatorConfig {
            shots: 0,
            ..Default::default()
        };
        assert!(invalid.validate().is_err());

        let invalid = SimulatorConfig::new().with_tolerance(Tolerance::new(0.0, 1e-8));
        assert!(invalid.validate().is_err());

        let invalid = SimulatorConfig::new().with_max_qubits(MAX_QUBITS + 1);
        assert!(invalid.validate().is_err());

        let invalid = SimulatorConfig::new().with_parallel_threshold(0);
        assert!(invalid.validate().is_err());
    }
}
