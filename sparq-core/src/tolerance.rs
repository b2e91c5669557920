//! Numerical tolerance shared by zero tests and norm checks

/// Default threshold below which an amplitude component counts as zero
pub const DEFAULT_ZERO_EPSILON: f64 = 1e-10;

/// Default allowed drift of a state vector's squared norm from one
pub const DEFAULT_NORM_EPSILON: f64 = 1e-8;

/// Numeric tolerances threaded through every comparison against zero or one
///
/// A single value is created per simulation run (usually from the simulator
/// configuration) and handed to every matrix, state and measurement that needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Component magnitude below which a complex value is treated as zero
    pub zero: f64,
    /// Allowed deviation of the squared norm from one
    pub norm: f64,
}

impl Tolerance {
    /// Create a tolerance with explicit thresholds
    pub const fn new(zero: f64, norm: f64) -> Self {
        Self { zero, norm }
    }

    /// Whether `value` lies within `zero` of `target`
    #[inline]
    pub fn near(&self, value: f64, target: f64) -> bool {
        (value - target).abs() < self.zero
    }

    /// Whether a squared norm is acceptably close to one
    #[inline]
    pub fn is_normalized(&self, norm_sqr: f64) -> bool {
        (norm_sqr - 1.0).abs() <= self.norm
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(DEFAULT_ZERO_EPSILON, DEFAULT_NORM_EPSILON)
    }
}
