//! Helpers on top of `Complex64`

use num_complex::Complex64;

/// Complex zero
pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);
/// Complex one
pub const ONE: Complex64 = Complex64::new(1.0, 0.0);
/// Imaginary unit
pub const I: Complex64 = Complex64::new(0.0, 1.0);

/// Amplitude-oriented operations on complex values
pub trait ComplexExt {
    /// real² + imag²
    fn magnitude_squared(&self) -> f64;

    /// Whether both components lie strictly within `epsilon` of zero
    fn is_near_zero(&self, epsilon: f64) -> bool;

    /// Argument in degrees, in (-180, 180]
    fn phase_degrees(&self) -> f64;
}

impl ComplexExt for Complex64 {
    #[inline]
    fn magnitude_squared(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    #[inline]
    fn is_near_zero(&self, epsilon: f64) -> bool {
        self.re.abs() < epsilon && self.im.abs() < epsilon
    }

    #[inline]
    fn phase_degrees(&self) -> f64 {
        self.im.atan2(self.re).to_degrees()
    }
}
