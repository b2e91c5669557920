//! Computational basis measurement with collapse
//!
//! Measuring qubit `q`:
//! 1. `p1` = sum of |amp|² over indices with bit `q` set (snapped to 0 or 1
//!    when within the zero tolerance, so a collapsed qubit re-measures the same)
//! 2. draw `r` in [0, 1); the outcome is 1 when `r < p1`
//! 3. multiply by the projector `I ⊗ .. ⊗ |b⟩⟨b| ⊗ .. ⊗ I` and divide by √mass
//!
//! A retained mass within tolerance of zero is a degeneracy error.

use crate::error::{Result, StateError};
use crate::tracker::StateTracker;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sparq_core::{ops, SparseMatrix};

/// Source of uniform samples in [0, 1)
pub trait Sampler {
    fn next_uniform(&mut self) -> f64;
}

impl<F> Sampler for F
where
    F: FnMut() -> f64,
{
    fn next_uniform(&mut self) -> f64 {
        self()
    }
}

/// [`Sampler`] backed by a seedable `StdRng`
#[derive(Debug, Clone)]
pub struct SeededSampler {
    rng: StdRng,
}

impl SeededSampler {
    /// Reproducible sampler
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sampler seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, otherwise from entropy
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }
}

impl Sampler for SeededSampler {
    fn next_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// One observed qubit value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementOutcome {
    pub qubit: usize,
    /// Observed classical bit
    pub outcome: u8,
    /// Probability the observed value had before collapse
    pub probability: f64,
}

/// Probability of reading 1 on `qubit`
///
/// # Errors
/// [`StateError::InvalidQubitIndex`] if `qubit >= num_qubits`.
pub fn probability_of_one(state: &StateTracker, qubit: usize) -> Result<f64> {
    state.check_qubit(qubit)?;
    let mask = 1usize << qubit;
    let p1: f64 = state
        .vector()
        .iter()
        .filter(|(row, _, _)| row & mask != 0)
        .map(|(_, _, amp)| amp.norm_sqr())
        .sum();

    let tol = state.tolerance();
    Ok(if p1 < tol.zero {
        0.0
    } else if p1 > 1.0 - tol.zero {
        1.0
    } else {
        p1
    })
}

/// Projector onto `outcome` for `qubit`, identity on every other qubit
pub fn projector(num_qubits: usize, qubit: usize, outcome: u8) -> Result<SparseMatrix> {
    let ket = SparseMatrix::column_vector(2, &[(outcome as usize & 1, Complex64::new(1.0, 0.0))])?;
    let local = ops::outer_product(&ket, &ket)?;
    let id = SparseMatrix::identity(2);
    // Highest qubit is the leftmost factor
    let factors: Vec<&SparseMatrix> = (0..num_qubits)
        .rev()
        .map(|q| if q == qubit { &local } else { &id })
        .collect();
    Ok(ops::tensor_chain(factors, usize::MAX))
}

/// Force `qubit` to `outcome` and renormalize
///
/// Returns the probability mass that was retained.
///
/// # Errors
/// [`StateError::MeasurementDegenerate`] when the retained mass is within
/// tolerance of zero; the state is not modified in that case.
pub fn collapse(state: &mut StateTracker, qubit: usize, outcome: u8) -> Result<f64> {
    state.check_qubit(qubit)?;
    let p = projector(state.num_qubits(), qubit, outcome)?.with_epsilon(state.tolerance().zero);
    let projected = ops::apply_to_vector(&p, state.vector())?;
    let mass = projected.sum_magnitude_squared();
    if mass < state.tolerance().zero {
        return Err(StateError::MeasurementDegenerate { qubit, mass });
    }
    state.replace_vector(projected.scaled(Complex64::new(1.0 / mass.sqrt(), 0.0)));
    state.renormalize()?;
    Ok(mass)
}

/// Sample and collapse one qubit
pub fn measure_qubit(
    state: &mut StateTracker,
    qubit: usize,
    sampler: &mut dyn Sampler,
) -> Result<MeasurementOutcome> {
    let p1 = probability_of_one(state, qubit)?;
    let r = sampler.next_uniform();
    let outcome = u8::from(r < p1);
    collapse(state, qubit, outcome)?;
    Ok(MeasurementOutcome {
        qubit,
        outcome,
        probability: if outcome == 1 { p1 } else { 1.0 - p1 },
    })
}

/// Measure qubits `0..n` in order; the bitstring prints qubit `n-1` first
pub fn measure_all(state: &mut StateTracker, sampler: &mut dyn Sampler) -> Result<String> {
    let n = state.num_qubits();
    let mut bits = vec![b'0'; n];
    for qubit in 0..n {
        let m = measure_qubit(state, qubit, sampler)?;
        bits[n - 1 - qubit] = b'0' + m.outcome;
    }
    Ok(bits.into_iter().map(char::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sparq_core::Tolerance;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn plus() -> StateTracker {
        StateTracker::from_amplitudes(&[c(FRAC_1_SQRT_2, 0.0), c(FRAC_1_SQRT_2, 0.0)], Tolerance::default())
            .unwrap()
    }

    fn bell() -> StateTracker {
        StateTracker::from_amplitudes(
            &[c(FRAC_1_SQRT_2, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(FRAC_1_SQRT_2, 0.0)],
            Tolerance::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_probability_of_one() {
        assert_relative_eq!(probability_of_one(&plus(), 0).unwrap(), 0.5, epsilon = 1e-12);
        let one = StateTracker::from_basis_state(2, 2, Tolerance::default()).unwrap();
        assert_eq!(probability_of_one(&one, 0).unwrap(), 0.0);
        assert_eq!(probability_of_one(&one, 1).unwrap(), 1.0);
        assert!(matches!(
            probability_of_one(&one, 2),
            Err(StateError::InvalidQubitIndex { index: 2, num_qubits: 2 })
        ));
    }

    #[test]
    fn test_ground_state_always_zero() {
        let mut sampler = SeededSampler::new(7);
        for _ in 0..50 {
            let mut state = StateTracker::new(1).unwrap();
            let m = measure_qubit(&mut state, 0, &mut sampler).unwrap();
            assert_eq!(m.outcome, 0);
            assert_eq!(m.probability, 1.0);
        }
    }

    #[test]
    fn test_sample_threshold() {
        let mut state = plus();
        let mut low = || 0.49;
        assert_eq!(measure_qubit(&mut state, 0, &mut low).unwrap().outcome, 1);

        let mut state = plus();
        let mut high = || 0.51;
        assert_eq!(measure_qubit(&mut state, 0, &mut high).unwrap().outcome, 0);
    }

    #[test]
    fn test_collapse_renormalizes() {
        let mut state = plus();
        let mut sampler = || 0.0;
        let m = measure_qubit(&mut state, 0, &mut sampler).unwrap();
        assert_eq!(m.outcome, 1);
        assert_relative_eq!(m.probability, 0.5, epsilon = 1e-12);
        assert_eq!(state.vector().nnz(), 1);
        assert_relative_eq!(state.amplitude(1).unwrap().re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(state.norm_sqr(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_repeat_measurement_is_stable() {
        let mut state = plus();
        let mut sampler = SeededSampler::new(99);
        let first = measure_qubit(&mut state, 0, &mut sampler).unwrap().outcome;
        for _ in 0..20 {
            assert_eq!(measure_qubit(&mut state, 0, &mut sampler).unwrap().outcome, first);
        }
    }

    #[test]
    fn test_bell_correlation() {
        for seed in 0..20 {
            let mut state = bell();
            let mut sampler = SeededSampler::new(seed);
            let bits = measure_all(&mut state, &mut sampler).unwrap();
            assert!(bits == "00" || bits == "11", "got {}", bits);
        }
    }

    #[test]
    fn test_degenerate_collapse() {
        let mut state = StateTracker::new(1).unwrap();
        state.set_amplitude(0, c(0.0, 0.0)).unwrap();
        let mut sampler = || 0.3;
        assert!(matches!(
            measure_qubit(&mut state, 0, &mut sampler),
            Err(StateError::MeasurementDegenerate { qubit: 0, .. })
        ));
    }

    #[test]
    fn test_projector_shape() {
        let p = projector(3, 1, 1).unwrap();
        assert_eq!(p.height(), 8);
        assert_eq!(p.nnz(), 4);
        for (row, col, _) in p.iter() {
            assert_eq!(row, col);
            assert_ne!(row & 0b010, 0);
        }
    }

    #[test]
    fn test_seeded_sampler_reproducible() {
        let mut a = SeededSampler::new(42);
        let mut b = SeededSampler::new(42);
        for _ in 0..10 {
            let x = a.next_uniform();
            assert!((0.0..1.0).contains(&x));
            assert_eq!(x, b.next_uniform());
        }
    }
}
