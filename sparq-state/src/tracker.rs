//! Owned state vector of an n-qubit register
//!
//! [`StateTracker`] wraps one `2^n x 1` [`SparseMatrix`]. Qubit `k` is bit `k`
//! of a basis index. The squared norm is checked after every operator
//! application and every collapse; small drift is rescaled away, a vanished
//! norm is an error.

use crate::error::{Result, StateError};
use num_complex::Complex64;
use sparq_core::{format, ops, SparseMatrix, Tolerance};
use std::fmt;

/// Largest register the tracker accepts
pub const MAX_QUBITS: usize = 30;

/// Result of a post-mutation norm check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormCheck {
    /// Norm was already within tolerance
    Unchanged,
    /// Norm drifted and the vector was rescaled
    Restored { norm_sqr: f64 },
}

/// Sparse state vector plus the tolerance it is compared under
#[derive(Debug, Clone, PartialEq)]
pub struct StateTracker {
    num_qubits: usize,
    vector: SparseMatrix,
    tolerance: Tolerance,
}

pub(crate) fn check_qubit_count(num_qubits: usize) -> Result<()> {
    if num_qubits == 0 {
        return Err(StateError::ZeroQubits);
    }
    if num_qubits > MAX_QUBITS {
        return Err(StateError::TooManyQubits {
            num_qubits,
            max: MAX_QUBITS,
        });
    }
    Ok(())
}

impl StateTracker {
    /// Fresh `|0...0⟩` register with default tolerances
    ///
    /// # Errors
    /// [`StateError::ZeroQubits`] for `0`, [`StateError::TooManyQubits`] above [`MAX_QUBITS`].
    ///
    /// # Example
    /// ```
    /// use sparq_state::StateTracker;
    ///
    /// let state = StateTracker::new(3).unwrap();
    /// assert_eq!(state.dimension(), 8);
    /// assert_eq!(state.vector().nnz(), 1);
    /// ```
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::with_tolerance(num_qubits, Tolerance::default())
    }

    /// Fresh `|0...0⟩` register
    pub fn with_tolerance(num_qubits: usize, tolerance: Tolerance) -> Result<Self> {
        Self::from_basis_state(num_qubits, 0, tolerance)
    }

    /// Computational basis state `|index⟩`
    pub fn from_basis_state(num_qubits: usize, index: usize, tolerance: Tolerance) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        let dimension = 1usize << num_qubits;
        if index >= dimension {
            return Err(StateError::DimensionMismatch {
                expected: dimension,
                actual: index + 1,
            });
        }
        let vector = SparseMatrix::column_vector_with(
            dimension,
            &[(index, Complex64::new(1.0, 0.0))],
            tolerance.zero,
        )?;
        Ok(Self {
            num_qubits,
            vector,
            tolerance,
        })
    }

    /// Adopt an existing column vector
    ///
    /// # Errors
    /// - [`StateError::InvalidDimension`] unless the vector is `2^n x 1` with `n >= 1`
    /// - [`StateError::NotNormalized`] if the squared norm is off by more than `tolerance.norm`
    pub fn from_vector(vector: SparseMatrix, tolerance: Tolerance) -> Result<Self> {
        let (height, width) = (vector.height(), vector.width());
        if width != 1 || height < 2 || !height.is_power_of_two() {
            return Err(StateError::InvalidDimension { height, width });
        }
        let num_qubits = height.trailing_zeros() as usize;
        check_qubit_count(num_qubits)?;

        let norm_sqr = vector.sum_magnitude_squared();
        if !tolerance.is_normalized(norm_sqr) {
            return Err(StateError::NotNormalized { norm_sqr });
        }
        Ok(Self {
            num_qubits,
            vector: vector.with_epsilon(tolerance.zero),
            tolerance,
        })
    }

    /// Adopt a dense amplitude list of length `2^n`
    pub fn from_amplitudes(amplitudes: &[Complex64], tolerance: Tolerance) -> Result<Self> {
        let entries: Vec<_> = amplitudes.iter().copied().enumerate().collect();
        let vector = SparseMatrix::column_vector_with(amplitudes.len(), &entries, tolerance.zero)?;
        Self::from_vector(vector, tolerance)
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Length of the state vector, `2^n`
    #[inline]
    pub fn dimension(&self) -> usize {
        self.vector.height()
    }

    #[inline]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Borrow the underlying sparse column
    #[inline]
    pub fn vector(&self) -> &SparseMatrix {
        &self.vector
    }

    /// Deep copy for experiments that must not disturb this state
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn amplitude(&self, index: usize) -> Result<Complex64> {
        Ok(self.vector.get(index, 0)?)
    }

    /// Overwrite one amplitude without renormalizing
    ///
    /// Call [`StateTracker::renormalize`] once a batch of writes is done.
    pub fn set_amplitude(&mut self, index: usize, value: Complex64) -> Result<()> {
        Ok(self.vector.put(index, 0, value)?)
    }

    /// |amplitude|² of a basis state
    pub fn probability(&self, index: usize) -> Result<f64> {
        Ok(self.amplitude(index)?.norm_sqr())
    }

    pub fn norm_sqr(&self) -> f64 {
        self.vector.sum_magnitude_squared()
    }

    pub fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    /// Left-multiply `operator` into the state and re-check the norm
    ///
    /// On error the state is left untouched.
    pub fn apply(&mut self, operator: &SparseMatrix) -> Result<NormCheck> {
        let next = ops::apply_to_vector(operator, &self.vector)?;
        let (next, check) = normalized(next, self.tolerance)?;
        self.vector = next;
        Ok(check)
    }

    /// Restore unit norm if it drifted beyond `tolerance.norm`
    ///
    /// # Errors
    /// [`StateError::NotNormalized`] if the norm has vanished.
    pub fn renormalize(&mut self) -> Result<NormCheck> {
        let (next, check) = normalized(self.vector.clone(), self.tolerance)?;
        self.vector = next;
        Ok(check)
    }

    pub(crate) fn replace_vector(&mut self, vector: SparseMatrix) {
        debug_assert_eq!(vector.height(), self.dimension());
        self.vector = vector;
    }

    /// Dense amplitudes, for small registers and tests
    pub fn to_dense(&self, limit: usize) -> Result<Vec<Complex64>> {
        Ok(self
            .vector
            .to_dense(limit)?
            .into_iter()
            .map(|row| row[0])
            .collect())
    }
}

fn normalized(vector: SparseMatrix, tolerance: Tolerance) -> Result<(SparseMatrix, NormCheck)> {
    let norm_sqr = vector.sum_magnitude_squared();
    if norm_sqr < tolerance.zero {
        return Err(StateError::NotNormalized { norm_sqr });
    }
    if tolerance.is_normalized(norm_sqr) {
        return Ok((vector, NormCheck::Unchanged));
    }
    let rescaled = vector.scaled(Complex64::new(1.0 / norm_sqr.sqrt(), 0.0));
    Ok((rescaled, NormCheck::Restored { norm_sqr }))
}

impl fmt::Display for StateTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match format::dirac_notation(&self.vector) {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}", self.vector),
        }
    }
}
