//! Human-readable views of state vectors
//!
//! Basis labels print the highest qubit first, so bit 0 of the row index is
//! the rightmost character.

use crate::complex::ComplexExt;
use crate::error::{MathError, Result};
use crate::sparse::SparseMatrix;
use num_complex::Complex64;

fn require_column(vector: &SparseMatrix) -> Result<usize> {
    if !vector.is_column_vector() {
        return Err(MathError::NotAColumnVector {
            height: vector.height(),
            width: vector.width(),
        });
    }
    Ok(qubit_width(vector.height()))
}

fn qubit_width(height: usize) -> usize {
    if height <= 1 {
        0
    } else {
        (usize::BITS - (height - 1).leading_zeros()) as usize
    }
}

/// Binary label of a basis index, `width` characters, most significant first
pub fn basis_label(index: usize, width: usize) -> String {
    format!("{:0width$b}", index, width = width)
}

/// Entries whose probability exceeds the vector's zero threshold
fn significant(vector: &SparseMatrix) -> impl Iterator<Item = (usize, Complex64)> + '_ {
    let eps = vector.epsilon();
    vector
        .iter()
        .filter(move |(_, _, amp)| amp.magnitude_squared() > eps)
        .map(|(row, _, amp)| (row, amp))
}

/// Render a complex value with five decimals
///
/// Purely real values print as `0.70711`, purely imaginary as `0.50000i`,
/// anything else as `(a + bi)`.
pub fn complex_to_string(value: Complex64, epsilon: f64) -> String {
    if value.im.abs() < epsilon {
        format!("{:.5}", value.re)
    } else if value.re.abs() < epsilon {
        format!("{:.5}i", value.im)
    } else {
        format!("({:.5} + {:.5}i)", value.re, value.im)
    }
}

/// Dirac notation of a state vector, one basis term per line
///
/// ```text
/// |ψ⟩ =
/// {0.000°} 0.70711 |00⟩
/// {0.000°} 0.70711 |11⟩
/// ```
pub fn dirac_notation(vector: &SparseMatrix) -> Result<String> {
    let width = require_column(vector)?;
    let mut out = String::from("|ψ⟩ =");
    for (row, amp) in significant(vector) {
        out.push_str(&format!(
            "\n{{{:.3}°}} {} |{}⟩",
            amp.phase_degrees(),
            complex_to_string(amp, vector.epsilon()),
            basis_label(row, width)
        ));
    }
    Ok(out)
}

/// Labels of every basis state with non-negligible amplitude, in index order
pub fn basis_states(vector: &SparseMatrix) -> Result<Vec<String>> {
    let width = require_column(vector)?;
    Ok(significant(vector)
        .map(|(row, _)| format!("|{}⟩", basis_label(row, width)))
        .collect())
}

/// The `k` most probable basis states with their probabilities
///
/// Ties keep index order.
pub fn top_magnitude_states(vector: &SparseMatrix, k: usize) -> Result<Vec<(String, f64)>> {
    let width = require_column(vector)?;
    let mut states: Vec<(usize, f64)> = significant(vector)
        .map(|(row, amp)| (row, amp.magnitude_squared()))
        .collect();
    states.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(states
        .into_iter()
        .take(k)
        .map(|(row, p)| (basis_label(row, width), p))
        .collect())
}

/// Phase of every significant amplitude in degrees, keyed by basis label
pub fn phases(vector: &SparseMatrix) -> Result<Vec<(String, f64)>> {
    let width = require_column(vector)?;
    Ok(significant(vector)
        .map(|(row, amp)| (basis_label(row, width), amp.phase_degrees()))
        .collect())
}
