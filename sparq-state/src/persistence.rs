//! Saving and restoring register state
//!
//! Two formats are supported:
//!
//! - [`StateSnapshot`]: the full sparse vector as JSON. Exact round trip for any state.
//! - Per-qubit records, one line per qubit: `id:re0,im0,re1,im1|`. Only product
//!   states can be written this way; loading rebuilds the product state.

use crate::error::{Result, StateError};
use crate::tracker::{check_qubit_count, StateTracker};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use sparq_core::{ComplexExt, SparseMatrix, Tolerance};
use std::fs;
use std::path::Path;

/// One stored amplitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeEntry {
    pub index: usize,
    pub re: f64,
    pub im: f64,
}

/// Serializable copy of a state vector with its dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub num_qubits: usize,
    pub height: usize,
    pub entries: Vec<AmplitudeEntry>,
}

impl StateSnapshot {
    /// Copy the non-zero amplitudes of `state`
    pub fn capture(state: &StateTracker) -> Self {
        Self {
            num_qubits: state.num_qubits(),
            height: state.dimension(),
            entries: state
                .vector()
                .iter()
                .map(|(index, _, amp)| AmplitudeEntry {
                    index,
                    re: amp.re,
                    im: amp.im,
                })
                .collect(),
        }
    }

    /// Rebuild a tracker, validating dimensions and norm
    pub fn restore(&self, tolerance: Tolerance) -> Result<StateTracker> {
        let expected = u32::try_from(self.num_qubits)
            .ok()
            .and_then(|n| 1usize.checked_shl(n))
            .unwrap_or(0);
        if self.height != expected {
            return Err(StateError::DimensionMismatch {
                expected,
                actual: self.height,
            });
        }
        let entries: Vec<_> = self
            .entries
            .iter()
            .map(|e| (e.index, Complex64::new(e.re, e.im)))
            .collect();
        let vector = SparseMatrix::column_vector_with(self.height, &entries, tolerance.zero)?;
        StateTracker::from_vector(vector, tolerance)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

/// Amplitudes of one qubit in a product state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QubitRecord {
    pub id: usize,
    pub zero: Complex64,
    pub one: Complex64,
}

impl QubitRecord {
    pub fn new(id: usize, zero: Complex64, one: Complex64) -> Self {
        Self { id, zero, one }
    }

    /// `id:re0,im0,re1,im1|`
    pub fn to_line(&self) -> String {
        format!(
            "{}:{},{},{},{}|",
            self.id, self.zero.re, self.zero.im, self.one.re, self.one.im
        )
    }

    /// Parse one record line; `line_no` is reported in errors
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let err = |message: &str| StateError::Parse {
            line: line_no,
            message: message.to_string(),
        };

        let (id, rest) = line.split_once(':').ok_or_else(|| err("missing ':'"))?;
        let id = id.trim().parse::<usize>().map_err(|_| err("invalid qubit id"))?;
        let body = rest.split('|').next().unwrap_or_default();
        let parts = body
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| err("invalid number"))?;
        if parts.len() != 4 {
            return Err(err("expected four components"));
        }
        Ok(Self {
            id,
            zero: Complex64::new(parts[0], parts[1]),
            one: Complex64::new(parts[2], parts[3]),
        })
    }
}

/// Render records, one per line
pub fn format_records(records: &[QubitRecord]) -> String {
    records
        .iter()
        .map(|r| r.to_line() + "\n")
        .collect()
}

/// Parse every non-blank line
pub fn parse_records(text: &str) -> Result<Vec<QubitRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| QubitRecord::parse_line(line, i + 1))
        .collect()
}

pub fn save_qubit_records<P: AsRef<Path>>(path: P, records: &[QubitRecord]) -> Result<()> {
    fs::write(path, format_records(records))?;
    Ok(())
}

pub fn load_qubit_records<P: AsRef<Path>>(path: P) -> Result<Vec<QubitRecord>> {
    parse_records(&fs::read_to_string(path)?)
}

impl StateTracker {
    /// Product state from per-qubit amplitude pairs
    ///
    /// Records may arrive in any order but their ids must be exactly `0..n`.
    /// Each pair must have unit norm.
    pub fn from_qubit_records(records: &[QubitRecord], tolerance: Tolerance) -> Result<Self> {
        let n = records.len();
        check_qubit_count(n)?;
        let mut ordered: Vec<Option<&QubitRecord>> = vec![None; n];
        for record in records {
            match ordered.get_mut(record.id) {
                Some(slot) if slot.is_none() => *slot = Some(record),
                _ => {
                    return Err(StateError::InvalidQubitIndex {
                        index: record.id,
                        num_qubits: n,
                    })
                }
            }
        }

        // Grow the non-zero terms one qubit at a time: |q_k ... q_0⟩
        let mut terms = vec![(0usize, Complex64::new(1.0, 0.0))];
        for (qubit, record) in ordered.into_iter().flatten().enumerate() {
            let norm_sqr = record.zero.norm_sqr() + record.one.norm_sqr();
            if !tolerance.is_normalized(norm_sqr) {
                return Err(StateError::NotNormalized { norm_sqr });
            }
            let mut next = Vec::with_capacity(terms.len() * 2);
            for (bit, factor) in [(0usize, record.zero), (1, record.one)] {
                if factor.is_near_zero(tolerance.zero) {
                    continue;
                }
                next.extend(
                    terms
                        .iter()
                        .map(|&(index, amp)| (index | (bit << qubit), amp * factor)),
                );
            }
            terms = next;
        }
        let vector = SparseMatrix::column_vector_with(1 << n, &terms, tolerance.zero)?;
        Self::from_vector(vector, tolerance)
    }

    /// Factor a product state into per-qubit records
    ///
    /// The global phase is carried by qubit 0.
    ///
    /// # Errors
    /// [`StateError::NotSeparable`] if the state is entangled.
    pub fn qubit_records(&self) -> Result<Vec<QubitRecord>> {
        let tol = self.tolerance();
        let (pivot, pivot_amp) = self
            .vector()
            .iter()
            .map(|(row, _, amp)| (row, amp))
            .max_by(|a, b| a.1.norm_sqr().total_cmp(&b.1.norm_sqr()))
            .ok_or(StateError::NotNormalized { norm_sqr: 0.0 })?;

        let mut records = Vec::with_capacity(self.num_qubits());
        for qubit in 0..self.num_qubits() {
            let mask = 1usize << qubit;
            // Ratio of the flipped amplitude to the pivot fixes this qubit's state
            let ratio = self.amplitude(pivot ^ mask)? / pivot_amp;
            let (a0, a1) = if pivot & mask == 0 {
                (Complex64::new(1.0, 0.0), ratio)
            } else {
                (ratio, Complex64::new(1.0, 0.0))
            };
            let scale = 1.0 / (a0.norm_sqr() + a1.norm_sqr()).sqrt();
            records.push(QubitRecord::new(qubit, a0 * scale, a1 * scale));
        }

        // Put the global phase on qubit 0 so the product reproduces the pivot exactly
        let product_at_pivot = records.iter().fold(Complex64::new(1.0, 0.0), |acc, r| {
            acc * if pivot & (1 << r.id) == 0 { r.zero } else { r.one }
        });
        let phase = pivot_amp / product_at_pivot;
        let phase = phase / phase.norm();
        if let Some(first) = records.first_mut() {
            first.zero *= phase;
            first.one *= phase;
        }

        let rebuilt = Self::from_qubit_records(&records, tol)?;
        if !rebuilt.vector().approx_eq(self.vector(), tol.norm.max(tol.zero).sqrt()) {
            return Err(StateError::NotSeparable);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let state = StateTracker::from_amplitudes(
            &[c(0.6, 0.0), c(0.0, 0.0), c(0.0, 0.8), c(0.0, 0.0)],
            Tolerance::default(),
        )
        .unwrap();
        let snapshot = StateSnapshot::capture(&state);
        assert_eq!(snapshot.entries.len(), 2);

        let json = snapshot.to_json().unwrap();
        let back = StateSnapshot::from_json(&json).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(back.restore(Tolerance::default()).unwrap(), state);
    }

    #[test]
    fn test_snapshot_bad_height() {
        let snapshot = StateSnapshot {
            num_qubits: 2,
            height: 8,
            entries: vec![AmplitudeEntry { index: 0, re: 1.0, im: 0.0 }],
        };
        assert!(matches!(
            snapshot.restore(Tolerance::default()),
            Err(StateError::DimensionMismatch { expected: 4, actual: 8 })
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_snapshot_qubit_count_does_not_wrap() {
        let snapshot = StateSnapshot {
            num_qubits: (1usize << 32) + 2,
            height: 4,
            entries: vec![AmplitudeEntry { index: 0, re: 1.0, im: 0.0 }],
        };
        assert!(matches!(
            snapshot.restore(Tolerance::default()),
            Err(StateError::DimensionMismatch { expected: 0, actual: 4 })
        ));
    }

    #[test]
    fn test_snapshot_restore_keeps_tiny_amplitudes() {
        let tolerance = Tolerance::new(1e-14, 1e-8);
        let snapshot = StateSnapshot {
            num_qubits: 1,
            height: 2,
            entries: vec![
                AmplitudeEntry { index: 0, re: 1.0, im: 0.0 },
                AmplitudeEntry { index: 1, re: 0.0, im: -5e-11 },
            ],
        };
        let state = snapshot.restore(tolerance).unwrap();
        assert_eq!(state.vector().nnz(), 2);
        assert_eq!(state.amplitude(1).unwrap(), c(0.0, -5e-11));
    }

    #[test]
    fn test_record_line_round_trip() {
        let r = QubitRecord::new(3, c(0.6, 0.0), c(0.0, -0.8));
        let line = r.to_line();
        assert_eq!(line, "3:0.6,0,0,-0.8|");
        assert_eq!(QubitRecord::parse_line(&line, 1).unwrap(), r);
    }

    #[test]
    fn test_parse_errors_name_line() {
        let text = "0:1,0,0,0|\n1:abc|\n";
        assert!(matches!(
            parse_records(text),
            Err(StateError::Parse { line: 2, .. })
        ));
        assert!(QubitRecord::parse_line("no colon", 1).is_err());
        assert!(QubitRecord::parse_line("0:1,0,0|", 1).is_err());
    }

    #[test]
    fn test_from_records_qubit_order() {
        // qubit 0 in |1⟩, qubit 1 in |0⟩ -> basis index 1
        let records = [
            QubitRecord::new(1, c(1.0, 0.0), c(0.0, 0.0)),
            QubitRecord::new(0, c(0.0, 0.0), c(1.0, 0.0)),
        ];
        let state = StateTracker::from_qubit_records(&records, Tolerance::default()).unwrap();
        assert_eq!(state.num_qubits(), 2);
        assert_eq!(state.amplitude(1).unwrap(), c(1.0, 0.0));
    }

    #[test]
    fn test_from_records_validation() {
        let bad_norm = [QubitRecord::new(0, c(1.0, 0.0), c(1.0, 0.0))];
        assert!(matches!(
            StateTracker::from_qubit_records(&bad_norm, Tolerance::default()),
            Err(StateError::NotNormalized { .. })
        ));
        let dup = [
            QubitRecord::new(0, c(1.0, 0.0), c(0.0, 0.0)),
            QubitRecord::new(0, c(1.0, 0.0), c(0.0, 0.0)),
        ];
        assert!(StateTracker::from_qubit_records(&dup, Tolerance::default()).is_err());
        assert_eq!(
            StateTracker::from_qubit_records(&[], Tolerance::default()),
            Err(StateError::ZeroQubits)
        );
    }

    #[test]
    fn test_from_records_too_many_qubits() {
        let records: Vec<_> = (0..40)
            .map(|id| QubitRecord::new(id, c(1.0, 0.0), c(0.0, 0.0)))
            .collect();
        assert_eq!(
            StateTracker::from_qubit_records(&records, Tolerance::default()),
            Err(StateError::TooManyQubits {
                num_qubits: 40,
                max: crate::tracker::MAX_QUBITS,
            })
        );
    }

    #[test]
    fn test_from_records_stays_sparse() {
        // 20 qubits in |0⟩ except qubit 3 in |+⟩: two stored amplitudes
        let h = FRAC_1_SQRT_2;
        let records: Vec<_> = (0..20)
            .map(|id| {
                if id == 3 {
                    QubitRecord::new(id, c(h, 0.0), c(h, 0.0))
                } else {
                    QubitRecord::new(id, c(1.0, 0.0), c(0.0, 0.0))
                }
            })
            .collect();
        let state = StateTracker::from_qubit_records(&records, Tolerance::default()).unwrap();
        assert_eq!(state.num_qubits(), 20);
        assert_eq!(state.vector().row_indices(), &[0, 8]);
        assert_relative_eq!(state.amplitude(8).unwrap().re, h, epsilon = 1e-12);
    }

    #[test]
    fn test_product_state_records_round_trip() {
        let records = [
            QubitRecord::new(0, c(FRAC_1_SQRT_2, 0.0), c(0.0, FRAC_1_SQRT_2)),
            QubitRecord::new(1, c(0.0, 0.0), c(1.0, 0.0)),
            QubitRecord::new(2, c(0.6, 0.0), c(-0.8, 0.0)),
        ];
        let state = StateTracker::from_qubit_records(&records, Tolerance::default()).unwrap();
        let extracted = state.qubit_records().unwrap();
        let rebuilt = StateTracker::from_qubit_records(&extracted, Tolerance::default()).unwrap();
        assert!(rebuilt.vector().approx_eq(state.vector(), 1e-9));
        assert_relative_eq!(extracted[2].one.norm_sqr(), 0.64, epsilon = 1e-9);
    }

    #[test]
    fn test_entangled_state_not_separable() {
        let bell = StateTracker::from_amplitudes(
            &[c(FRAC_1_SQRT_2, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(FRAC_1_SQRT_2, 0.0)],
            Tolerance::default(),
        )
        .unwrap();
        assert_eq!(bell.qubit_records(), Err(StateError::NotSeparable));
    }

    #[test]
    fn test_record_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qubits.txt");
        let records = vec![
            QubitRecord::new(0, c(0.0, 0.0), c(1.0, 0.0)),
            QubitRecord::new(1, c(FRAC_1_SQRT_2, 0.0), c(FRAC_1_SQRT_2, 0.0)),
        ];
        save_qubit_records(&path, &records).unwrap();
        assert_eq!(load_qubit_records(&path).unwrap(), records);
    }

    #[test]
    fn test_snapshot_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let state = StateTracker::from_basis_state(3, 6, Tolerance::default()).unwrap();
        StateSnapshot::capture(&state).save(&path).unwrap();
        let loaded = StateSnapshot::load(&path).unwrap();
        assert_eq!(loaded.restore(Tolerance::default()).unwrap(), state);
    }
}
