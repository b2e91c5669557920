//! Statistical behaviour of seeded measurement

use num_complex::Complex64;
use sparq_core::Tolerance;
use sparq_state::{measurement, SeededSampler, StateTracker};

fn state(amplitudes: &[Complex64]) -> StateTracker {
    StateTracker::from_amplitudes(amplitudes, Tolerance::default()).unwrap()
}

#[test]
fn outcome_frequencies_follow_probabilities() {
    // |ψ⟩ = √0.2 |0⟩ + √0.8 |1⟩
    let psi = state(&[Complex64::new(0.2f64.sqrt(), 0.0), Complex64::new(0.8f64.sqrt(), 0.0)]);
    let mut sampler = SeededSampler::new(2024);
    let shots = 4000;
    let ones = (0..shots)
        .filter(|_| {
            let mut s = psi.snapshot();
            measurement::measure_qubit(&mut s, 0, &mut sampler).unwrap().outcome == 1
        })
        .count();
    let freq = ones as f64 / shots as f64;
    assert!((freq - 0.8).abs() < 0.05, "frequency {}", freq);
}

#[test]
fn same_seed_same_outcomes() {
    let plus_plus = state(&[
        Complex64::new(0.5, 0.0),
        Complex64::new(0.5, 0.0),
        Complex64::new(0.5, 0.0),
        Complex64::new(0.0, 0.5),
    ]);
    let run = |seed| {
        let mut sampler = SeededSampler::new(seed);
        (0..16)
            .map(|_| {
                let mut s = plus_plus.snapshot();
                measurement::measure_all(&mut s, &mut sampler).unwrap()
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(5), run(5));
}

#[test]
fn measuring_one_qubit_leaves_other_superposed() {
    let h = std::f64::consts::FRAC_1_SQRT_2;
    // |+⟩ on qubit 1, |1⟩ on qubit 0
    let mut s = state(&[
        Complex64::new(0.0, 0.0),
        Complex64::new(h, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(h, 0.0),
    ]);
    let mut sampler = SeededSampler::new(1);
    let m = measurement::measure_qubit(&mut s, 0, &mut sampler).unwrap();
    assert_eq!(m.outcome, 1);
    assert_eq!(s.vector().nnz(), 2);
    let p = measurement::probability_of_one(&s, 1).unwrap();
    assert!((p - 0.5).abs() < 1e-12);
}
