//! Error behavior, stepping, sampling and persistence through the facade

use approx::assert_relative_eq;
use sparq_core::Tolerance;
use sparq_gates::GateError;
use sparq_sim::{CircuitPhase, Interpreter, SimulatorConfig, SimulatorError};
use sparq_state::{persistence, StateSnapshot, StateTracker};
use tempfile::tempdir;

#[test]
fn test_out_of_range_leaves_everything() {
    let mut circuit = Interpreter::new(2).unwrap();
    circuit.h(1).unwrap();
    circuit.simulate_silent().unwrap();
    let state = circuit.state_vector().clone();
    circuit.x(0).unwrap();

    let err = circuit.cx(0, 5).unwrap_err();
    assert_eq!(err, SimulatorError::InvalidQubit { qubit: 5, num_qubits: 2 });
    assert_eq!(circuit.pending(), 1);
    assert_eq!(circuit.state_vector(), &state);
}

#[test]
fn test_unknown_gate() {
    let mut circuit = Interpreter::new(1).unwrap();
    let err = circuit.gate("WARP", &[0], &[], None).unwrap_err();
    assert_eq!(err, SimulatorError::Gate(GateError::UnknownGate("WARP".into())));
    assert_eq!(circuit.pending(), 0);
}

#[test]
fn test_generic_gate_names() {
    let mut circuit = Interpreter::new(3).unwrap();
    circuit
        .gate("not", &[0], &[], None)
        .unwrap()
        .gate("cnot", &[1], &[0], None)
        .unwrap()
        .gate("fredkin", &[0, 2], &[1], None)
        .unwrap()
        .gate("phase", &[2], &[], Some(0.25))
        .unwrap();
    assert_eq!(circuit.pending(), 4);
    circuit.simulate_silent().unwrap();
    // X(0), CX(0->1), CSWAP(1; 0, 2) leaves qubits 1 and 2 set
    assert_eq!(circuit.state_vector().row_indices(), &[0b110]);
}

#[test]
fn test_step_by_step() {
    let mut circuit = Interpreter::new(2).unwrap();
    circuit.h(0).unwrap().cx(0, 1).unwrap();
    assert_eq!(circuit.backend().phase(), CircuitPhase::Building);

    let first = circuit.step().unwrap().unwrap();
    assert_eq!(first.name(), "H");
    assert_eq!(circuit.backend().phase(), CircuitPhase::Draining);
    assert_eq!(circuit.pending(), 1);

    let second = circuit.step().unwrap().unwrap();
    assert_eq!(second.name(), "CX");
    assert_eq!(circuit.backend().phase(), CircuitPhase::Idle);
    assert!(circuit.step().unwrap().is_none());
}

#[test]
fn test_simulate_trace_lines() {
    let mut circuit = Interpreter::new(2).unwrap();
    circuit.h(0).unwrap().cx(0, 1).unwrap();
    let trace = circuit.simulate().unwrap();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace.steps[1].operation, "CX targets=[1] controls=[0]");
    let last = trace.final_state().unwrap();
    assert!(last.contains("|00⟩"));
    assert!(last.contains("|11⟩"));
}

#[test]
fn test_same_seed_same_outcomes() {
    let run = || {
        let config = SimulatorConfig::default().with_seed(1234);
        let mut circuit = Interpreter::with_config(4, config).unwrap();
        for q in 0..4 {
            circuit.h(q).unwrap();
        }
        (0..5)
            .map(|_| {
                let bits = circuit.measure_all().unwrap();
                circuit.reset().unwrap();
                for q in 0..4 {
                    circuit.h(q).unwrap();
                }
                bits
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_sample_frequencies() {
    let config = SimulatorConfig::default().with_seed(99).with_shots(4000);
    let mut circuit = Interpreter::with_config(1, config).unwrap();
    circuit.ry(2.0 * (0.2f64).sqrt().asin(), 0).unwrap();
    let counts = circuit.sample_default().unwrap();
    assert_eq!(counts.total_shots(), 4000);
    let p1 = counts.probability("1");
    assert!((p1 - 0.2).abs() < 0.03, "p1 = {}", p1);
    assert_eq!(circuit.pending(), 1);
}

#[test]
fn test_sample_zero_shots() {
    let mut circuit = Interpreter::new(1).unwrap();
    assert!(matches!(circuit.sample(0), Err(SimulatorError::InvalidConfig(_))));
}

#[test]
fn test_snapshot_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut circuit = Interpreter::new(3).unwrap();
    circuit.h(0).unwrap().cry(0.8, 0, 2).unwrap().t(1).unwrap();
    circuit.simulate_silent().unwrap();
    circuit.snapshot().save(&path).unwrap();

    let mut other = Interpreter::new(1).unwrap();
    other.restore(&StateSnapshot::load(&path).unwrap()).unwrap();
    assert_eq!(other.num_qubits(), 3);
    assert_eq!(other.state_vector(), circuit.state_vector());

    // gates queued after a restore use the restored register size
    other.x(2).unwrap();
    other.simulate_silent().unwrap();
}

#[test]
fn test_qubit_records_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("qubits.txt");

    let mut circuit = Interpreter::new(2).unwrap();
    circuit.h(0).unwrap().x(1).unwrap().s(1).unwrap();
    circuit.simulate_silent().unwrap();
    let records = circuit.tracker().qubit_records().unwrap();
    persistence::save_qubit_records(&path, &records).unwrap();

    let loaded = persistence::load_qubit_records(&path).unwrap();
    let tracker = StateTracker::from_qubit_records(&loaded, circuit.tracker().tolerance()).unwrap();
    assert!(tracker.vector().approx_eq(circuit.state_vector(), 1e-9));
}

#[test]
fn test_entangled_state_has_no_qubit_records() {
    let mut circuit = Interpreter::new(2).unwrap();
    circuit.h(0).unwrap().cx(0, 1).unwrap();
    circuit.simulate_silent().unwrap();
    assert!(circuit.tracker().qubit_records().is_err());
}

#[test]
fn test_device_switch() {
    let mut circuit = Interpreter::new(1).unwrap();
    circuit.h(0).unwrap();
    circuit.device(3).unwrap();
    assert_eq!(circuit.num_qubits(), 3);
    assert_eq!(circuit.pending(), 0);
    circuit.x(2).unwrap();
    circuit.simulate_silent().unwrap();
    assert_eq!(circuit.state_vector().row_indices(), &[4]);
}

#[test]
fn test_too_many_qubits_rejected() {
    let config = SimulatorConfig::default().with_max_qubits(3);
    let mut circuit = Interpreter::with_config(2, config).unwrap();
    assert!(matches!(
        circuit.device(4),
        Err(SimulatorError::TooManyQubits { num_qubits: 4, max_qubits: 3 })
    ));
    assert_eq!(circuit.num_qubits(), 2);
}

#[test]
fn test_fine_tolerance_keeps_small_rotations() {
    let config = SimulatorConfig::default().with_tolerance(Tolerance::new(1e-14, 1e-8));

    let mut circuit = Interpreter::with_config(1, config.clone()).unwrap();
    circuit.rx(1e-10, 0).unwrap();
    circuit.simulate_silent().unwrap();
    assert_eq!(circuit.state_vector().nnz(), 2);
    let amp = circuit.tracker().amplitude(1).unwrap();
    assert_relative_eq!(amp.im, -5e-11, epsilon = 1e-20);

    let mut circuit = Interpreter::with_config(2, config).unwrap();
    circuit.x(0).unwrap().crx(1e-10, 0, 1).unwrap();
    circuit.simulate_silent().unwrap();
    assert_eq!(circuit.state_vector().row_indices(), &[1, 3]);
    let amp = circuit.tracker().amplitude(3).unwrap();
    assert_relative_eq!(amp.im, -5e-11, epsilon = 1e-20);
}

#[test]
fn test_default_tolerance_prunes_small_rotations() {
    let mut circuit = Interpreter::new(1).unwrap();
    circuit.rx(1e-10, 0).unwrap();
    circuit.simulate_silent().unwrap();
    assert_eq!(circuit.state_vector().row_indices(), &[0]);
}
