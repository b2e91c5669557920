//! Bell pair, sampling and a Fourier transform round trip
//!
//! Run with: cargo run --example bell_and_fourier

use sparq_sim::{Interpreter, Result, SimulatorConfig};

fn main() -> Result<()> {
    println!("=== Bell pair ===\n");
    let config = SimulatorConfig::debug().with_shots(1000);
    let mut circuit = Interpreter::with_config(2, config)?;
    circuit.h(0)?.cx(0, 1)?;

    let counts = circuit.sample_default()?;
    println!("{}", counts);

    let trace = circuit.simulate()?;
    println!("{}", trace);

    println!("=== Fourier transform of |011⟩ ===\n");
    circuit.device(3)?;
    circuit.x(0)?.x(1)?.qft(0..3)?;
    circuit.simulate_silent()?;
    println!("{}\n", circuit.dirac());
    for (label, degrees) in circuit.phase()? {
        println!("  {} phase {:8.3}°", label, degrees);
    }

    circuit.iqft(0..3)?;
    circuit.simulate_silent()?;
    println!("\nafter inverse: {}", circuit.dirac());

    if let Some(stats) = circuit.statistics() {
        println!("\n{}", stats);
    }
    Ok(())
}
