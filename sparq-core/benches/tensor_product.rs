use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sparq_core::{ops, Complex64, SparseMatrix};
use std::f64::consts::FRAC_1_SQRT_2;

fn hadamard() -> SparseMatrix {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    SparseMatrix::from_array(&[[h, h], [h, -h]])
}

/// Expanding a single-qubit gate to the full register
fn bench_single_qubit_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_qubit_expansion");
    let id = SparseMatrix::identity(2);
    let h = hadamard();

    for num_qubits in [4usize, 8, 12, 16].iter() {
        let factors: Vec<&SparseMatrix> = (0..*num_qubits)
            .map(|q| if q == 0 { &h } else { &id })
            .collect();

        group.throughput(Throughput::Elements(1 << num_qubits));
        group.bench_with_input(
            BenchmarkId::new("sequential", num_qubits),
            num_qubits,
            |b, _| b.iter(|| black_box(ops::tensor_chain(factors.iter().copied(), usize::MAX))),
        );
        group.bench_with_input(
            BenchmarkId::new("parallel", num_qubits),
            num_qubits,
            |b, _| {
                b.iter(|| {
                    black_box(ops::tensor_chain(
                        factors.iter().copied(),
                        ops::DEFAULT_PARALLEL_THRESHOLD,
                    ))
                })
            },
        );
    }

    group.finish();
}

/// Operator x state product
fn bench_apply_to_vector(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_to_vector");
    let h = hadamard();

    for num_qubits in [4usize, 8, 12, 16].iter() {
        let op = (0..*num_qubits).fold(SparseMatrix::identity(1), |acc, _| {
            ops::tensor_product(&acc, &h)
        });
        let dim = 1usize << num_qubits;
        let state = SparseMatrix::column_vector(dim, &[(0, Complex64::new(1.0, 0.0))]).unwrap();

        group.throughput(Throughput::Elements(dim as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_qubits), num_qubits, |b, _| {
            b.iter(|| black_box(ops::apply_to_vector(&op, &state).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_qubit_expansion, bench_apply_to_vector);
criterion_main!(benches);
