mod common;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use minilang::backend::{self, Backend};

fn bench_backends(c: &mut Criterion) {
    for (label, path) in common::workloads() {
        let program = common::load_program(&path);

        for mut backend in backend::backends() {
            c.bench_function(&format!("backend_{}_{label}", backend.name()), |b| {
                b.iter(|| {
                    let output = backend.run(black_box(&program)).expect("run");
                    black_box(output);
                })
            });
        }
    }
}

criterion_group!(benches, bench_backends);
criterion_main!(benches);
