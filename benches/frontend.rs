mod common;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use minilang::backend::codegen::CodeGenerator;
use minilang::{lexer, parser};

/// Source-to-source pipeline stages, each timed per fixture workload.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let generator = CodeGenerator::new();

    for (label, path) in common::workloads() {
        let source = common::load_source(&path);
        let tokens = lexer::tokenize(&source).expect("tokenize");
        let program = common::load_program(&path);

        group.bench_with_input(BenchmarkId::new("lex", &label), &source, |b, source| {
            b.iter(|| lexer::tokenize(black_box(source)).expect("tokenize"))
        });
        group.bench_with_input(BenchmarkId::new("parse", &label), &tokens, |b, tokens| {
            b.iter(|| parser::parse_tokens(black_box(tokens.clone())).expect("parse"))
        });
        group.bench_with_input(BenchmarkId::new("generate", &label), &program, |b, program| {
            b.iter(|| generator.generate(black_box(program)).expect("generate"))
        });
        group.bench_with_input(
            BenchmarkId::new("source_to_cpp", &label),
            &source,
            |b, source| {
                b.iter(|| {
                    let program = minilang::parse_source(black_box(source)).expect("parse");
                    generator.generate(&program).expect("generate")
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
