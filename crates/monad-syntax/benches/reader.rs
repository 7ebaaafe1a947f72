//! Reader throughput.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use monad_syntax::{DatumBuilder, Parser};

/// `(f (f (f ... x)))` nested `depth` times.
fn nested(depth: usize) -> String {
    let mut source = String::new();
    for _ in 0..depth {
        source.push_str("(f ");
    }
    source.push('x');
    source.push_str(&")".repeat(depth));
    source
}

fn program(definitions: usize) -> String {
    (0..definitions)
        .map(|i| format!("(define fn-{i} (lambda (n) (if (= n 0) 1 (* n (fn-{i} (- n 1)))))) ; {i}\n"))
        .collect()
}

fn bench_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested");

    for depth in [8, 64, 256] {
        let source = nested(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &source, |b, source| {
            b.iter(|| black_box(Parser::new(source).parse(&mut DatumBuilder).ok()));
        });
    }

    group.finish();
}

fn bench_program(c: &mut Criterion) {
    let source = program(200);

    c.bench_function("parse_all_200_defines", |b| {
        b.iter(|| black_box(Parser::new(&source).parse_all(&mut DatumBuilder).ok()));
    });
}

criterion_group!(benches, bench_nested, bench_program);
criterion_main!(benches);
