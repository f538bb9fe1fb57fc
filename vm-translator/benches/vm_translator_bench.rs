//! VM Translator Benchmarks
//!
//! Measures codegen throughput for the hot paths: arithmetic, push/pop,
//! and full-program translation.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use vm_translator::codegen::CodeWriter;

fn bench_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");
    group.throughput(Throughput::Elements(1));

    group.bench_function("add", |b| {
        b.iter(|| {
            let mut writer = CodeWriter::new(Vec::new());
            black_box(writer.write_arithmetic("add", 1).unwrap());
        });
    });

    group.bench_function("eq", |b| {
        b.iter(|| {
            let mut writer = CodeWriter::new(Vec::new());
            black_box(writer.write_arithmetic("eq", 1).unwrap());
        });
    });

    group.finish();
}

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");

    group.bench_function("push_constant", |b| {
        b.iter(|| {
            let mut writer = CodeWriter::new(Vec::new());
            black_box(writer.write_push_pop(true, "constant", 7, 1).unwrap());
        });
    });

    group.bench_function("push_local", |b| {
        b.iter(|| {
            let mut writer = CodeWriter::new(Vec::new());
            black_box(writer.write_push_pop(true, "local", 2, 1).unwrap());
        });
    });

    group.bench_function("pop_argument", |b| {
        b.iter(|| {
            let mut writer = CodeWriter::new(Vec::new());
            black_box(writer.write_push_pop(false, "argument", 1, 1).unwrap());
        });
    });

    group.finish();
}

fn bench_call_return(c: &mut Criterion) {
    let mut group = c.benchmark_group("call_return");

    group.bench_function("call", |b| {
        b.iter(|| {
            let mut writer = CodeWriter::new(Vec::new());
            black_box(writer.write_call("Math.multiply", 2).unwrap());
        });
    });

    group.bench_function("return", |b| {
        b.iter(|| {
            let mut writer = CodeWriter::new(Vec::new());
            black_box(writer.write_return().unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_arithmetic, bench_push_pop, bench_call_return);
criterion_main!(benches);
