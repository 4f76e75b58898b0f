//! Benchmarks for the typed property store

use casement_core::properties::PropertyGroup;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn populated(size: usize) -> PropertyGroup {
    let mut props = PropertyGroup::new();
    for i in 0..size {
        props.set(format!("key.{i}"), i as i64);
    }
    props
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("properties_set");

    for size in [10, 100, 1000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| populated(black_box(size)));
        });
    }

    group.finish();
}

fn bench_typed_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("properties_get_int");

    for size in [10, 100, 1000] {
        let props = populated(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut total = 0i64;
                for i in 0..size {
                    total += props.get_int(&format!("key.{i}"), 0);
                }
                black_box(total)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_set, bench_typed_get);
criterion_main!(benches);
