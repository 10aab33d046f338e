//! Performance benchmarks for pool division and subnet enumeration

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use num_bigint::BigUint;
use subnet_planner::{divide, subnets, Cidr, PoolAllocator};

/// Benchmark even division into a growing number of pools
fn bench_divide_even(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_divide_even");
    let base: Cidr = "10.0.0.0/8".parse().unwrap();
    let allocator = PoolAllocator::for_cidr(&base);

    for count in [4usize, 64, 1024].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("pools", count), count, |b, &count| {
            b.iter(|| black_box(allocator.divide_even(count)));
        });
    }

    group.finish();
}

/// Benchmark demand division where the raw demands overrun the base
fn bench_divide_by_demand(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_divide_by_demand");

    for (label, cidr) in [("v4", "10.0.0.0/16"), ("v6", "2001:db8::/32")] {
        let base: Cidr = cidr.parse().unwrap();
        let allocator = PoolAllocator::for_cidr(&base);
        let demands: Vec<BigUint> = (0..256u32)
            .map(|i| BigUint::from(100u32 + i * 37) << (i % 24))
            .collect();

        group.throughput(Throughput::Elements(demands.len() as u64));
        group.bench_function(label, |b| {
            b.iter(|| black_box(allocator.divide_by_demand(&demands)));
        });
    }

    group.finish();
}

/// Benchmark collecting a division versus walking it lazily
fn bench_subnet_division(c: &mut Criterion) {
    let mut group = c.benchmark_group("subnet_division");
    let v4: Cidr = "10.0.0.0/8".parse().unwrap();
    let v6: Cidr = "2001:db8::/32".parse().unwrap();

    group.bench_function("divide_v4_/8_to_/20", |b| {
        b.iter(|| black_box(divide(&v4, 20).unwrap().len()));
    });
    group.bench_function("subnets_v6_/32_to_/48", |b| {
        b.iter(|| black_box(subnets(&v6, 48).unwrap().count()));
    });
    group.bench_function("subnets_v6_first_1000_of_/128", |b| {
        b.iter(|| black_box(subnets(&v6, 128).unwrap().take(1000).count()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_divide_even,
    bench_divide_by_demand,
    bench_subnet_division
);
criterion_main!(benches);
