//! Criterion micro-benchmarks for save relocation and encrypted access.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tandem_bench::save_profile;
use tandem_save::BlockId;

/// Benchmark: one full relocation (capture, move, restore, re-key).
fn bench_relocate(c: &mut Criterion) {
    let mut save = save_profile(42);

    c.bench_function("relocate", |b| {
        b.iter(|| {
            let report = save.relocate().unwrap();
            black_box(report);
        });
    });
}

/// Benchmark: decode and re-encode the whole bag.
fn bench_bag_round_trip(c: &mut Criterion) {
    let mut save = save_profile(42);

    c.bench_function("bag_load_save", |b| {
        b.iter(|| {
            let bag = save.load_bag().unwrap();
            save.save_bag(&bag).unwrap();
        });
    });
}

/// Benchmark: persist every block to its on-disk image.
fn bench_persist(c: &mut Criterion) {
    let save = save_profile(42);

    c.bench_function("persist_all_blocks", |b| {
        b.iter(|| {
            for id in BlockId::ALL {
                black_box(save.persist(id));
            }
        });
    });
}

criterion_group!(benches, bench_relocate, bench_bag_round_trip, bench_persist);
criterion_main!(benches);
