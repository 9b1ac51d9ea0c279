use caliper_domain::{Interval1D, IntervalN};
use caliper_store::{DimensionalStore, ValidData};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn iv(a: i32, b: i32) -> IntervalN<i32> {
    IntervalN::new(vec![Interval1D::closed(a, b)])
}

fn populated_store(n: i32) -> DimensionalStore<i32, i32> {
    let mut store = DimensionalStore::with_default_config();
    for i in 0..n {
        let lo = i * 10;
        store
            .set(ValidData::new(iv(lo, lo + 9), i))
            .expect("same arity throughout");
    }
    store
}

fn update_or_remove_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_or_remove");

    for n in [100, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter_batched(
                || populated_store(n),
                |mut store| {
                    let target = iv(black_box(0), n * 10);
                    store
                        .update_or_remove(&target, |v| Some(v + 1))
                        .expect("same arity throughout");
                    black_box(store);
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn recompress_all_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompress_all");

    for n in [100, 1_000, 5_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter_batched(
                || {
                    let mut store = populated_store(n);
                    // Force fragmentation: remove and re-add a thin slice of
                    // every region so recompress_all has real work to do.
                    for i in 0..n {
                        let lo = i * 10;
                        store.remove(&iv(lo + 4, lo + 4)).unwrap();
                        store.set(ValidData::new(iv(lo + 4, lo + 4), i)).unwrap();
                    }
                    store
                },
                |mut store| {
                    store.recompress_all();
                    black_box(&store);
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, update_or_remove_benchmark, recompress_all_benchmark);
criterion_main!(benches);
