use core::hint::black_box;
use std::sync::Arc;
use std::thread::scope;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use ecash_id::{
    CounterStore, FixedPeriod, MemoryCounterStore, Period, RequestId, SequenceGenerator,
    is_valid, parse_period,
};

const TOTAL_IDS: usize = 4096;

fn march() -> Period {
    Period::new(2025, 3).expect("valid period")
}

fn bench_single_thread<S: CounterStore>(c: &mut Criterion, name: &str, make_store: impl Fn() -> S) {
    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));
    group.bench_function("next_id", |b| {
        b.iter_batched(
            || SequenceGenerator::new(make_store(), FixedPeriod(march())),
            |generator| {
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().expect("allocation"));
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let threads = std::thread::available_parallelism().map_or(4, usize::from);
    let mut group = c.benchmark_group("memory/contended");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));
    group.bench_function(format!("{threads}_threads"), |b| {
        b.iter_batched(
            || SequenceGenerator::new(Arc::new(MemoryCounterStore::new()), FixedPeriod(march())),
            |generator| {
                scope(|s| {
                    for _ in 0..threads {
                        s.spawn(|| {
                            for _ in 0..TOTAL_IDS / threads {
                                black_box(generator.next_id().expect("allocation"));
                            }
                        });
                    }
                });
            },
            criterion::BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let id = RequestId::from_components(march(), 7).to_string();
    group.bench_function("is_valid", |b| b.iter(|| is_valid(black_box(&id))));
    group.bench_function("parse_period", |b| b.iter(|| parse_period(black_box(&id))));
    group.bench_function("from_str", |b| {
        b.iter(|| black_box(&id).parse::<RequestId>())
    });
    group.finish();
}

fn bench_stores(c: &mut Criterion) {
    bench_single_thread(c, "memory", MemoryCounterStore::new);
    #[cfg(feature = "sqlite")]
    bench_single_thread(c, "sqlite/in_memory", || {
        ecash_id::SqliteCounterStore::open_in_memory().expect("open sqlite")
    });
}

criterion_group!(benches, bench_stores, bench_contended, bench_parsing);
criterion_main!(benches);
