//! Criterion benchmarks for slot operations.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::Rng;
use slot_cache::{retrieve_fn, CacheSlot};
use std::hint::black_box;
use std::sync::Arc;

fn bench_get_hit(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Failed to build runtime");
    let slot = CacheSlot::with_value(42u64);

    c.bench_function("get_hit_fast_path", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(slot.get().await.expect("get failed")) });
    });
}

fn bench_store(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Failed to build runtime");
    let slot = CacheSlot::new();

    c.bench_function("store_no_persister", |b| {
        b.to_async(&rt).iter(|| async {
            let value = rand::rng().random::<u64>();
            slot.store(value).await.expect("store failed")
        });
    });
}

fn bench_get_miss_with_retrieval(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Failed to build runtime");

    c.bench_function("get_miss_with_retrieval", |b| {
        b.to_async(&rt).iter_batched(
            || {
                Arc::new(
                    CacheSlot::builder()
                        .retriever(retrieve_fn(|| async { Ok(Some(7u64)) }))
                        .build(),
                )
            },
            |slot| async move { black_box(slot.get().await.expect("get failed")) },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_get_hit,
    bench_store,
    bench_get_miss_with_retrieval
);
criterion_main!(benches);
