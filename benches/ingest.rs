//! Ingestion and query benchmarks for the popularity pipeline.
//!
//! Run with: `cargo bench --bench ingest`
//!
//! Measures per-record ingestion latency, snapshot + index construction, and
//! range-query latency against a frozen index, all over the same synthetic
//! skewed trace.

use std::hint::black_box;
use std::time::Instant;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use flowkit::index::LinearPopularityIndex;
use flowkit::key::AddrKey;
use flowkit::sketch::TopFlowSketch;

const K: usize = 64;
const COLUMNS: usize = 4_096;
const TRACE_LEN: usize = 100_000;

/// Skewed synthetic trace: ~90% of records drawn from 64 hot flows, the rest
/// spread over a million-key cold tail.
fn synthetic_trace(seed: u64) -> Vec<AddrKey> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..TRACE_LEN)
        .map(|_| {
            if rng.gen_range(0..10) < 9 {
                AddrKey::new(rng.gen_range(0..64u128))
            } else {
                AddrKey::new(rng.gen_range(0..1_000_000u128))
            }
        })
        .collect()
}

// ============================================================================
// Ingestion latency (ns/record)
// ============================================================================

fn bench_ingest(c: &mut Criterion) {
    let trace = synthetic_trace(1);
    let mut group = c.benchmark_group("ingest_ns");
    group.throughput(Throughput::Elements(TRACE_LEN as u64));

    group.bench_function("top_flow_sketch", |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let mut sketch = TopFlowSketch::try_new(K, COLUMNS).unwrap();
                for key in &trace {
                    sketch.insert(key);
                }
                black_box(sketch.len());
            }
            start.elapsed()
        })
    });

    group.finish();
}

// ============================================================================
// Snapshot + index construction
// ============================================================================

fn bench_index_build(c: &mut Criterion) {
    let trace = synthetic_trace(2);
    let mut sketch = TopFlowSketch::try_new(K, COLUMNS).unwrap();
    for key in &trace {
        sketch.insert(key);
    }

    let mut group = c.benchmark_group("index_build");
    group.bench_function("snapshot_and_linear_index", |b| {
        b.iter(|| {
            let snapshot = sketch.snapshot();
            black_box(LinearPopularityIndex::from_snapshot(&snapshot))
        })
    });
    group.finish();
}

// ============================================================================
// Range-query latency against a frozen index
// ============================================================================

fn bench_range_queries(c: &mut Criterion) {
    let trace = synthetic_trace(3);
    let mut sketch = TopFlowSketch::try_new(K, COLUMNS).unwrap();
    for key in &trace {
        sketch.insert(key);
    }
    let index = LinearPopularityIndex::from_snapshot(&sketch.snapshot());

    const QUERIES: u64 = 10_000;
    let mut group = c.benchmark_group("range_query_ns");
    group.throughput(Throughput::Elements(QUERIES));

    group.bench_function("linear_range_sum", |b| {
        b.iter_custom(|iters| {
            let mut rng = StdRng::seed_from_u64(4);
            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..QUERIES {
                    let low = rng.gen_range(0..512u128);
                    black_box(index.range_sum(low, low + 64));
                }
            }
            start.elapsed()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_ingest,
    bench_index_build,
    bench_range_queries
);
criterion_main!(benches);
