use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use slice_recycling::pool::{Pool, PoolConfig, PoolKind};
use slice_recycling::record::RecordEncoder;
use slice_recycling::workload::{run_bench, BenchOptions, Workload, DEFAULT_SEED};

/// Benchmark a single encode cycle (acquire, append, release) per pool
fn bench_single_cycle(c: &mut Criterion) {
    let key = [b'a'; 100];

    let mut group = c.benchmark_group("single_cycle");
    for records in [1usize, 10, 100] {
        group.throughput(Throughput::Elements(records as u64));
        for kind in PoolKind::ALL {
            let pool = Pool::new(kind, &PoolConfig::default());
            group.bench_with_input(BenchmarkId::new(kind.as_str(), records), &records, |b, &n| {
                b.iter(|| {
                    let mut enc = RecordEncoder::new(&pool);
                    for i in 0..n {
                        enc.append_record(&key, i as i64).unwrap();
                    }
                    black_box(enc.len());
                    enc.release();
                })
            });
        }
    }
    group.finish();
}

/// Benchmark the concurrent synthetic workload per pool
fn bench_concurrent_workload(c: &mut Criterion) {
    let workload = Workload::generate(DEFAULT_SEED);
    let options = BenchOptions {
        iterations: 2_000,
        workers: 20,
        ..Default::default()
    };

    let mut group = c.benchmark_group("concurrent_workload");
    group.sample_size(10);
    group.throughput(Throughput::Elements(options.iterations as u64));
    for kind in PoolKind::ALL {
        let pool = Pool::new(kind, &PoolConfig::default());
        group.bench_function(kind.as_str(), |b| {
            b.iter(|| black_box(run_bench(&pool, &workload, &options).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_cycle, bench_concurrent_workload);
criterion_main!(benches);
