//! Criterion benchmarks for the payroll aggregator

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use techpay::services::Aggregator;
use techpay::types::JobRecord;

/// Synthetic month of jobs spread across `technicians` people
fn make_jobs(count: usize, technicians: usize) -> Vec<JobRecord> {
    (0..count)
        .map(|i| {
            let tech = i % technicians;
            let day = (i % 28) as u32 + 1;
            JobRecord {
                technician_id: Some(format!("pro_{}", tech)),
                technician_name: Some(format!("Technician {}", tech)),
                amount: Some(((i * 37) % 2_000) as f64 + 0.5),
                tip: (i % 3 == 0).then_some(15.0),
                cc_fee: Some(((i * 37) % 2_000) as f64 * 0.029),
                ..JobRecord::new(
                    format!("job_{}", i),
                    NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                )
            }
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregator");

    for &count in &[100usize, 1_000, 10_000] {
        let jobs = make_jobs(count, 25);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("aggregate", format!("{} jobs", count)),
            &jobs,
            |b, jobs| {
                b.iter(|| Aggregator::aggregate(black_box(jobs)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
