use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chrono::{TimeZone, Utc};
use gavel_core::aggregate::{summarize_judges, verdict_distribution};
use gavel_core::model::{Evaluation, Verdict};
use uuid::Uuid;

fn make_log(records: usize, judges: usize) -> Vec<Evaluation> {
    (0..records)
        .map(|i| {
            let verdict = match i % 3 {
                0 => Verdict::Pass,
                1 => Verdict::Fail,
                _ => Verdict::Inconclusive,
            };
            let judge = i % judges;
            Evaluation {
                id: Uuid::nil(),
                submission_id: format!("s{}", i / judges),
                judge_id: format!("j{judge}"),
                judge_name: format!("Judge {judge}"),
                verdict,
                rationale: None,
                created_at: Utc.timestamp_opt(i as i64, 0).unwrap(),
            }
        })
        .collect()
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize_judges");

    for (records, judges) in [(100, 5), (10_000, 5), (10_000, 100)] {
        let log = make_log(records, judges);
        group.bench_function(format!("records={records},judges={judges}"), |b| {
            b.iter(|| summarize_judges(black_box(&log)))
        });
    }

    group.finish();
}

fn bench_distribution(c: &mut Criterion) {
    let mut group = c.benchmark_group("verdict_distribution");

    for records in [100, 10_000] {
        let log = make_log(records, 5);
        group.bench_function(format!("records={records}"), |b| {
            b.iter(|| verdict_distribution(black_box(&log)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_summarize, bench_distribution);
criterion_main!(benches);
