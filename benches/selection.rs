//! Selection and results aggregation benchmarks
//!
//! - Comparator over live candidate sets
//! - Row retention and resolution over persisted results
//! - Results table Parquet roundtrip

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use anneal_tuner::results::{
    retain_best_rows, Parameter, ParameterType, ResultRow, ResultsPaths, ResultsReader,
    ResultsStore, ResultsTable,
};
use anneal_tuner::schedule::Schedule;
use anneal_tuner::selection::SelectionPolicy;
use anneal_tuner::solver::{QpuTiming, TrialResult};
use anneal_tuner::tuning::{select_best, CandidateSet};

/// Deterministic trial outcome for candidate `i`: a few correct solutions,
/// many energy ties and varying access times.
#[allow(clippy::cast_precision_loss)]
fn trial(i: usize) -> TrialResult {
    let energy = -((i * 7919) % 97) as f64;
    let correct = u64::from(i % 13 == 0);
    TrialResult::new(vec![energy, energy + 1.0], correct).with_timing(QpuTiming {
        access_time: Some(((i * 31) % 50) as f64 + 100.0),
        ..QpuTiming::default()
    })
}

#[allow(clippy::cast_precision_loss)]
fn result_rows(n: usize) -> Vec<ResultRow> {
    let schedule = Schedule::from_pairs(&[[0.0, 0.0], [20.0, 0.4], [45.0, 0.4], [75.0, 1.0]])
        .unwrap();
    (0..n)
        .map(|i| {
            let t = trial(i);
            let (parameter, parameter_type) = if i % 2 == 0 {
                (Parameter::Chain(1.0 + (i % 8) as f64 * 0.25), ParameterType::Chain)
            } else {
                (Parameter::Schedule(schedule.clone()), ParameterType::Pause)
            };
            ResultRow {
                parameter,
                parameter_type,
                energy: t.energy(),
                correct_solution_count: t.correct_solution_count(),
                qpu_access_time: t.qpu_access_time(),
                qpu_programming_time: Some(15.0),
            }
        })
        .collect()
}

fn bench_select_best(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_best");

    for size in [27, 1_000, 100_000].iter() {
        let set: CandidateSet<usize> = (0..*size).map(|i| (i, trial(i))).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(select_best(&set)));
        });
    }

    group.finish();
}

fn bench_retain_and_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("retain_and_resolve");
    let policy = SelectionPolicy::default();

    for size in [1_000, 100_000].iter() {
        let rows = result_rows(*size);

        group.bench_with_input(BenchmarkId::new("retain", size), size, |b, _| {
            b.iter(|| black_box(retain_best_rows(&rows)));
        });
        group.bench_with_input(BenchmarkId::new("policy", size), size, |b, _| {
            b.iter(|| black_box(policy.select(&rows)));
        });
    }

    group.finish();
}

fn bench_results_table_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("results_table_roundtrip");
    let root = std::env::temp_dir().join(format!("anneal_tuner_bench_{}", std::process::id()));
    let store = ResultsStore::new(ResultsPaths::new(&root));
    let reader = ResultsReader::new(store.clone());

    for size in [100, 10_000].iter() {
        let table = ResultsTable::new(result_rows(*size));

        group.bench_with_input(BenchmarkId::new("save_load", size), size, |b, _| {
            b.iter(|| {
                store.save(8, &table).unwrap();
                black_box(store.load(8).unwrap());
            });
        });
        group.bench_with_input(BenchmarkId::new("resolve", size), size, |b, _| {
            b.iter(|| black_box(reader.resolve(&table).unwrap()));
        });
    }

    std::fs::remove_dir_all(&root).ok();
    group.finish();
}

criterion_group!(
    benches,
    bench_select_best,
    bench_retain_and_resolve,
    bench_results_table_roundtrip
);
criterion_main!(benches);
