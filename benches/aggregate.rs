/// Aggregation Benchmarks
///
/// Measures the pivot and metric computation over synthetic plant logs of
/// increasing size, plus CSV ingestion of the same data.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use downtime::ingest::{parse_csv, StatusEvent};
use downtime::pivot::{SignalResolver, WideTable};
use downtime::{DowntimeAggregator, DowntimeConfig, DowntimeReport};
use std::time::Duration;

const NAMES: [&str; 4] = [
    "Combustor_Pilot_Status",
    "Flare_Pilot_Status",
    "PLC_ESD_Tripped_Shutdown",
    "Process_SD_PR1_Status",
];

/// One reading per signal every 10 seconds, with a periodic outage pattern
fn synthetic_csv(rows: usize) -> String {
    let mut csv = String::from("Time,Name,Status\n");
    for i in 0..rows {
        let secs = i * 10;
        let time = format!(
            "2024-01-{:02} {:02}:{:02}:{:02}",
            1 + secs / 86_400,
            (secs / 3600) % 24,
            (secs / 60) % 60,
            secs % 60
        );
        for (n, name) in NAMES.iter().enumerate() {
            let status = if (i + n) % 17 == 0 { 0 } else { 1 };
            csv.push_str(&format!("{},{},{}\n", time, name, status));
        }
    }
    csv
}

fn synthetic_events(rows: usize) -> Vec<StatusEvent> {
    parse_csv(&synthetic_csv(rows)).expect("synthetic CSV is valid")
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    group.measurement_time(Duration::from_secs(5));

    let aggregator = DowntimeAggregator::new(&DowntimeConfig::default()).unwrap();
    for rows in [100, 1_000, 10_000] {
        let events = synthetic_events(rows);
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &events, |b, events| {
            b.iter(|| aggregator.aggregate(black_box(events)).unwrap());
        });
    }

    group.finish();
}

fn bench_metrics_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");
    group.measurement_time(Duration::from_secs(5));

    let events = synthetic_events(10_000);
    let table = WideTable::reshape(&events, &SignalResolver::Positional).unwrap();
    group.throughput(Throughput::Elements(table.len() as u64));
    group.bench_function("compute_10000_rows", |b| {
        b.iter(|| DowntimeReport::compute(black_box(&table)));
    });

    group.finish();
}

fn bench_parse_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    group.measurement_time(Duration::from_secs(5));

    let csv = synthetic_csv(10_000);
    group.throughput(Throughput::Bytes(csv.len() as u64));
    group.bench_function("parse_csv_40000_events", |b| {
        b.iter(|| parse_csv(black_box(&csv)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_metrics_only, bench_parse_csv);
criterion_main!(benches);
