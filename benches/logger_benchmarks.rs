//! Criterion benchmarks for request_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use request_logger::core::template::sprintf;
use request_logger::prelude::*;
use request_logger::split_args;
use std::io;

fn null_logger(level: LogLevel) -> Logger {
    let sink = StructuredSink::builder()
        .level(std::sync::Arc::new(AtomicLevel::new(level)))
        .fixed_field("app_name", "bench")
        .appender(JsonAppender::new(io::sink()))
        .build();
    Logger::from_sink(LogConfig::default(), sink)
}

// ============================================================================
// Message Formatting Benchmarks
// ============================================================================

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));

    let values = [
        FieldValue::from("alice"),
        FieldValue::from(42),
        FieldValue::from(3.5),
    ];
    group.bench_function("sprintf", |b| {
        b.iter(|| sprintf(black_box("user %s id %d score %.2f"), black_box(&values)));
    });

    let args = [
        Arg::from("alice"),
        Arg::from(Field::new("tenant", "acme")),
        Arg::from(42),
        Arg::from(Field::new("admin", true)),
    ];
    group.bench_function("split_args", |b| {
        b.iter(|| split_args(black_box("user %s id %d"), black_box(&args)));
    });

    group.finish();
}

// ============================================================================
// Encoding Benchmarks
// ============================================================================

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");
    group.throughput(Throughput::Elements(1));

    let entry = LogEntry::new(LogLevel::Info, "order created").with_fields(vec![
        Field::new("app_name", "bench"),
        Field::new("path", "/v1/orders"),
        Field::new("x-b3-traceid", "463ac35c9f6413ad"),
        Field::new("title", "orders"),
    ]);
    let timestamp = TimestampFormat::default();

    group.bench_function("json", |b| {
        b.iter(|| OutputFormat::Json.format(black_box(&entry), &timestamp));
    });

    group.bench_function("console", |b| {
        b.iter(|| OutputFormat::Console.format(black_box(&entry), &timestamp));
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(LogLevel::Info);
    let request = http::Request::builder()
        .uri("/v1/orders")
        .header("x-b3-traceid", "463ac35c9f6413ad")
        .body(())
        .unwrap();

    group.bench_function("info", |b| {
        b.iter(|| logger.info(black_box("order %s created"), &[Arg::from("A-17")]));
    });

    group.bench_function("info_f_request", |b| {
        b.iter(|| {
            logger.info_f(
                &request,
                "orders",
                black_box("order %s created"),
                &[Arg::from("A-17"), Arg::from(Field::new("items", 3))],
            )
        });
    });

    let filtered = null_logger(LogLevel::Error);
    group.bench_function("filtered_info", |b| {
        b.iter(|| filtered.info(black_box("dropped %d"), &[Arg::from(1)]));
    });

    group.finish();
}

criterion_group!(benches, bench_formatting, bench_encoding, bench_logging);

criterion_main!(benches);
