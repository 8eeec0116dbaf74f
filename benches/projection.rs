//! Benchmarks for window projection and scroll processing.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::rc::Rc;
use wingrid::{Axis, CellValue, DataMatrix, EventName, Range, ScrollEvent, Table, TableConfig};

fn matrix(rows: usize, cols: usize) -> Rc<DataMatrix> {
    Rc::new(DataMatrix::from_fn(rows, cols, |r, c| {
        CellValue::from(format!("{r}:{c}"))
    }))
}

/// Ranges that enclose every cell of the window several times over.
fn overlapping_ranges(count: usize) -> Vec<Range> {
    (0..count)
        .map(|i| {
            Range::new(0, 10_000, 0, 200)
                .with_class(format!("r{i}"))
                .with_style_fn(|raw, _, _| {
                    if raw.and_then(CellValue::as_str).is_some() {
                        "color:blue".to_string()
                    } else {
                        String::new()
                    }
                })
                .on(EventName::Click, |_, _| {})
        })
        .collect()
}

/// Programmatic scroll: clamp, scrollbar sync and a full projection.
fn bench_set_scroll_top(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_scroll_top");
    for ranges in [0, 4, 16] {
        let mut builder = Table::builder(TableConfig::default(), matrix(10_000, 200));
        for range in overlapping_ranges(ranges) {
            builder = builder.range(range);
        }
        let mut table = builder.build();
        group.throughput(Throughput::Elements(
            u64::try_from(table.projection().cell_count()).unwrap_or(u64::MAX),
        ));
        let mut top = 0;
        group.bench_with_input(BenchmarkId::from_parameter(ranges), &ranges, |b, _| {
            b.iter(|| {
                top = (top + 37) % 9_000;
                table.set_scroll_top(black_box(top))
            })
        });
    }
    group.finish();
}

/// A larger window (50 × 40 center region) panned across a wide matrix.
fn bench_large_window(c: &mut Criterion) {
    let config = TableConfig {
        row_number: Some(50),
        center_column_number: Some(40),
        ..TableConfig::default()
    };
    let mut table = Table::new(config, matrix(200, 1_000));
    let mut left = 0;
    c.bench_function("large_window_set_scroll_left", |b| {
        b.iter(|| {
            left = (left + 13) % 900;
            table.set_scroll_left(black_box(left))
        })
    });
}

/// Raw scrollbar events queued in a burst; only the debouncing bookkeeping.
fn bench_scroll_event_burst(c: &mut Criterion) {
    let mut table = Table::new(TableConfig::default(), matrix(10_000, 200));
    c.bench_function("scroll_event_burst", |b| {
        b.iter(|| {
            for px in 0..100 {
                table.scroll_event(ScrollEvent::new(
                    Some(Axis::Vertical),
                    black_box(f64::from(px) * 10.0),
                    100_000.0,
                ));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_set_scroll_top,
    bench_large_window,
    bench_scroll_event_burst
);
criterion_main!(benches);
