//! Table core benchmarks
//!
//! These benchmarks measure column access through both physical layouts,
//! in-place column replacement, and flat/grouped casts, which are the hot
//! operations for consumers of the table core.

use std::sync::Arc;

use blocktable::{Array, LayoutKind, RowIndex, Table};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn build_table(columns: usize, rows: usize) -> Table {
    let arrays: Vec<Arc<Array>> = (0..columns)
        .map(|c| {
            if c % 2 == 0 {
                Arc::new(Array::int64((0..rows as i64).collect::<Vec<_>>()))
            } else {
                Arc::new(Array::float64(vec![0.5; rows]))
            }
        })
        .collect();
    let names: Vec<String> = (0..columns).map(|c| format!("c{}", c)).collect();
    Table::init(
        arrays,
        RowIndex::range(0, rows as i64, 1).unwrap(),
        names,
    )
    .unwrap()
}

fn bench_column_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("column_access");

    for &columns in &[8usize, 64, 512] {
        let flat = build_table(columns, 128);
        let grouped = flat
            .cast(&flat.schema().unwrap(), LayoutKind::Grouped)
            .unwrap();

        group.bench_with_input(BenchmarkId::new("flat", columns), &flat, |b, table| {
            b.iter(|| black_box(table.column(black_box(columns / 2)).unwrap()));
        });
        group.bench_with_input(
            BenchmarkId::new("grouped", columns),
            &grouped,
            |b, table| {
                b.iter(|| black_box(table.column(black_box(columns / 2)).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_set_column(c: &mut Criterion) {
    let table = build_table(64, 128);
    let replacement = Arc::new(Array::int64((0..128).collect::<Vec<_>>()));

    c.bench_function("set_column_in_place", |b| {
        b.iter(|| table.set_column(black_box(0), replacement.clone()).unwrap());
    });
}

fn bench_cast(c: &mut Criterion) {
    let mut group = c.benchmark_group("cast");

    for &columns in &[8usize, 64] {
        let flat = build_table(columns, 128);
        let schema = flat.schema().unwrap();
        let grouped = flat.cast(&schema, LayoutKind::Grouped).unwrap();

        group.bench_with_input(
            BenchmarkId::new("flat_to_grouped", columns),
            &flat,
            |b, table| {
                b.iter(|| black_box(table.cast(&schema, LayoutKind::Grouped).unwrap()));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("grouped_to_flat", columns),
            &grouped,
            |b, table| {
                b.iter(|| black_box(table.cast(&schema, LayoutKind::Flat).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_column_access, bench_set_column, bench_cast);
criterion_main!(benches);
