//! CSV Benchmarks
//!
//! Benchmarks for argument translation, reading and writing CSV through the
//! local engine.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use distframe::io::csv::{read_csv, ReadCsvArgs, ToCsvArgs};
use distframe::{Column, Session, Table};
use serde_json::json;

/// Write a CSV file with `rows` rows of name/amount/ratio data
fn create_csv(dir: &tempfile::TempDir, rows: usize) -> String {
    let mut text = String::from("name,amount,ratio\n");
    for i in 0..rows {
        text.push_str(&format!("name_{},{},{}\n", i % 97, i as i64 - 500, i as f64 * 0.25));
    }
    let path = dir.path().join(format!("data_{}.csv", rows));
    std::fs::write(&path, text).expect("Failed to write benchmark CSV");
    path.to_string_lossy().to_string()
}

fn create_table(rows: usize) -> Table {
    Table::new(vec![
        Column::from_i64s("id", (0..rows as i64).collect()),
        Column::from_f64s("value", (0..rows).map(|i| i as f64 * 0.5).collect()),
    ])
    .expect("Failed to build benchmark table")
}

fn bench_argument_translation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Argument Translation");

    let kwargs = json!({
        "header": null,
        "names": ["n", "a", "r"],
        "usecols": [2, 0],
        "comment": "#",
        "nullValue": "NA"
    });
    group.bench_function("read_kwargs", |b| {
        b.iter(|| ReadCsvArgs::from_kwargs(black_box(&kwargs)))
    });

    let kwargs = json!({"sep": "|", "header": ["x", "y"], "num_files": 4, "mode": "append"});
    group.bench_function("write_kwargs", |b| {
        b.iter(|| ToCsvArgs::from_kwargs(black_box(&kwargs)))
    });

    group.finish();
}

fn bench_read_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("Read CSV");
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let session = Session::local();

    for rows in [1_000, 10_000, 100_000] {
        let path = create_csv(&dir, rows);
        group.bench_with_input(BenchmarkId::new("count", rows), &path, |b, path| {
            b.iter(|| {
                read_csv(&session, path, &ReadCsvArgs::new())
                    .and_then(|df| df.count())
                    .expect("read failed")
            })
        });
        group.bench_with_input(BenchmarkId::new("usecols", rows), &path, |b, path| {
            let args = ReadCsvArgs::new().usecols_names(&["amount"]);
            b.iter(|| {
                read_csv(&session, path, &args)
                    .and_then(|df| df.to_table())
                    .expect("read failed")
            })
        });
    }

    group.finish();
}

fn bench_write_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("Write CSV");
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let session = Session::local();

    for rows in [1_000, 100_000] {
        let df = session.from_table(create_table(rows));
        group.bench_with_input(BenchmarkId::new("text", rows), &df, |b, df| {
            b.iter(|| df.to_csv(None, &ToCsvArgs::new()).expect("write failed"))
        });

        for num_files in [1, 4] {
            let out = dir
                .path()
                .join(format!("out_{}_{}", rows, num_files))
                .to_string_lossy()
                .to_string();
            let args = ToCsvArgs::new().num_files(num_files);
            group.bench_with_input(
                BenchmarkId::new(format!("parts_{}", num_files), rows),
                &df,
                |b, df| b.iter(|| df.to_csv(Some(&out), &args).expect("write failed")),
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_argument_translation,
    bench_read_csv,
    bench_write_csv
);
criterion_main!(benches);
