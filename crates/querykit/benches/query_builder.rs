use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use querykit::{Dialect, QueryBuilder};

/// SELECT col0, col1, ... FROM t WHERE col0 = $1 AND col1 = $2 ...
fn build_select(dialect: Dialect, n: usize) -> QueryBuilder {
    let columns: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
    let mut qb = QueryBuilder::new(dialect).table("t").select(&columns);
    for (i, col) in columns.iter().enumerate() {
        qb = qb.and_where(col, "=", i as i64);
    }
    qb
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/build");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(Dialect::Postgres, n).build()));
        });
    }

    group.finish();
}

fn bench_render_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/render_only");

    for n in [1, 10, 100] {
        let qb = build_select(Dialect::SqlServer, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &qb, |b, qb| {
            b.iter(|| black_box(qb.clone().build()));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let q = QueryBuilder::new(Dialect::Postgres)
                    .table("t")
                    .and_in("id", values.iter().copied())
                    .build();
                black_box(q);
            });
        });
    }

    group.finish();
}

fn bench_union_splice(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/union_splice");

    for n in [2, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut qb = build_select(Dialect::Oracle, 3);
                for _ in 1..n {
                    qb = qb.union_all(build_select(Dialect::Oracle, 3));
                }
                black_box(qb.build());
            });
        });
    }

    group.finish();
}

fn bench_inline(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/inline");

    for n in [1, 10, 100] {
        let q = build_select(Dialect::MySql, n).build();
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(q.inline()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_render_only,
    bench_in_list,
    bench_union_splice,
    bench_inline
);
criterion_main!(benches);
