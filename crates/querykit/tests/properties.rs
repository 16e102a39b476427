//! Invariants checked across every dialect and a range of parameter counts.

use querykit::{Dialect, QueryBuilder, Value};

const ALL: [Dialect; 5] = [
    Dialect::Postgres,
    Dialect::MySql,
    Dialect::Sqlite,
    Dialect::SqlServer,
    Dialect::Oracle,
];

/// Binds `n` values through a mix of clause kinds, in a known order.
fn mixed_binds(dialect: Dialect, n: usize) -> QueryBuilder {
    let mut qb = QueryBuilder::new(dialect).table("t");
    for i in 0..n {
        let v = i as i64;
        qb = match i % 4 {
            0 => qb.and_where(&format!("c{i}"), "=", v),
            1 => qb.or_in(&format!("c{i}"), [v]),
            2 => qb.raw_bind(&format!("AND c{i} > ?"), [v]),
            _ => {
                let sub = QueryBuilder::new(dialect)
                    .table("s")
                    .select(["id"])
                    .and_where("k", "=", v);
                qb.and_where(&format!("c{i}"), "IN", sub)
            }
        };
    }
    qb
}

fn placeholder_indices(dialect: Dialect, sql: &str) -> Vec<usize> {
    let prefix = dialect.placeholder_prefix();
    let mut out = Vec::new();
    let mut chars = sql.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if c != prefix {
            continue;
        }
        let mut digits = String::new();
        while let Some(&(_, d)) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            digits.push(d);
            chars.next();
        }
        out.push(digits.parse().unwrap_or(0));
    }
    out
}

#[test]
fn params_match_placeholders_in_bind_order() {
    for dialect in ALL {
        for n in 0..=14 {
            let q = mixed_binds(dialect, n).build();
            let expected: Vec<Value> = (0..n as i64).map(Value::Int).collect();
            assert_eq!(q.params(), expected.as_slice(), "{dialect} n={n}");

            let indices = placeholder_indices(dialect, q.sql());
            assert_eq!(indices.len(), n, "{dialect} n={n}: {}", q.sql());
            if dialect.is_numbered() {
                let want: Vec<usize> = (1..=n).collect();
                assert_eq!(indices, want, "{dialect} n={n}: {}", q.sql());
            }
        }
    }
}

#[test]
fn inline_without_params_equals_sql() {
    for dialect in ALL {
        let q = QueryBuilder::new(dialect)
            .table("users")
            .select(["id", "name"])
            .left_join("roles", "roles.user_id", "=", "users.id")
            .and_is_null("deleted_at")
            .group_by(["id", "name"])
            .order_by(["name"])
            .limit(0, 10)
            .build();
        assert!(q.params().is_empty());
        assert_eq!(q.inline(), q.sql(), "{dialect}");
    }
}

#[test]
fn reuse_after_take_matches_fresh_builder() {
    let build_into = |qb: QueryBuilder| {
        qb.table("users")
            .select(["id"])
            .and_where("age", ">", 18)
            .and_in("role", ["a", "b"])
            .order_by(["id"])
    };

    for dialect in ALL {
        let mut reused = QueryBuilder::new(dialect)
            .table("orders")
            .top(1)
            .raw("drop table x")
            .and_where("total", ">", 100)
            .lock("FOR UPDATE");
        let _first = reused.take().build();
        assert!(reused.last_error().is_none());

        let second = build_into(reused).build();
        let fresh = build_into(QueryBuilder::new(dialect)).build();
        assert_eq!(second, fresh, "{dialect}");
    }
}

#[test]
fn reset_discards_everything() {
    for dialect in ALL {
        let mut qb = mixed_binds(dialect, 6).union(mixed_binds(dialect, 3));
        qb.reset();
        assert_eq!(qb.build(), QueryBuilder::new(dialect).build());
    }
}

#[test]
fn union_branches_are_renumbered() {
    for dialect in [Dialect::Postgres, Dialect::SqlServer, Dialect::Oracle] {
        let p = dialect.placeholder_prefix();
        let a = QueryBuilder::new(dialect)
            .table("a")
            .select(["id"])
            .and_where("x", "=", "one");
        let b = QueryBuilder::new(dialect)
            .table("b")
            .select(["id"])
            .and_where("y", "=", "two");
        let q = a.union(b).build();
        assert_eq!(
            q.sql(),
            format!("SELECT id FROM a WHERE x = {p}1 UNION SELECT id FROM b WHERE y = {p}2")
        );
        assert_eq!(q.params(), &[Value::from("one"), Value::from("two")]);
    }
}

#[test]
fn build_is_repeatable_through_clone() {
    for dialect in ALL {
        let qb = mixed_binds(dialect, 9);
        assert_eq!(qb.clone().build(), qb.clone().build());
        assert_eq!(qb.clone().render_inline(), qb.build().inline());
    }
}
