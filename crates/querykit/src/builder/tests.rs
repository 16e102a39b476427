use super::*;
use crate::value::Value;

fn pg() -> QueryBuilder {
    QueryBuilder::new(Dialect::Postgres)
}

#[test]
fn empty_builder_renders_nothing() {
    let q = pg().build();
    assert_eq!(q.sql(), "");
    assert!(q.params().is_empty());
}

#[test]
fn implicit_select_when_only_table_is_set() {
    assert_eq!(pg().table("users").build().sql(), "SELECT * FROM users");
    assert_eq!(
        pg().table("users").and_where("id", "=", 1).build().sql(),
        "SELECT * FROM users WHERE id = $1"
    );
}

#[test]
fn where_without_table_renders_bare_clause() {
    let q = pg().and_where("firstname", "=", "Mesut").build();
    assert_eq!(q.sql(), "WHERE firstname = $1");
    assert_eq!(q.params(), &[Value::from("Mesut")]);
}

#[test]
fn clause_order_is_fixed_regardless_of_call_order() {
    let q = pg()
        .limit(10, 5)
        .order_by(["name"])
        .having("COUNT(*) > 1")
        .group_by(["name"])
        .and_where("active", "=", true)
        .left_join("roles", "roles.user_id", "=", "users.id")
        .table("users")
        .select(["name"])
        .lock("FOR UPDATE")
        .build();
    assert_eq!(
        q.sql(),
        "SELECT name FROM users LEFT JOIN roles ON roles.user_id = users.id \
         WHERE active = $1 GROUP BY name HAVING COUNT(*) > 1 ORDER BY name ASC \
         OFFSET 10 LIMIT 5 FOR UPDATE"
    );
}

#[test]
fn single_slot_clauses_overwrite() {
    let q = pg()
        .table("users")
        .group_by(["a"])
        .group_by(["b"])
        .order_by(["a"])
        .order_by_desc(["c"])
        .limit(0, 1)
        .limit(5, 10)
        .build();
    assert_eq!(
        q.sql(),
        "SELECT * FROM users GROUP BY b ORDER BY c DESC OFFSET 5 LIMIT 10"
    );
}

#[test]
fn select_requires_table() {
    let qb = pg().select(["id"]);
    assert_eq!(qb.last_error(), Some(&BuildError::MissingTable));
    assert_eq!(qb.build().sql(), "");
}

#[test]
fn first_error_wins() {
    let qb = QueryBuilder::new(Dialect::MySql)
        .top(5)
        .select(["id"])
        .raw("drop table users");
    assert_eq!(
        qb.last_error(),
        Some(&BuildError::UnsupportedDialectFeature {
            feature: "TOP",
            dialect: "mysql",
        })
    );
}

#[test]
fn errors_do_not_stop_the_chain() {
    let qb = pg().select(["id"]).table("users").select(["id"]);
    assert_eq!(qb.last_error(), Some(&BuildError::MissingTable));
    assert_eq!(qb.clone().build().sql(), "SELECT id FROM users");
    assert_eq!(qb.try_build(), Err(BuildError::MissingTable));
}

#[test]
fn sub_query_errors_are_carried_into_the_parent() {
    let sub = pg().select(["customer_id"]);
    let qb = pg().table("users").and_where("id", "IN", sub);
    assert_eq!(qb.last_error(), Some(&BuildError::MissingTable));
}

#[test]
fn reset_restores_empty_state() {
    let config = BuilderConfig::new().trace_sql(true);
    let mut qb = QueryBuilder::with_config(Dialect::Oracle, config.clone())
        .table("users")
        .and_where("id", "=", 1)
        .top(1);
    assert!(qb.last_error().is_some());

    qb.reset();
    assert!(qb.last_error().is_none());
    assert_eq!(qb.dialect(), Dialect::Oracle);
    assert_eq!(qb.config(), &config);
    assert_eq!(qb.build().sql(), "");
}

#[test]
fn take_leaves_a_fresh_builder() {
    let mut qb = pg().table("users").and_where("id", "=", 1);
    let taken = qb.take().build();
    assert_eq!(taken.sql(), "SELECT * FROM users WHERE id = $1");

    qb = qb.table("orders").and_where("total", ">", 10);
    let q = qb.build();
    assert_eq!(q.sql(), "SELECT * FROM orders WHERE total > $1");
    assert_eq!(q.params(), &[Value::from(10)]);
}

#[test]
fn unknown_operator_is_recorded() {
    let qb = pg().table("users").and_where("id", "= 1 OR 1 =", 1);
    assert!(matches!(
        qb.last_error(),
        Some(BuildError::InvalidIdentifier(_))
    ));
    assert_eq!(qb.build().sql(), "SELECT * FROM users WHERE id = $1");
}

#[test]
fn sanitizing_can_be_disabled() {
    let config = BuilderConfig::new().sanitize_identifiers(false);
    let q = QueryBuilder::with_config(Dialect::Postgres, config)
        .table("\"Order Items\"")
        .select(["\"Qty\" * 2"])
        .and_where("tags", "?|", Value::Null)
        .build();
    assert_eq!(
        q.sql(),
        "SELECT \"Qty\" * 2 FROM \"Order Items\" WHERE tags ?| $1"
    );
}

#[test]
fn when_and_when_then() {
    let admin = true;
    let q = pg()
        .table("users")
        .when(admin, |q| q.and_where("role", "=", "admin"))
        .when(false, |q| q.and_where("never", "=", 1))
        .when_then(
            !admin,
            |q| q.order_by(["id"]),
            |q| q.order_by_desc(["id"]),
        )
        .build();
    assert_eq!(
        q.sql(),
        "SELECT * FROM users WHERE role = $1 ORDER BY id DESC"
    );
    assert_eq!(q.param_count(), 1);
}

#[test]
fn raw_condition_joiners() {
    let q = pg()
        .table("users")
        .raw_bind("WHERE status = ?", ["active"])
        .raw("OR deleted_at IS NULL")
        .build();
    assert_eq!(
        q.sql(),
        "SELECT * FROM users WHERE status = $1 OR deleted_at IS NULL"
    );
}

#[test]
fn raw_statement_replaces_statement() {
    let q = pg()
        .table("ignored")
        .raw_bind("SELECT * FROM users WHERE id = ?", [1])
        .build();
    assert_eq!(q.sql(), "SELECT * FROM users WHERE id = $1");
}

#[test]
fn rejected_raw_is_not_spliced() {
    let qb = pg().table("users").raw("id = 1; DROP TABLE users");
    assert!(matches!(
        qb.last_error(),
        Some(BuildError::RawSqlRejected(_))
    ));
    assert_eq!(qb.build().sql(), "SELECT * FROM users");
}

#[test]
fn rejected_lock_is_not_rendered() {
    let qb = pg().table("users").lock("FOR UPDATE; DROP TABLE users");
    assert!(qb.last_error().is_some());
    assert_eq!(qb.build().sql(), "SELECT * FROM users");
}
