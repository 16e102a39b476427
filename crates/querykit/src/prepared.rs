//! Rendered queries.

use std::fmt;
use std::ops::Range;

use crate::dialect::Dialect;
use crate::value::Value;

/// The result of [`QueryBuilder::build`](crate::QueryBuilder::build):
/// SQL text with dialect placeholders plus the bound values in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuery {
    sql: String,
    params: Vec<Value>,
    /// Byte span of each placeholder in `sql`, in parameter order.
    placeholders: Vec<Range<usize>>,
    dialect: Dialect,
}

impl PreparedQuery {
    pub(crate) fn with_capacity(dialect: Dialect, sql_len: usize, params: usize) -> Self {
        Self {
            sql: String::with_capacity(sql_len),
            params: Vec::with_capacity(params),
            placeholders: Vec::with_capacity(params),
            dialect,
        }
    }

    pub(crate) fn push_raw(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    pub(crate) fn push_param(&mut self, value: Value) {
        let start = self.sql.len();
        self.params.push(value);
        self.dialect.write_placeholder(self.params.len(), &mut self.sql);
        self.placeholders.push(start..self.sql.len());
    }

    /// SQL text with placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound values; the i-th value belongs to the i-th placeholder.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    /// Render the SQL with every placeholder replaced by its value literal.
    ///
    /// Substitution is by position, so equal values and `?` dialects are
    /// handled the same way. String escaping here is best-effort; the output
    /// is for logs and debugging, not for executing untrusted input.
    pub fn inline(&self) -> String {
        let mut out = String::with_capacity(self.sql.len() + self.params.len() * 8);
        let mut last = 0;
        for (span, value) in self.placeholders.iter().zip(&self.params) {
            out.push_str(&self.sql[last..span.start]);
            out.push_str(&value.to_sql_literal(self.dialect));
            last = span.end;
        }
        out.push_str(&self.sql[last..]);
        out
    }

    /// Parameter refs compatible with `tokio-postgres`.
    #[cfg(feature = "postgres")]
    pub fn params_ref(&self) -> Vec<&(dyn tokio_postgres::types::ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p as &(dyn tokio_postgres::types::ToSql + Sync))
            .collect()
    }
}

impl fmt::Display for PreparedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(dialect: Dialect, pieces: &[&str], values: &[Value]) -> PreparedQuery {
        let mut q = PreparedQuery::with_capacity(dialect, 0, 0);
        for (i, piece) in pieces.iter().enumerate() {
            q.push_raw(piece);
            if let Some(v) = values.get(i) {
                q.push_param(v.clone());
            }
        }
        q
    }

    #[test]
    fn inline_is_positional() {
        let q = query(
            Dialect::Postgres,
            &["a = ", " AND b = ", ""],
            &[Value::from(1), Value::from(1)],
        );
        assert_eq!(q.sql(), "a = $1 AND b = $2");
        assert_eq!(q.inline(), "a = 1 AND b = 1");
    }

    #[test]
    fn inline_handles_unnumbered_placeholders() {
        let q = query(
            Dialect::MySql,
            &["name = ", " AND note = '?'"],
            &[Value::from("x")],
        );
        assert_eq!(q.sql(), "name = ? AND note = '?'");
        assert_eq!(q.inline(), "name = 'x' AND note = '?'");
    }

    #[test]
    fn inline_without_params_is_identity() {
        let q = query(Dialect::Oracle, &["SELECT * FROM dual"], &[]);
        assert_eq!(q.inline(), q.sql());
    }

    #[test]
    fn ten_plus_placeholders() {
        let pieces: Vec<&str> = std::iter::repeat_n(",", 12).collect();
        let values: Vec<Value> = (1..=12i64).map(Value::Int).collect();
        let q = query(Dialect::SqlServer, &pieces, &values);
        assert!(q.sql().ends_with(",@11,@12"));
        assert!(q.inline().ends_with(",11,12"));
    }

    #[test]
    fn into_parts() {
        let q = query(Dialect::Sqlite, &["id = "], &[Value::from(5)]);
        let (sql, params) = q.into_parts();
        assert_eq!(sql, "id = ?");
        assert_eq!(params, vec![Value::Int(5)]);
    }
}
