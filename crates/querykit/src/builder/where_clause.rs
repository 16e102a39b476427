use super::{QueryBuilder, Statement};
use crate::dialect::Dialect;
use crate::error::BuildError;
use crate::fragment::Fragment;
use crate::log;
use crate::sanitize::{check_raw, starts_with_word, strip_sql_prefix};
use crate::value::{Arg, Value};

/// Leading keywords that make `raw` SQL a statement rather than a condition.
const STATEMENT_KEYWORDS: &[&str] = &[
    "SELECT", "WITH", "INSERT", "UPDATE", "DELETE", "REPLACE", "MERGE", "VALUES", "PRAGMA",
    "EXPLAIN", "SHOW",
];

const OPERATOR_WORDS: &[&str] = &[
    "LIKE", "ILIKE", "NOT", "IN", "IS", "SIMILAR", "TO", "REGEXP", "RLIKE", "GLOB", "ANY", "ALL",
    "SOME", "DISTINCT", "FROM",
];

fn is_valid_operator(op: &str) -> bool {
    !op.is_empty()
        && op.split_whitespace().all(|token| {
            token.chars().all(|c| "=<>!~@&|^#?*".contains(c))
                || OPERATOR_WORDS
                    .iter()
                    .any(|w| token.eq_ignore_ascii_case(w))
        })
}

/// Split a leading `WHERE`/`AND`/`OR` off a condition.
fn split_condition(sql: &str) -> (&'static str, &str) {
    for (keyword, joiner) in [("WHERE", "AND"), ("AND", "AND"), ("OR", "OR")] {
        if starts_with_word(sql, keyword) {
            return (joiner, sql[keyword.len()..].trim_start());
        }
    }
    ("AND", sql)
}

impl QueryBuilder {
    /// `<column> <op> <arg>`, joined with `AND`.
    ///
    /// `arg` is either a bound value or a nested [`QueryBuilder`], which is
    /// rendered as `(<sub-query>)` with its values folded in.
    pub fn and_where(self, column: &str, op: &str, arg: impl Into<Arg>) -> Self {
        self.where_inner("AND", column, op, arg.into())
    }

    /// `<column> <op> <arg>`, joined with `OR`.
    pub fn or_where(self, column: &str, op: &str, arg: impl Into<Arg>) -> Self {
        self.where_inner("OR", column, op, arg.into())
    }

    fn where_inner(mut self, joiner: &str, column: &str, op: &str, arg: Arg) -> Self {
        let column = self.ident(column);
        let op = self.operator(op);
        let mut cond = Fragment::new(format!("{column} {op} "));
        match arg {
            Arg::Value(v) => {
                cond.push_bind(v);
            }
            Arg::SubQuery(sub) => {
                let body = self.splice(*sub);
                cond.push("(").append(body);
                cond.push(")");
            }
        }
        self.add_where(joiner, cond);
        self
    }

    /// `<column> IN (<values>)`; an empty list renders `1=0`.
    pub fn and_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.in_inner("AND", column, values.into_iter().map(Into::into).collect())
    }

    pub fn or_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.in_inner("OR", column, values.into_iter().map(Into::into).collect())
    }

    fn in_inner(mut self, joiner: &str, column: &str, values: Vec<Value>) -> Self {
        if values.is_empty() {
            self.add_where(joiner, Fragment::new("1=0"));
            return self;
        }
        let column = self.ident(column);
        let mut cond = Fragment::new(format!("{column} IN ("));
        cond.push_bind_list(values).push(")");
        self.add_where(joiner, cond);
        self
    }

    /// `<column> IN (<sub-query>)`
    pub fn and_in_subquery(mut self, column: &str, sub: QueryBuilder) -> Self {
        let column = self.ident(column);
        let body = self.splice(sub);
        let mut cond = Fragment::new(format!("{column} IN ("));
        cond.append(body).push(")");
        self.add_where("AND", cond);
        self
    }

    /// `<column> BETWEEN <low> AND <high>`
    pub fn and_between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.between_inner("AND", column, low.into(), high.into())
    }

    pub fn or_between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.between_inner("OR", column, low.into(), high.into())
    }

    fn between_inner(mut self, joiner: &str, column: &str, low: Value, high: Value) -> Self {
        let column = self.ident(column);
        let mut cond = Fragment::new(format!("{column} BETWEEN "));
        cond.push_bind(low).push(" AND ").push_bind(high);
        self.add_where(joiner, cond);
        self
    }

    pub fn and_is_null(self, column: &str) -> Self {
        self.null_check("AND", column, "IS NULL")
    }

    pub fn or_is_null(self, column: &str) -> Self {
        self.null_check("OR", column, "IS NULL")
    }

    pub fn and_is_not_null(self, column: &str) -> Self {
        self.null_check("AND", column, "IS NOT NULL")
    }

    pub fn or_is_not_null(self, column: &str) -> Self {
        self.null_check("OR", column, "IS NOT NULL")
    }

    fn null_check(mut self, joiner: &str, column: &str, check: &str) -> Self {
        let column = self.ident(column);
        self.add_where(joiner, Fragment::new(format!("{column} {check}")));
        self
    }

    /// `EXISTS (<sub-query>)`
    pub fn and_exists(self, sub: QueryBuilder) -> Self {
        self.exists_inner("EXISTS (", sub)
    }

    /// `NOT EXISTS (<sub-query>)`
    pub fn and_not_exists(self, sub: QueryBuilder) -> Self {
        self.exists_inner("NOT EXISTS (", sub)
    }

    fn exists_inner(mut self, head: &str, sub: QueryBuilder) -> Self {
        let body = self.splice(sub);
        let mut cond = Fragment::new(head);
        cond.append(body).push(")");
        self.add_where("AND", cond);
        self
    }

    /// JSON containment: `<column> @> $n` on Postgres, `JSON_CONTAINS(<column>, ?)`
    /// on MySQL. Other dialects record an error.
    pub fn and_json_contains(mut self, column: &str, doc: serde_json::Value) -> Self {
        let column = self.ident(column);
        let cond = match self.dialect {
            Dialect::Postgres => {
                let mut cond = Fragment::new(format!("{column} @> "));
                cond.push_bind(Value::Json(doc));
                cond
            }
            Dialect::MySql => {
                let mut cond = Fragment::new(format!("JSON_CONTAINS({column}, "));
                cond.push_bind(Value::Text(doc.to_string())).push(")");
                cond
            }
            _ => {
                self.record_error(BuildError::unsupported("JSON containment", self.dialect));
                return self;
            }
        };
        self.add_where("AND", cond);
        self
    }

    /// `HAVING <condition>`; repeated calls are joined with `AND`.
    pub fn having(self, condition: &str) -> Self {
        self.having_inner("AND", condition, Vec::new())
    }

    /// `HAVING <condition>` with `?` markers bound to `args` left to right.
    pub fn having_bind<I, V>(self, condition: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.having_inner("AND", condition, args.into_iter().map(Into::into).collect())
    }

    pub fn or_having(self, condition: &str) -> Self {
        self.having_inner("OR", condition, Vec::new())
    }

    pub fn or_having_bind<I, V>(self, condition: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.having_inner("OR", condition, args.into_iter().map(Into::into).collect())
    }

    fn having_inner(mut self, joiner: &str, condition: &str, args: Vec<Value>) -> Self {
        if let Err(reason) = check_raw(condition) {
            self.record_error(BuildError::raw_rejected(reason));
            return self;
        }
        let mut cond = Fragment::default();
        bind_template(&mut cond, condition.trim(), args);
        if cond.is_empty() {
            return self;
        }
        if self.having.is_empty() {
            self.having.push("HAVING ");
        } else {
            self.having.push(" ").push(joiner).push(" ");
        }
        self.having.append(cond);
        self
    }

    /// Raw SQL escape hatch.
    ///
    /// Text starting with a statement keyword (`SELECT`, `WITH`, `INSERT`, ...)
    /// replaces the statement. Anything else is a WHERE condition; a leading
    /// `WHERE`, `AND` or `OR` picks the joiner. Input with `;` or a denied
    /// keyword is rejected and recorded as [`BuildError::RawSqlRejected`].
    pub fn raw(self, sql: &str) -> Self {
        self.raw_inner(sql, Vec::new())
    }

    /// [`raw`](Self::raw) with `?` markers bound to `args` left to right.
    pub fn raw_bind<I, V>(self, sql: &str, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.raw_inner(sql, args.into_iter().map(Into::into).collect())
    }

    fn raw_inner(mut self, sql: &str, args: Vec<Value>) -> Self {
        if let Err(reason) = check_raw(sql) {
            self.record_error(BuildError::raw_rejected(reason));
            return self;
        }
        let sql = sql.trim();
        let head = strip_sql_prefix(sql);
        if STATEMENT_KEYWORDS.iter().any(|kw| starts_with_word(head, kw)) {
            let mut stmt = Fragment::default();
            bind_template(&mut stmt, sql, args);
            self.statement = Statement::Other(stmt);
            return self;
        }

        let (joiner, condition) = split_condition(sql);
        let mut cond = Fragment::default();
        bind_template(&mut cond, condition, args);
        if !cond.is_empty() {
            self.add_where(joiner, cond);
        }
        self
    }

    pub(crate) fn add_where(&mut self, joiner: &str, cond: Fragment) {
        if self.where_clause.is_empty() {
            self.where_clause.push("WHERE ");
        } else {
            self.where_clause.push(" ").push(joiner).push(" ");
        }
        self.where_clause.append(cond);
    }

    /// Validate a comparison operator; unknown ones record an error and fall back to `=`.
    pub(crate) fn operator(&mut self, op: &str) -> String {
        let op = op.trim();
        if !self.config.sanitize_identifiers || is_valid_operator(op) {
            return op.to_string();
        }
        self.record_error(BuildError::invalid_identifier(format!("operator {op:?}")));
        "=".to_string()
    }
}

fn bind_template(out: &mut Fragment, template: &str, args: Vec<Value>) {
    let unused = out.push_template(template, args);
    if unused > 0 {
        log::unused_raw_args(unused);
    }
}
