use std::collections::{BTreeMap, BTreeSet};

use super::{QueryBuilder, Statement};
use crate::dialect::Dialect;
use crate::error::BuildError;
use crate::fragment::Fragment;
use crate::value::Value;

/// Collect column/value pairs keyed by column name, so output order never
/// depends on the caller's map type.
fn sorted_values<I, K, V>(values: I) -> BTreeMap<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    values
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

impl QueryBuilder {
    /// `INSERT INTO <table> (<columns>) VALUES (<values>)`, columns sorted by name.
    pub fn create<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let Some(table) = self.require_table() else {
            return self;
        };
        let values = sorted_values(values);

        let mut stmt = Fragment::new("INSERT INTO ");
        stmt.append(table);
        if values.is_empty() {
            stmt.push(" DEFAULT VALUES");
        } else {
            let columns = self.ident_list(values.keys());
            stmt.push(" (").push(&columns).push(") VALUES (");
            stmt.push_bind_list(values.into_values()).push(")");
        }
        self.statement = Statement::Other(stmt);
        self
    }

    /// Alias of [`create`](Self::create).
    pub fn insert<I, K, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.create(values)
    }

    /// Multi-row insert. Columns are the sorted union of every row's keys;
    /// a row without a column binds `NULL` for it.
    ///
    /// A single row without columns renders `DEFAULT VALUES`. No rows at all,
    /// or several rows without columns, records [`BuildError::EmptyValues`].
    pub fn create_batch<R, I, K, V>(mut self, rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let Some(table) = self.require_table() else {
            return self;
        };
        let mut rows: Vec<BTreeMap<String, Value>> = rows.into_iter().map(sorted_values).collect();
        let columns: BTreeSet<String> = rows.iter().flat_map(|r| r.keys().cloned()).collect();
        if columns.is_empty() {
            if rows.len() == 1 {
                return self.create(Vec::<(String, Value)>::new());
            }
            self.reject_statement(BuildError::EmptyValues("INSERT"));
            return self;
        }

        let mut stmt = Fragment::new("INSERT INTO ");
        stmt.append(table);
        let column_list = self.ident_list(&columns);
        stmt.push(" (").push(&column_list).push(") VALUES ");
        for (i, row) in rows.iter_mut().enumerate() {
            if i > 0 {
                stmt.push(", ");
            }
            stmt.push("(");
            stmt.push_bind_list(
                columns
                    .iter()
                    .map(|c| row.remove(c).unwrap_or(Value::Null)),
            );
            stmt.push(")");
        }
        self.statement = Statement::Other(stmt);
        self
    }

    /// `UPDATE <table> SET k1 = <p1>, k2 = <p2>, ...`, columns sorted by name.
    ///
    /// No values records [`BuildError::EmptyValues`] and stages nothing.
    pub fn update<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let Some(table) = self.require_table() else {
            return self;
        };
        let values = sorted_values(values);
        if values.is_empty() {
            self.reject_statement(BuildError::EmptyValues("UPDATE"));
            return self;
        }
        let mut stmt = Fragment::new("UPDATE ");
        stmt.append(table).push(" SET ");
        self.push_assignments(&mut stmt, values);
        self.statement = Statement::Other(stmt);
        self
    }

    /// `DELETE FROM <table>`
    pub fn delete(mut self) -> Self {
        let Some(table) = self.require_table() else {
            return self;
        };
        let mut stmt = Fragment::new("DELETE FROM ");
        stmt.append(table);
        self.statement = Statement::Other(stmt);
        self
    }

    /// `RETURNING <columns>` (Postgres and SQLite); no columns returns `*`.
    pub fn returning<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.require_dialect("RETURNING", Dialect::supports_returning) {
            return self;
        }
        let mut columns = self.ident_list(columns);
        if columns.is_empty() {
            columns.push('*');
        }
        self.returning = Some(format!("RETURNING {columns}"));
        self
    }

    /// `ON DUPLICATE KEY UPDATE k = ?, ...` (MySQL only). No values records
    /// [`BuildError::EmptyValues`] and keeps any earlier clause.
    pub fn on_duplicate_key_update<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        if !self.require_dialect("ON DUPLICATE KEY UPDATE", |d| d == Dialect::MySql) {
            return self;
        }
        let values = sorted_values(values);
        if values.is_empty() {
            self.record_error(BuildError::EmptyValues("ON DUPLICATE KEY UPDATE"));
            return self;
        }
        let mut clause = Fragment::new("ON DUPLICATE KEY UPDATE ");
        self.push_assignments(&mut clause, values);
        self.on_duplicate = clause;
        self
    }

    /// `UPDATE <table> SET <column> = <column> + <amount>`
    pub fn increment(self, column: &str, amount: i64) -> Self {
        self.step(column, '+', amount)
    }

    /// `UPDATE <table> SET <column> = <column> - <amount>`
    pub fn decrement(self, column: &str, amount: i64) -> Self {
        self.step(column, '-', amount)
    }

    fn step(mut self, column: &str, sign: char, amount: i64) -> Self {
        let Some(table) = self.require_table() else {
            return self;
        };
        let column = self.ident(column);
        let mut stmt = Fragment::new("UPDATE ");
        stmt.append(table)
            .push(&format!(" SET {column} = {column} {sign} {amount}"));
        self.statement = Statement::Other(stmt);
        self
    }

    /// `PRAGMA <name> = <value>` (SQLite only). The value keeps only
    /// `[A-Za-z0-9_-]`; an empty value renders a bare `PRAGMA <name>`.
    pub fn pragma(mut self, name: &str, value: &str) -> Self {
        if !self.require_dialect("PRAGMA", |d| d == Dialect::Sqlite) {
            return self;
        }
        let name = self.ident(name);
        let value: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        let sql = if value.is_empty() {
            format!("PRAGMA {name}")
        } else {
            format!("PRAGMA {name} = {value}")
        };
        self.statement = Statement::Other(Fragment::new(sql));
        self
    }

    fn push_assignments(&self, out: &mut Fragment, values: BTreeMap<String, Value>) {
        for (i, (column, value)) in values.into_iter().enumerate() {
            if i > 0 {
                out.push(", ");
            }
            out.push(&self.ident(&column)).push(" = ").push_bind(value);
        }
    }
}
