use super::{Cte, QueryBuilder, Statement};
use crate::dialect::Dialect;
use crate::error::{BuildError, BuildResult};
use crate::fragment::Fragment;
use crate::ident::Ident;
use crate::sanitize::check_raw;

impl QueryBuilder {
    /// Set the target table. An empty name clears it.
    pub fn table(mut self, name: &str) -> Self {
        let name = self.ident(name);
        self.table = (!name.is_empty()).then(|| Fragment::new(name));
        self
    }

    /// Set the target table after strict validation with [`Ident::parse`].
    pub fn try_table(mut self, name: &str) -> BuildResult<Self> {
        let ident = Ident::parse(name)?;
        self.table = Some(Fragment::new(ident.to_sql(self.dialect)));
        Ok(self)
    }

    /// Use a sub-query as the table: `(<sub>) AS <alias>`.
    pub fn table_subquery(mut self, sub: QueryBuilder, alias: &str) -> Self {
        let alias = self.ident(alias);
        let body = self.splice(sub);
        let mut table = Fragment::new("(");
        table.append(body).push(") AS ").push(&alias);
        self.table = Some(table);
        self
    }

    /// `SELECT <columns> FROM <table>`; no columns selects `*`.
    ///
    /// Records [`BuildError::MissingTable`] and leaves the statement untouched
    /// when no table is set.
    pub fn select<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.select_inner(false, columns)
    }

    /// `SELECT * FROM <table>`.
    pub fn select_all(self) -> Self {
        self.select_inner(false, ["*"])
    }

    /// `SELECT DISTINCT <columns> FROM <table>`.
    pub fn select_distinct<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.select_inner(true, columns)
    }

    fn select_inner<I, S>(mut self, distinct: bool, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(from) = self.require_table() else {
            return self;
        };
        let mut columns = self.ident_list(columns);
        if columns.is_empty() {
            columns.push('*');
        }
        self.statement = Statement::Select {
            distinct,
            columns,
            from,
        };
        self
    }

    /// `SELECT TOP <n> ...` (SQL Server only).
    ///
    /// Only the SELECT head carries TOP. With an INSERT, UPDATE or DELETE
    /// staged the value is kept but not rendered.
    pub fn top(mut self, n: u64) -> Self {
        if self.require_dialect("TOP", |d| d == Dialect::SqlServer) {
            self.top = Some(n);
        }
        self
    }

    /// `INNER JOIN <table> ON <left> <op> <right>`
    pub fn join(self, table: &str, left: &str, op: &str, right: &str) -> Self {
        self.join_on("INNER JOIN", table, left, op, right)
    }

    pub fn left_join(self, table: &str, left: &str, op: &str, right: &str) -> Self {
        self.join_on("LEFT JOIN", table, left, op, right)
    }

    pub fn right_join(self, table: &str, left: &str, op: &str, right: &str) -> Self {
        self.join_on("RIGHT JOIN", table, left, op, right)
    }

    pub fn full_outer_join(self, table: &str, left: &str, op: &str, right: &str) -> Self {
        self.join_on("FULL OUTER JOIN", table, left, op, right)
    }

    /// `CROSS JOIN <table>`
    pub fn cross_join(mut self, table: &str) -> Self {
        let table = self.ident(table);
        self.joins.push(format!("CROSS JOIN {table}"));
        self
    }

    fn join_on(mut self, kind: &str, table: &str, left: &str, op: &str, right: &str) -> Self {
        let table = self.ident(table);
        let left = self.ident(left);
        let op = self.operator(op);
        let right = self.ident(right);
        self.joins.push(format!("{kind} {table} ON {left} {op} {right}"));
        self
    }

    /// `GROUP BY <columns>`; replaces any previous grouping.
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = self.ident_list(columns);
        self.group_by = (!columns.is_empty()).then(|| format!("GROUP BY {columns}"));
        self
    }

    /// `ORDER BY <columns> ASC`; replaces any previous ordering.
    pub fn order_by<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.order(columns, "ASC")
    }

    /// `ORDER BY <columns> DESC`; replaces any previous ordering.
    pub fn order_by_desc<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.order(columns, "DESC")
    }

    fn order<I, S>(mut self, columns: I, direction: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = self.ident_list(columns);
        self.order_by = (!columns.is_empty()).then(|| format!("ORDER BY {columns} {direction}"));
        self
    }

    /// `OFFSET <offset> LIMIT <count>`
    pub fn limit(mut self, offset: u64, count: u64) -> Self {
        self.limit = Some(format!("OFFSET {offset} LIMIT {count}"));
        self
    }

    /// Append `UNION <other>`. The other query's values follow this one's.
    pub fn union(self, other: QueryBuilder) -> Self {
        self.union_inner("UNION ", other)
    }

    /// Append `UNION ALL <other>`.
    pub fn union_all(self, other: QueryBuilder) -> Self {
        self.union_inner("UNION ALL ", other)
    }

    fn union_inner(mut self, keyword: &str, other: QueryBuilder) -> Self {
        let body = self.splice(other);
        let mut branch = Fragment::new(keyword);
        branch.append(body);
        self.unions.push(branch);
        self
    }

    /// Stage a `WITH <name> AS (<sub>)` prefix.
    pub fn with(self, name: &str, sub: QueryBuilder) -> Self {
        self.with_inner(name, sub, false)
    }

    /// Stage a `WITH RECURSIVE <name> AS (<sub>)` prefix.
    pub fn with_recursive(self, name: &str, sub: QueryBuilder) -> Self {
        self.with_inner(name, sub, true)
    }

    fn with_inner(mut self, name: &str, sub: QueryBuilder, recursive: bool) -> Self {
        let name = self.ident(name);
        let body = self.splice(sub);
        self.ctes.push(Cte {
            name,
            recursive,
            body,
        });
        self
    }

    /// Row lock hint (`FOR UPDATE`, `FOR SHARE SKIP LOCKED`, ...), rendered last.
    pub fn lock(mut self, clause: &str) -> Self {
        let clause = clause.trim();
        if let Err(reason) = check_raw(clause) {
            self.record_error(BuildError::raw_rejected(reason));
            return self;
        }
        self.lock = (!clause.is_empty()).then(|| clause.to_string());
        self
    }
}
