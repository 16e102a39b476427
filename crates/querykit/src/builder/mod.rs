//! The fluent query builder.
//!
//! A [`QueryBuilder`] keeps one slot per clause kind and assembles them in a
//! fixed order when built. Bound values stay attached to the clause that
//! bound them and are numbered once, at build time, in textual order.
//!
//! ```
//! use querykit::{Dialect, QueryBuilder};
//!
//! let q = QueryBuilder::new(Dialect::Postgres)
//!     .table("users")
//!     .select(["id", "name"])
//!     .and_where("status", "=", "active")
//!     .and_in("role", ["admin", "owner"])
//!     .order_by_desc(["created_at"])
//!     .limit(0, 20)
//!     .build();
//!
//! assert_eq!(
//!     q.sql(),
//!     "SELECT id, name FROM users WHERE status = $1 AND role IN ($2, $3) \
//!      ORDER BY created_at DESC OFFSET 0 LIMIT 20"
//! );
//! assert_eq!(q.param_count(), 3);
//! ```

mod mutation;
mod select;
mod where_clause;

#[cfg(test)]
mod tests;

use std::mem;

use crate::config::BuilderConfig;
use crate::dialect::Dialect;
use crate::error::{BuildError, BuildResult};
use crate::fragment::Fragment;
use crate::log;
use crate::prepared::PreparedQuery;
use crate::sanitize::sanitize_identifier;

/// Start building a query for `dialect`.
pub fn builder(dialect: Dialect) -> QueryBuilder {
    QueryBuilder::new(dialect)
}

#[derive(Debug, Clone, Default)]
enum Statement {
    #[default]
    Empty,
    Select {
        distinct: bool,
        columns: String,
        from: Fragment,
    },
    Other(Fragment),
}

#[derive(Debug, Clone)]
struct Cte {
    name: String,
    recursive: bool,
    body: Fragment,
}

/// Fluent, multi-dialect SQL builder.
///
/// Every method takes and returns the builder by value. Errors do not break
/// the chain: the first one is kept and can be read with
/// [`last_error`](Self::last_error) or enforced with
/// [`try_build`](Self::try_build).
#[derive(Debug, Clone)]
#[must_use]
pub struct QueryBuilder {
    dialect: Dialect,
    config: BuilderConfig,
    table: Option<Fragment>,
    ctes: Vec<Cte>,
    statement: Statement,
    top: Option<u64>,
    on_duplicate: Fragment,
    joins: Vec<String>,
    where_clause: Fragment,
    returning: Option<String>,
    group_by: Option<String>,
    having: Fragment,
    unions: Vec<Fragment>,
    order_by: Option<String>,
    limit: Option<String>,
    lock: Option<String>,
    last_error: Option<BuildError>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

impl QueryBuilder {
    /// Create an empty builder with the default [`BuilderConfig`].
    pub fn new(dialect: Dialect) -> Self {
        Self::with_config(dialect, BuilderConfig::default())
    }

    pub fn with_config(dialect: Dialect, config: BuilderConfig) -> Self {
        Self {
            dialect,
            config,
            table: None,
            ctes: Vec::new(),
            statement: Statement::Empty,
            top: None,
            on_duplicate: Fragment::default(),
            joins: Vec::new(),
            where_clause: Fragment::default(),
            returning: None,
            group_by: None,
            having: Fragment::default(),
            unions: Vec::new(),
            order_by: None,
            limit: None,
            lock: None,
            last_error: None,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// The first error recorded since construction or the last reset.
    pub fn last_error(&self) -> Option<&BuildError> {
        self.last_error.as_ref()
    }

    /// Clear all clauses and the recorded error, keeping dialect and config.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.dialect, self.config.clone());
    }

    /// Move the current query out, leaving an empty builder with the same
    /// dialect and config in its place.
    pub fn take(&mut self) -> Self {
        let fresh = Self::with_config(self.dialect, self.config.clone());
        mem::replace(self, fresh)
    }

    /// Apply `f` only when `cond` holds.
    pub fn when(self, cond: bool, f: impl FnOnce(Self) -> Self) -> Self {
        if cond { f(self) } else { self }
    }

    /// Apply `then` when `cond` holds, otherwise `otherwise`.
    pub fn when_then(
        self,
        cond: bool,
        then: impl FnOnce(Self) -> Self,
        otherwise: impl FnOnce(Self) -> Self,
    ) -> Self {
        if cond { then(self) } else { otherwise(self) }
    }

    /// Render placeholders and collect bound values.
    ///
    /// Renders even when an error was recorded; see [`try_build`](Self::try_build).
    pub fn build(self) -> PreparedQuery {
        let config = self.config.clone();
        let dialect = self.dialect;
        let query = self.into_fragment().render(dialect);
        log::trace_build(&config, &query);
        query
    }

    /// Like [`build`](Self::build), but returns the recorded error if any.
    pub fn try_build(self) -> BuildResult<PreparedQuery> {
        if let Some(err) = &self.last_error {
            return Err(err.clone());
        }
        Ok(self.build())
    }

    /// Build and inline every bound value as a literal.
    ///
    /// Inline output is for display and debugging only.
    pub fn render_inline(self) -> String {
        self.build().inline()
    }

    pub(crate) fn record_error(&mut self, err: BuildError) {
        if self.last_error.is_none() {
            log::error_recorded(&err);
            self.last_error = Some(err);
        }
    }

    /// Sanitize an identifier when the config asks for it.
    pub(crate) fn ident(&self, name: &str) -> String {
        if self.config.sanitize_identifiers {
            sanitize_identifier(name)
        } else {
            name.trim().to_string()
        }
    }

    pub(crate) fn ident_list<I, S>(&self, names: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|n| self.ident(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Turn a nested builder into a fragment, carrying over its error.
    pub(crate) fn splice(&mut self, sub: QueryBuilder) -> Fragment {
        if let Some(err) = sub.last_error.clone() {
            self.record_error(err);
        }
        sub.into_fragment()
    }

    pub(crate) fn require_table(&mut self) -> Option<Fragment> {
        if self.table.is_none() {
            self.record_error(BuildError::MissingTable);
        }
        self.table.clone()
    }

    /// Record `err` for a statement that could not be staged. An empty slot is
    /// blocked so the implicit `SELECT * FROM <table>` does not stand in for it.
    pub(crate) fn reject_statement(&mut self, err: BuildError) {
        self.record_error(err);
        if matches!(self.statement, Statement::Empty) {
            self.statement = Statement::Other(Fragment::default());
        }
    }

    pub(crate) fn require_dialect(
        &mut self,
        feature: &'static str,
        allowed: impl Fn(Dialect) -> bool,
    ) -> bool {
        if allowed(self.dialect) {
            true
        } else {
            self.record_error(BuildError::unsupported(feature, self.dialect));
            false
        }
    }

    fn select_head(&self, distinct: bool) -> String {
        let mut head = String::from(if distinct { "SELECT DISTINCT" } else { "SELECT" });
        if let Some(n) = self.top {
            head.push_str(" TOP ");
            head.push_str(&n.to_string());
        }
        head
    }

    fn into_fragment(mut self) -> Fragment {
        let mut out = Fragment::default();

        if !self.ctes.is_empty() {
            let recursive = self.ctes.iter().any(|c| c.recursive);
            let mut with = Fragment::new(if recursive { "WITH RECURSIVE " } else { "WITH " });
            for (i, cte) in mem::take(&mut self.ctes).into_iter().enumerate() {
                if i > 0 {
                    with.push(", ");
                }
                with.push(&cte.name).push(" AS (").append(cte.body);
                with.push(")");
            }
            push_clause(&mut out, with);
        }

        match mem::take(&mut self.statement) {
            Statement::Select {
                distinct,
                columns,
                from,
            } => {
                let mut select = Fragment::new(self.select_head(distinct));
                select.push(" ").push(&columns).push(" FROM ").append(from);
                push_clause(&mut out, select);
            }
            Statement::Other(stmt) => push_clause(&mut out, stmt),
            Statement::Empty => {
                if let Some(table) = self.table.take() {
                    let mut select = Fragment::new(self.select_head(false));
                    select.push(" * FROM ").append(table);
                    push_clause(&mut out, select);
                }
            }
        }

        push_clause(&mut out, self.on_duplicate);
        for join in &self.joins {
            push_clause(&mut out, Fragment::new(join.as_str()));
        }
        push_clause(&mut out, self.where_clause);
        push_text(&mut out, self.returning);
        push_text(&mut out, self.group_by);
        push_clause(&mut out, self.having);
        for union in self.unions {
            push_clause(&mut out, union);
        }
        push_text(&mut out, self.order_by);
        push_text(&mut out, self.limit);
        push_text(&mut out, self.lock);
        out
    }
}

fn push_clause(out: &mut Fragment, clause: Fragment) {
    if clause.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push(" ");
    }
    out.append(clause);
}

fn push_text(out: &mut Fragment, clause: Option<String>) {
    if let Some(text) = clause {
        push_clause(out, Fragment::new(text));
    }
}
