//! `tracing` events emitted by the builder.
//!
//! - `querykit`: warnings (first recorded error, unused raw arguments)
//! - `querykit.sql`: debug event per build when [`BuilderConfig::trace_sql`] is set
//!
//! Bound values are never logged, only their count.

use crate::config::BuilderConfig;
use crate::error::BuildError;
use crate::prepared::PreparedQuery;

/// Truncate a SQL string to at most `max_bytes` bytes on a UTF-8 boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn truncate_sql(config: &BuilderConfig, sql: &str) -> String {
    match config.max_sql_log_length {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

pub(crate) fn trace_build(config: &BuilderConfig, query: &PreparedQuery) {
    if !config.trace_sql {
        return;
    }
    let sql = truncate_sql(config, query.sql());
    tracing::debug!(
        target: "querykit.sql",
        dialect = %query.dialect(),
        param_count = query.param_count(),
        sql = %sql,
    );
}

pub(crate) fn error_recorded(error: &BuildError) {
    tracing::warn!(target: "querykit", error = %error, "query builder error recorded");
}

pub(crate) fn unused_raw_args(count: usize) {
    tracing::warn!(
        target: "querykit",
        unused = count,
        "raw SQL has fewer `?` placeholders than arguments; extra arguments dropped"
    );
}
