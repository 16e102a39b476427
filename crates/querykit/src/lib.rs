//! # querykit
//!
//! A fluent SQL query builder for Postgres, MySQL, SQLite, SQL Server and Oracle.
//!
//! ## Features
//!
//! - **Clause slots**: every method fills one clause; clauses render in a fixed order
//! - **Dialect placeholders**: `$1`, `?`, `@1` or `:1`, numbered once at build time
//! - **Nested queries**: sub-queries in WHERE, IN, EXISTS, WITH, FROM and UNION fold
//!   their values into the parent in order
//! - **Sticky errors**: the first error is kept; the chain never breaks
//! - **Inline rendering**: literal-value SQL for logs and debugging
//!
//! The builder never talks to a database. It produces SQL text plus an ordered
//! list of [`Value`]s for whatever driver executes it.
//!
//! ```
//! use querykit::{Dialect, QueryBuilder, Value};
//!
//! let q = QueryBuilder::new(Dialect::Postgres)
//!     .table("users")
//!     .create([("lastname", "GENEZ"), ("firstname", "Mesut")])
//!     .build();
//!
//! assert_eq!(q.sql(), "INSERT INTO users (firstname, lastname) VALUES ($1, $2)");
//! assert_eq!(q.params(), &[Value::from("Mesut"), Value::from("GENEZ")]);
//! assert_eq!(
//!     q.inline(),
//!     "INSERT INTO users (firstname, lastname) VALUES ('Mesut', 'GENEZ')"
//! );
//! ```
//!
//! ## Safety
//!
//! Bound parameters ([`QueryBuilder::build`]) are the only sound defense against
//! injection. Identifier sanitization and inline literal escaping are
//! best-effort heuristics; inline output is for display, not execution.

mod builder;
pub mod config;
pub mod dialect;
pub mod error;
pub mod ident;
mod fragment;
mod log;
#[cfg(feature = "postgres")]
mod pg;
pub mod prepared;
pub mod sanitize;
pub mod value;

pub use builder::{QueryBuilder, builder};
pub use config::BuilderConfig;
pub use dialect::Dialect;
pub use error::{BuildError, BuildResult};
pub use ident::{Ident, IdentPart};
pub use prepared::PreparedQuery;
pub use value::{Arg, Value};
