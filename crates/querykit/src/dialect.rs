//! SQL dialects and their placeholder syntax.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Target SQL flavor.
///
/// The dialect decides how bound parameters are written (`$1`, `?`, `:1`,
/// `@1`) and which dialect-specific clauses are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `$1, $2, ...`
    #[default]
    Postgres,
    /// `?`
    MySql,
    /// `?`
    Sqlite,
    /// `@1, @2, ...`
    SqlServer,
    /// `:1, :2, ...`
    Oracle,
}

impl Dialect {
    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
            Self::SqlServer => "sqlserver",
            Self::Oracle => "oracle",
        }
    }

    /// Placeholder prefix character.
    pub const fn placeholder_prefix(self) -> char {
        match self {
            Self::Postgres => '$',
            Self::MySql | Self::Sqlite => '?',
            Self::SqlServer => '@',
            Self::Oracle => ':',
        }
    }

    /// Whether placeholders carry a 1-based index.
    pub const fn is_numbered(self) -> bool {
        !matches!(self, Self::MySql | Self::Sqlite)
    }

    /// Whether `INSERT ... RETURNING` is available.
    pub const fn supports_returning(self) -> bool {
        matches!(self, Self::Postgres | Self::Sqlite)
    }

    /// Write the placeholder for the 1-based parameter `index` into `out`.
    pub fn write_placeholder(self, index: usize, out: &mut String) {
        out.push(self.placeholder_prefix());
        if self.is_numbered() {
            push_usize(out, index);
        }
    }

    /// Literal used for booleans in inline rendering.
    pub(crate) const fn bool_literal(self, value: bool) -> &'static str {
        match (self, value) {
            (Self::SqlServer | Self::Oracle, true) => "1",
            (Self::SqlServer | Self::Oracle, false) => "0",
            (_, true) => "TRUE",
            (_, false) => "FALSE",
        }
    }
}

/// Write a usize as decimal digits into `out` without going through fmt.
#[inline]
fn push_usize(out: &mut String, mut n: usize) {
    if n < 10 {
        out.push((b'0' + n as u8) as char);
        return;
    }
    let mut buf = [0u8; 20];
    let mut pos = buf.len();
    while n > 0 {
        pos -= 1;
        buf[pos] = b'0' + (n % 10) as u8;
        n /= 10;
    }
    for &b in &buf[pos..] {
        out.push(b as char);
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            "sqlserver" | "mssql" => Ok(Self::SqlServer),
            "oracle" => Ok(Self::Oracle),
            _ => Err(BuildError::UnknownDialect(s.to_string())),
        }
    }
}
