//! Error types for querykit

use thiserror::Error;

/// Result type alias for fallible builder operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors recorded while assembling a query.
///
/// The builder never aborts a chain on error. The first error is kept and
/// exposed through [`QueryBuilder::last_error`](crate::QueryBuilder::last_error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A statement needs a target table but none was set
    #[error("table name is required")]
    MissingTable,

    /// A clause was used with a dialect that does not support it
    #[error("{feature} is not supported by the {dialect} dialect")]
    UnsupportedDialectFeature {
        feature: &'static str,
        dialect: &'static str,
    },

    /// Raw SQL contained a statement separator or a denied keyword
    #[error("raw SQL rejected: {0}")]
    RawSqlRejected(String),

    /// Strict identifier validation failed
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A statement or clause that assigns values was given none
    #[error("{0} requires at least one value")]
    EmptyValues(&'static str),

    /// Dialect name could not be parsed
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),
}

impl BuildError {
    /// Create an unsupported-feature error for a dialect
    pub fn unsupported(feature: &'static str, dialect: crate::Dialect) -> Self {
        Self::UnsupportedDialectFeature {
            feature,
            dialect: dialect.name(),
        }
    }

    /// Create a raw SQL rejection error
    pub fn raw_rejected(reason: impl Into<String>) -> Self {
        Self::RawSqlRejected(reason.into())
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dialect;

    #[test]
    fn missing_table_message() {
        assert_eq!(BuildError::MissingTable.to_string(), "table name is required");
    }

    #[test]
    fn empty_values_names_the_clause() {
        assert_eq!(
            BuildError::EmptyValues("UPDATE").to_string(),
            "UPDATE requires at least one value"
        );
    }

    #[test]
    fn unsupported_names_the_dialect() {
        let err = BuildError::unsupported("TOP", Dialect::MySql);
        assert_eq!(err.to_string(), "TOP is not supported by the mysql dialect");
    }
}
