//! Bound values and WHERE operands.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::builder::QueryBuilder;
use crate::dialect::Dialect;
use crate::sanitize::quote_string;

/// A value bound as a query parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Date(NaiveDate),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render this value as a SQL literal for inline output.
    ///
    /// Strings go through [`quote_string`]; this is best-effort and only
    /// meant for display. Use bound parameters for execution.
    pub fn to_sql_literal(&self, dialect: Dialect) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Bool(b) => dialect.bool_literal(*b).to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) if f.is_finite() => f.to_string(),
            Self::Float(_) => "NULL".to_string(),
            Self::Text(s) => quote_string(s),
            Self::Timestamp(ts) => format!("'{ts}'"),
            Self::TimestampTz(ts) => format!("'{}'", ts.to_rfc3339()),
            Self::Date(d) => format!("'{d}'"),
            Self::Uuid(u) => format!("'{u}'"),
            Self::Json(v) => quote_string(&v.to_string()),
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => |$v:ident| $conv:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $conv
                }
            }

            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_from_value! {
    bool => |v| Value::Bool(v),
    i8 => |v| Value::Int(v.into()),
    i16 => |v| Value::Int(v.into()),
    i32 => |v| Value::Int(v.into()),
    i64 => |v| Value::Int(v),
    u8 => |v| Value::Int(v.into()),
    u16 => |v| Value::Int(v.into()),
    u32 => |v| Value::Int(v.into()),
    f32 => |v| Value::Float(v.into()),
    f64 => |v| Value::Float(v),
    &str => |v| Value::Text(v.to_string()),
    String => |v| Value::Text(v),
    &String => |v| Value::Text(v.clone()),
    NaiveDateTime => |v| Value::Timestamp(v),
    DateTime<Utc> => |v| Value::TimestampTz(v),
    NaiveDate => |v| Value::Date(v),
    Uuid => |v| Value::Uuid(v),
    serde_json::Value => |v| Value::Json(v),
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Right-hand side of a WHERE condition: a bound value or a nested query.
#[derive(Debug, Clone)]
pub enum Arg {
    Value(Value),
    SubQuery(Box<QueryBuilder>),
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        Arg::Value(v.into())
    }
}

impl From<QueryBuilder> for Arg {
    fn from(q: QueryBuilder) -> Self {
        Arg::SubQuery(Box::new(q))
    }
}
