//! `tokio-postgres` parameter bridge.
//!
//! Lets a [`PreparedQuery`](crate::PreparedQuery) built for
//! [`Dialect::Postgres`](crate::Dialect::Postgres) be passed straight to a
//! client via [`params_ref`](crate::PreparedQuery::params_ref).

use std::error::Error;

use bytes::BytesMut;
use tokio_postgres::types::{IsNull, ToSql, Type};

use crate::value::Value;

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => b.to_sql_checked(ty, out),
            // Integers are stored as i64; narrow to the column's width.
            Value::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql_checked(ty, out),
                _ => i.to_sql_checked(ty, out),
            },
            Value::Float(f) => match *ty {
                // Rounds to the nearest f32; magnitudes past f32::MAX are refused.
                Type::FLOAT4 => {
                    if f.is_finite() && f.abs() > f64::from(f32::MAX) {
                        return Err(format!("{f} is out of range for FLOAT4").into());
                    }
                    (*f as f32).to_sql_checked(ty, out)
                }
                _ => f.to_sql_checked(ty, out),
            },
            Value::Text(s) => s.to_sql_checked(ty, out),
            Value::Timestamp(ts) => ts.to_sql_checked(ty, out),
            Value::TimestampTz(ts) => ts.to_sql_checked(ty, out),
            Value::Date(d) => d.to_sql_checked(ty, out),
            Value::Uuid(u) => u.to_sql_checked(ty, out),
            Value::Json(v) => v.to_sql_checked(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        // Each variant checks its own type in `to_sql`.
        true
    }

    tokio_postgres::types::to_sql_checked!();
}
