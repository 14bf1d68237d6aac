//! Conversions between core parameter values and SQLite values.
//!
//! Timestamps are stored as RFC 3339 strings in UTC with millisecond
//! precision, which keeps them ordered and lossless for epoch-ms input.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Value as SqlValue, ValueRef};
use sparkify_core::{StatementName, row::Value};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Millis, true) }

// ─── Value ───────────────────────────────────────────────────────────────────

pub fn encode_value(v: &Value) -> SqlValue {
  match v {
    Value::Null => SqlValue::Null,
    Value::Integer(n) => SqlValue::Integer(*n),
    Value::Real(x) => SqlValue::Real(*x),
    Value::Text(s) => SqlValue::Text(s.clone()),
    Value::Timestamp(dt) => SqlValue::Text(encode_dt(*dt)),
  }
}

/// Read one result column back into a core value. Blobs are never produced
/// by the schema and are rejected.
pub fn decode_column(statement: StatementName, v: ValueRef<'_>) -> Result<Value> {
  Ok(match v {
    ValueRef::Null => Value::Null,
    ValueRef::Integer(n) => Value::Integer(n),
    ValueRef::Real(x) => Value::Real(x),
    ValueRef::Text(bytes) => Value::Text(
      std::str::from_utf8(bytes)
        .map_err(rusqlite::Error::Utf8Error)?
        .to_owned(),
    ),
    ValueRef::Blob(_) => {
      return Err(Error::UnexpectedColumn {
        statement,
        kind: v.data_type(),
      });
    }
  })
}
