//! Bindable values and their MySQL type mapping.
//!
//! `Value` is what ends up on the right-hand side of a bind parameter. The
//! conversion into driver arguments happens entirely at the executor
//! boundary so that rendering never touches the driver.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::mysql::MySqlArguments;
use sqlx::Arguments;
use uuid::Uuid;

use crate::{Result, SqlWeaveError};

/// A scalar value that can be bound to a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean (TINYINT(1))
    Bool(bool),
    /// Signed integer (BIGINT)
    Int(i64),
    /// Unsigned integer (BIGINT UNSIGNED)
    UInt(u64),
    /// Double-precision float (DOUBLE)
    Double(f64),
    /// Variable-length string (VARCHAR, TEXT)
    String(String),
    /// Binary data (BLOB, VARBINARY)
    Bytes(Vec<u8>),
    /// Decimal (DECIMAL, NUMERIC)
    Decimal(Decimal),
    /// UUID, bound in its hyphenated text form
    Uuid(Uuid),
    /// Date (DATE)
    Date(NaiveDate),
    /// Time (TIME)
    Time(NaiveTime),
    /// Timestamp without timezone (DATETIME)
    Timestamp(NaiveDateTime),
    /// Timestamp in UTC (TIMESTAMP)
    TimestampTz(DateTime<Utc>),
    /// JSON document (JSON)
    Json(JsonValue),
}

/// Optional type tag carried by a bind parameter.
///
/// When present it coerces the value at bind time instead of letting the
/// value's own variant decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Null,
    Bool,
    Int,
    Str,
    /// Large object, bound as raw bytes
    Lob,
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the MySQL type name for this value.
    pub fn sql_type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::Int(_) => "BIGINT",
            Value::UInt(_) => "BIGINT UNSIGNED",
            Value::Double(_) => "DOUBLE",
            Value::String(_) => "TEXT",
            Value::Bytes(_) => "BLOB",
            Value::Decimal(_) => "DECIMAL",
            Value::Uuid(_) => "CHAR(36)",
            Value::Date(_) => "DATE",
            Value::Time(_) => "TIME",
            Value::Timestamp(_) => "DATETIME",
            Value::TimestampTz(_) => "TIMESTAMP",
            Value::Json(_) => "JSON",
        }
    }

    /// Textual form used when a value is coerced to [`SqlType::Str`].
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(v) => Some(if *v { "1" } else { "0" }.to_string()),
            Value::Int(v) => Some(v.to_string()),
            Value::UInt(v) => Some(v.to_string()),
            Value::Double(v) => Some(v.to_string()),
            Value::String(v) => Some(v.clone()),
            Value::Bytes(v) => Some(String::from_utf8_lossy(v).into_owned()),
            Value::Decimal(v) => Some(v.to_string()),
            Value::Uuid(v) => Some(v.hyphenated().to_string()),
            Value::Date(v) => Some(v.to_string()),
            Value::Time(v) => Some(v.to_string()),
            Value::Timestamp(v) => Some(v.to_string()),
            Value::TimestampTz(v) => Some(v.to_rfc3339()),
            Value::Json(v) => Some(v.to_string()),
        }
    }

    /// Applies an explicit type tag, returning the value that will actually be bound.
    pub fn coerce(&self, sql_type: SqlType) -> Result<Value> {
        let coerced = match (sql_type, self) {
            (_, Value::Null) | (SqlType::Null, _) => Value::Null,
            (SqlType::Bool, Value::Bool(v)) => Value::Bool(*v),
            (SqlType::Bool, Value::Int(v)) => Value::Bool(*v != 0),
            (SqlType::Bool, Value::UInt(v)) => Value::Bool(*v != 0),
            (SqlType::Int, Value::Int(v)) => Value::Int(*v),
            (SqlType::Int, Value::UInt(v)) => Value::UInt(*v),
            (SqlType::Int, Value::Bool(v)) => Value::Int(i64::from(*v)),
            (SqlType::Int, Value::String(v)) => v.trim().parse::<i64>().map(Value::Int).map_err(|e| {
                SqlWeaveError::Validation(format!("Cannot bind '{}' as INT: {}", v, e))
            })?,
            (SqlType::Str, other) => Value::String(other.to_text().unwrap_or_default()),
            (SqlType::Lob, Value::Bytes(v)) => Value::Bytes(v.clone()),
            (SqlType::Lob, other) => Value::Bytes(other.to_text().unwrap_or_default().into_bytes()),
            (tag, other) => {
                return Err(SqlWeaveError::Validation(format!(
                    "Cannot bind {} value as {:?}",
                    other.sql_type_name(),
                    tag
                )))
            }
        };
        Ok(coerced)
    }

    /// Bind this value to a sqlx MySQL argument list.
    pub fn bind_to_arguments(&self, arguments: &mut MySqlArguments) -> Result<()> {
        let bound = match self {
            Value::Null => arguments.add(Option::<String>::None),
            Value::Bool(v) => arguments.add(*v),
            Value::Int(v) => arguments.add(*v),
            Value::UInt(v) => arguments.add(*v),
            Value::Double(v) => arguments.add(*v),
            Value::String(v) => arguments.add(v.clone()),
            Value::Bytes(v) => arguments.add(v.clone()),
            Value::Decimal(v) => arguments.add(*v),
            Value::Uuid(v) => arguments.add(v.hyphenated().to_string()),
            Value::Date(v) => arguments.add(*v),
            Value::Time(v) => arguments.add(*v),
            Value::Timestamp(v) => arguments.add(*v),
            Value::TimestampTz(v) => arguments.add(*v),
            Value::Json(v) => arguments.add(sqlx::types::Json(v.clone())),
        };
        bound.map_err(|e| {
            SqlWeaveError::Query(format!("Failed to bind {}: {}", self.sql_type_name(), e))
        })
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_value_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    f32 => Double,
    f64 => Double,
    String => String,
    Decimal => Decimal,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => Timestamp,
    DateTime<Utc> => TimestampTz,
    JsonValue => Json,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt(v as u64)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
