//! Result rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, MySql, Row as _, TypeInfo};

use crate::value::Value;
use crate::{Result, SqlWeaveError};

/// One result row: column names and values in select-list order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push(column.into());
        self.values.push(value.into());
    }

    /// Value of the first column named `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// The row as a JSON object keyed by column name.
    pub fn to_json(&self) -> Result<JsonValue> {
        let mut object = serde_json::Map::with_capacity(self.len());
        for (column, value) in self.iter() {
            object.insert(column.to_string(), serde_json::to_value(value)?);
        }
        Ok(JsonValue::Object(object))
    }

    /// Decodes a MySQL row, dispatching on each column's declared type.
    ///
    /// # Errors
    ///
    /// Returns [`SqlWeaveError::Deserialization`] if a column cannot be
    /// decoded into the matching [`Value`] variant.
    pub fn from_mysql(row: &MySqlRow) -> Result<Self> {
        let mut decoded = Row::new();

        for (idx, column) in row.columns().iter().enumerate() {
            let name = column.name();
            let type_name = column.type_info().name();

            let value = match type_name {
                "NULL" => None,
                "BOOLEAN" => decode::<bool>(row, idx, name, type_name)?.map(Value::Bool),
                "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
                    decode::<i64>(row, idx, name, type_name)?.map(Value::Int)
                }
                "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
                | "BIGINT UNSIGNED" | "BIT" => {
                    decode::<u64>(row, idx, name, type_name)?.map(Value::UInt)
                }
                "FLOAT" => decode::<f32>(row, idx, name, type_name)?.map(|v| Value::Double(v.into())),
                "DOUBLE" => decode::<f64>(row, idx, name, type_name)?.map(Value::Double),
                "DECIMAL" => decode::<Decimal>(row, idx, name, type_name)?.map(Value::Decimal),
                "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
                | "SET" => decode::<String>(row, idx, name, type_name)?.map(Value::String),
                "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB"
                | "GEOMETRY" => decode::<Vec<u8>>(row, idx, name, type_name)?.map(Value::Bytes),
                "DATE" => decode::<NaiveDate>(row, idx, name, type_name)?.map(Value::Date),
                "TIME" => decode::<NaiveTime>(row, idx, name, type_name)?.map(Value::Time),
                "DATETIME" => {
                    decode::<NaiveDateTime>(row, idx, name, type_name)?.map(Value::Timestamp)
                }
                "TIMESTAMP" => {
                    decode::<DateTime<Utc>>(row, idx, name, type_name)?.map(Value::TimestampTz)
                }
                "JSON" => decode::<JsonValue>(row, idx, name, type_name)?.map(Value::Json),
                // Unknown types: text if possible, else raw bytes
                _ => match row.try_get::<Option<String>, _>(idx) {
                    Ok(v) => v.map(Value::String),
                    Err(_) => decode::<Vec<u8>>(row, idx, name, type_name)?.map(Value::Bytes),
                },
            }
            .unwrap_or(Value::Null);

            decoded.push(name, value);
        }

        Ok(decoded)
    }
}

fn decode<'r, T>(row: &'r MySqlRow, idx: usize, column: &str, type_name: &str) -> Result<Option<T>>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get::<Option<T>, _>(idx).map_err(|e| {
        SqlWeaveError::Deserialization(format!(
            "Failed to extract {} from column '{}': {}",
            type_name, column, e
        ))
    })
}
