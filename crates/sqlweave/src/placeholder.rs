//! Named placeholder expansion.
//!
//! Statements render with `:name` placeholders; the MySQL driver only
//! understands positional `?` markers. Expansion happens right before
//! execution: every `:name` outside a quoted literal is replaced in order and
//! its value appended to the positional list, so a name used twice binds twice.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::bind::BindParameterList;
use crate::value::Value;
use crate::{Result, SqlWeaveError};

/// Quoted literals and `::` are matched first so they are copied through untouched.
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*"|`[^`]*`|::|:([A-Za-z_][A-Za-z0-9_]*)"#)
        .expect("placeholder pattern is valid")
});

/// Rewrites `:name` placeholders to `?` and returns the values in marker order.
///
/// Values tagged with a [`SqlType`](crate::value::SqlType) are coerced here.
///
/// # Errors
///
/// Returns [`SqlWeaveError::Query`] if the SQL references a name that is not
/// bound, and [`SqlWeaveError::Validation`] if a value cannot be coerced to
/// its type tag.
pub fn expand_named(sql: &str, binds: &BindParameterList) -> Result<(String, Vec<Value>)> {
    let mut values = Vec::with_capacity(binds.len());
    let mut missing = None;

    let expanded = PLACEHOLDER_REGEX.replace_all(sql, |caps: &Captures| {
        let Some(name) = caps.get(1) else {
            return caps[0].to_string();
        };
        match binds.get(name.as_str()) {
            Some(param) => {
                values.push(match param.sql_type() {
                    Some(sql_type) => param.value().coerce(sql_type),
                    None => Ok(param.value().clone()),
                });
                "?".to_string()
            }
            None => {
                missing.get_or_insert_with(|| name.as_str().to_string());
                caps[0].to_string()
            }
        }
    });

    if let Some(name) = missing {
        return Err(SqlWeaveError::Query(format!(
            "No value bound for placeholder :{}",
            name
        )));
    }
    let values = values.into_iter().collect::<Result<Vec<_>>>()?;
    Ok((expanded.into_owned(), values))
}
