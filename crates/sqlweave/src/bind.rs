//! Named bind parameters.
//!
//! Every top-level statement renders into one [`BindParameterList`]. Nested
//! statements, raw fragments and deferred closures all push into that same
//! list, so a placeholder emitted anywhere in the tree resolves against a
//! single name -> value mapping.

use std::collections::HashMap;

use tracing::warn;

use crate::value::{SqlType, Value};

/// Prefix of generated parameter names.
pub const GENERATED_PREFIX: &str = "_h_";

/// A single named value bound to a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BindParameter {
    name: String,
    value: Value,
    sql_type: Option<SqlType>,
}

impl BindParameter {
    pub fn new(name: impl Into<String>, value: impl Into<Value>, sql_type: Option<SqlType>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            sql_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn sql_type(&self) -> Option<SqlType> {
        self.sql_type
    }

    /// The token that stands for this parameter in SQL text.
    pub fn placeholder(&self) -> String {
        format!(":{}", self.name)
    }
}

/// Insertion-ordered collection of uniquely named bind parameters.
#[derive(Debug, Clone, Default)]
pub struct BindParameterList {
    params: Vec<BindParameter>,
    index: HashMap<String, usize>,
    counter: usize,
}

impl BindParameterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&BindParameter> {
        self.index.get(name).map(|&i| &self.params[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &BindParameter> {
        self.params.iter()
    }

    /// Binds `value` under a freshly generated name and returns the parameter.
    pub fn add(&mut self, value: impl Into<Value>) -> &BindParameter {
        self.add_typed(value, None)
    }

    /// Like [`add`](Self::add), with an explicit type tag.
    pub fn add_typed(&mut self, value: impl Into<Value>, sql_type: Option<SqlType>) -> &BindParameter {
        let name = self.next_name();
        self.push(BindParameter::new(name, value, sql_type))
    }

    /// Binds `value` under `name`.
    ///
    /// Re-binding an existing name replaces its value in place, keeping its
    /// original position.
    pub fn add_named(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
        sql_type: Option<SqlType>,
    ) -> &BindParameter {
        let param = BindParameter::new(name, value, sql_type);
        if let Some(&i) = self.index.get(param.name()) {
            self.params[i] = param;
            return &self.params[i];
        }
        self.push(param)
    }

    /// Re-inserts an existing parameter under its stored name.
    ///
    /// The same name carrying the same value is accepted as a no-op, which
    /// keeps repeated renders of a pre-seeded statement idempotent. A name
    /// already holding a different value is a programming error: the first
    /// binding is kept.
    pub fn add_parameter(&mut self, param: &BindParameter) {
        if let Some(existing) = self.get(param.name()) {
            let same = existing.value() == param.value() && existing.sql_type() == param.sql_type();
            debug_assert!(same, "bind parameter :{} bound twice", param.name());
            if !same {
                warn!(
                    name = %param.name(),
                    kept = ?existing.value(),
                    dropped = ?param.value(),
                    "Bind parameter name collision"
                );
            }
            return;
        }
        self.push(param.clone());
    }

    /// Appends every entry of `other`, preserving names.
    pub fn merge(&mut self, other: &BindParameterList) {
        for param in other.iter() {
            self.add_parameter(param);
        }
    }

    /// Name -> value pairs in insertion order, as handed to the executor.
    pub fn to_ordered_values(&self) -> Vec<(String, Value)> {
        self.params
            .iter()
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect()
    }

    /// Values in insertion order.
    pub fn values(&self) -> Vec<Value> {
        self.params.iter().map(|p| p.value.clone()).collect()
    }

    fn next_name(&mut self) -> String {
        loop {
            let name = format!("{}{}", GENERATED_PREFIX, self.counter);
            self.counter += 1;
            if !self.index.contains_key(&name) {
                return name;
            }
        }
    }

    fn push(&mut self, param: BindParameter) -> &BindParameter {
        let i = self.params.len();
        self.index.insert(param.name.clone(), i);
        self.params.push(param);
        &self.params[i]
    }
}
