//! Column assignments for INSERT and UPDATE.

use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::bind::BindParameterList;
use crate::fragment::Raw;
use crate::render::{encapsulate, Expr, Operand, Render};

/// A `column = value` pair, or a raw fragment when `value` is absent.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub column: Expr,
    pub value: Option<Operand>,
}

impl Assignment {
    pub fn new(column: impl Into<Expr>, value: impl Into<Operand>) -> Self {
        Self {
            column: column.into(),
            value: Some(value.into()),
        }
    }

    /// A literal fragment such as `"updated_at = NOW()"`, never bound.
    pub fn raw(fragment: impl Into<Expr>) -> Self {
        Self {
            column: fragment.into(),
            value: None,
        }
    }
}

impl<K: Into<Expr>, V: Into<Operand>> From<(K, V)> for Assignment {
    fn from((column, value): (K, V)) -> Self {
        Assignment::new(column, value)
    }
}

impl From<&str> for Assignment {
    fn from(fragment: &str) -> Self {
        Assignment::raw(fragment)
    }
}

impl From<String> for Assignment {
    fn from(fragment: String) -> Self {
        Assignment::raw(fragment)
    }
}

impl From<Raw> for Assignment {
    fn from(fragment: Raw) -> Self {
        Assignment::raw(fragment)
    }
}

/// Ordered list of assignments. Rendering is done by the insert/update wrappers.
#[derive(Debug, Clone, Default)]
pub struct Assignments {
    entries: Vec<Assignment>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a bound `column = value` pair.
    pub fn assign(&mut self, column: impl Into<Expr>, value: impl Into<Operand>) {
        self.entries.push(Assignment::new(column, value));
    }

    /// Bulk-adds pairs and raw fragments in iteration order.
    pub fn extend<I, T>(&mut self, assignments: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Assignment>,
    {
        self.entries
            .extend(assignments.into_iter().map(Into::into));
    }

    pub fn entries(&self) -> &[Assignment] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `SET`-style rendering: `a = :_h_0, b = NOW()`.
#[derive(Debug, Clone, Default)]
pub struct UpdateAssignments(Assignments);

impl UpdateAssignments {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Deref for UpdateAssignments {
    type Target = Assignments;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for UpdateAssignments {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Assignments> for UpdateAssignments {
    fn from(assignments: Assignments) -> Self {
        Self(assignments)
    }
}

impl Render for UpdateAssignments {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let parts: Vec<String> = self
            .entries()
            .iter()
            .filter_map(|entry| {
                let column = entry.column.render(binds, false)?;
                match &entry.value {
                    Some(value) => {
                        let value = value.render(binds, true)?;
                        Some(format!("{} = {}", column, value))
                    }
                    None => Some(column),
                }
            })
            .collect();
        self::encapsulate(Some(parts.join(", ")), encapsulate)
    }
}

/// `( a, b ) VALUES ( :_h_0, NOW() )` rendering.
#[derive(Debug, Clone, Default)]
pub struct InsertAssignments(Assignments);

impl InsertAssignments {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Deref for InsertAssignments {
    type Target = Assignments;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for InsertAssignments {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Assignments> for InsertAssignments {
    fn from(assignments: Assignments) -> Self {
        Self(assignments)
    }
}

impl Render for InsertAssignments {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let mut columns = Vec::with_capacity(self.len());
        let mut values = Vec::with_capacity(self.len());

        for entry in self.entries() {
            let Some(column) = entry.column.render(binds, false) else {
                continue;
            };
            match &entry.value {
                Some(value) => {
                    let Some(value) = value.render(binds, true) else {
                        continue;
                    };
                    columns.push(column);
                    values.push(value);
                }
                // A raw `col = expr` fragment splits into its two halves
                None => match column.split_once('=') {
                    Some((column, value)) if !column.trim().is_empty() && !value.trim().is_empty() => {
                        columns.push(column.trim().to_string());
                        values.push(value.trim().to_string());
                    }
                    _ => {
                        warn!(fragment = %column, "Skipping insert assignment without `column = value` form");
                    }
                },
            }
        }

        if columns.is_empty() {
            return None;
        }
        let sql = format!(
            "( {} ) VALUES ( {} )",
            columns.join(", "),
            values.join(", ")
        );
        self::encapsulate(Some(sql), encapsulate)
    }
}
