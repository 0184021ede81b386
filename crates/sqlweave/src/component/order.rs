//! ORDER BY entries.

use crate::bind::BindParameterList;
use crate::render::{encapsulate, Expr, Render};

/// Sort order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order
    Asc,
    /// Descending order
    Desc,
}

impl OrderDirection {
    /// Returns the SQL order direction string.
    pub fn to_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }

    /// The opposite direction, used when walking a sort backwards.
    pub fn reversed(&self) -> Self {
        match self {
            OrderDirection::Asc => OrderDirection::Desc,
            OrderDirection::Desc => OrderDirection::Asc,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderEntry {
    pub column: Expr,
    pub direction: Option<OrderDirection>,
}

/// Comma-separated `column [ASC|DESC]` list, without the `ORDER BY` keyword.
#[derive(Debug, Clone, Default)]
pub struct Order {
    entries: Vec<OrderEntry>,
}

impl Order {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, column: impl Into<Expr>, direction: Option<OrderDirection>) {
        self.entries.push(OrderEntry {
            column: column.into(),
            direction,
        });
    }

    pub fn entries(&self) -> &[OrderEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Render for Order {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let parts: Vec<String> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let column = entry.column.render(binds, entry.column.is_query())?;
                Some(match entry.direction {
                    Some(direction) => format!("{} {}", column, direction.to_sql()),
                    None => column,
                })
            })
            .collect();
        if parts.is_empty() {
            return None;
        }
        self::encapsulate(Some(parts.join(", ")), encapsulate)
    }
}
