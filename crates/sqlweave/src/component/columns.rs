//! SELECT column list.

use crate::bind::BindParameterList;
use crate::render::{encapsulate, Expr, Render};

#[derive(Debug, Clone)]
pub struct Column {
    pub expr: Expr,
    pub alias: Option<String>,
}

/// Comma-separated `expr [AS alias]` list. Empty renders `None`, which the
/// owning statement turns into `*`.
#[derive(Debug, Clone, Default)]
pub struct Columns {
    entries: Vec<Column>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, expr: impl Into<Expr>, alias: Option<&str>) {
        self.entries.push(Column {
            expr: expr.into(),
            alias: alias.map(str::to_string),
        });
    }

    pub fn entries(&self) -> &[Column] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Render for Columns {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let parts: Vec<String> = self
            .entries
            .iter()
            .filter_map(|column| {
                // Only subqueries need parentheses in a select list
                let sql = column.expr.render(binds, column.expr.is_query())?;
                Some(match &column.alias {
                    Some(alias) => format!("{} AS {}", sql, alias),
                    None => sql,
                })
            })
            .collect();
        if parts.is_empty() {
            return None;
        }
        self::encapsulate(Some(parts.join(", ")), encapsulate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Raw;

    #[test]
    fn test_empty_columns_render_nothing() {
        assert!(Columns::new().to_sql().is_none());
    }

    #[test]
    fn test_columns_with_aliases() {
        let mut columns = Columns::new();
        columns.add("id", None);
        columns.add("name", Some("n"));
        columns.add(Raw::new("COUNT(*)"), Some("total"));
        let (sql, _) = columns.to_sql().unwrap();
        assert_eq!(sql, "id, name AS n, COUNT(*) AS total");
    }
}
