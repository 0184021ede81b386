//! JOIN clauses.

use crate::bind::BindParameterList;
use crate::render::{encapsulate, Expr, Render};

/// Type of SQL JOIN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// INNER JOIN
    Inner,
    /// LEFT JOIN
    Left,
    /// RIGHT JOIN
    Right,
}

impl JoinKind {
    /// Returns the SQL JOIN type string.
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

#[derive(Debug, Clone)]
enum JoinOnPart {
    Raw(Expr),
    Eq(Expr, Expr),
}

/// ON condition of a join.
///
/// Both sides of every comparison render unbound: a join compares columns,
/// not values. A raw fragment may still carry its own explicit binds.
#[derive(Debug, Clone, Default)]
pub struct JoinOn {
    parts: Vec<JoinOnPart>,
}

impl JoinOn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a verbatim fragment.
    pub fn raw(mut self, fragment: impl Into<Expr>) -> Self {
        self.parts.push(JoinOnPart::Raw(fragment.into()));
        self
    }

    /// Adds a `left = right` column comparison.
    pub fn eq(mut self, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        self.parts.push(JoinOnPart::Eq(left.into(), right.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl Render for JoinOn {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let parts: Vec<String> = self
            .parts
            .iter()
            .filter_map(|part| match part {
                JoinOnPart::Raw(fragment) => fragment.render(binds, false),
                JoinOnPart::Eq(left, right) => {
                    let left = left.render(binds, true)?;
                    let right = right.render(binds, true)?;
                    Some(format!("{} = {}", left, right))
                }
            })
            .collect();
        self::encapsulate(Some(parts.join(" AND ")), encapsulate)
    }
}

impl From<&str> for JoinOn {
    fn from(fragment: &str) -> Self {
        JoinOn::new().raw(fragment)
    }
}

impl From<String> for JoinOn {
    fn from(fragment: String) -> Self {
        JoinOn::new().raw(fragment)
    }
}

impl From<Expr> for JoinOn {
    fn from(fragment: Expr) -> Self {
        JoinOn::new().raw(fragment)
    }
}

impl From<crate::fragment::Raw> for JoinOn {
    fn from(fragment: crate::fragment::Raw) -> Self {
        JoinOn::new().raw(fragment)
    }
}

impl<L: Into<Expr>, R: Into<Expr>> From<(L, R)> for JoinOn {
    fn from((left, right): (L, R)) -> Self {
        JoinOn::new().eq(left, right)
    }
}

/// Represents a JOIN clause entry
#[derive(Debug, Clone)]
pub struct JoinEntry {
    pub kind: JoinKind,
    pub table: Expr,
    pub alias: Option<String>,
    pub condition: Option<JoinOn>,
}

/// Space-separated `KIND JOIN table [AS alias] [ON ( condition )]` list.
#[derive(Debug, Clone, Default)]
pub struct Join {
    entries: Vec<JoinEntry>,
}

impl Join {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        kind: JoinKind,
        table: impl Into<Expr>,
        alias: Option<&str>,
        condition: Option<JoinOn>,
    ) {
        self.entries.push(JoinEntry {
            kind,
            table: table.into(),
            alias: alias.map(str::to_string),
            condition,
        });
    }

    pub fn entries(&self) -> &[JoinEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Render for Join {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let parts: Vec<String> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let table = entry.table.render(binds, entry.table.is_query())?;
                let mut sql = format!("{} {}", entry.kind.to_sql(), table);
                if let Some(alias) = &entry.alias {
                    sql.push_str(" AS ");
                    sql.push_str(alias);
                }
                if let Some(on) = entry.condition.as_ref().and_then(|on| on.render(binds, true)) {
                    sql.push_str(" ON ");
                    sql.push_str(&on);
                }
                Some(sql)
            })
            .collect();
        if parts.is_empty() {
            return None;
        }
        self::encapsulate(Some(parts.join(" ")), encapsulate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Raw;

    #[test]
    fn test_join_with_column_pairs() {
        let mut join = Join::new();
        join.add(
            JoinKind::Left,
            "orders",
            Some("o"),
            Some(JoinOn::new().eq("o.user_id", "u.id").eq("o.shop_id", "u.shop_id")),
        );
        let (sql, binds) = join.to_sql().unwrap();
        assert_eq!(
            sql,
            "LEFT JOIN orders AS o ON ( o.user_id = u.id AND o.shop_id = u.shop_id )"
        );
        assert!(binds.is_empty());
    }

    #[test]
    fn test_join_with_raw_condition_and_binds() {
        let mut join = Join::new();
        join.add(
            JoinKind::Inner,
            "roles",
            None,
            Some(JoinOn::from(Raw::new("roles.name = :role").bind("role", "admin"))),
        );
        let (sql, binds) = join.to_sql().unwrap();
        assert_eq!(sql, "INNER JOIN roles ON ( roles.name = :role )");
        assert_eq!(binds.len(), 1);
    }

    #[test]
    fn test_joins_are_space_separated() {
        let mut join = Join::new();
        join.add(JoinKind::Inner, "a", None, Some(("a.id", "t.a_id").into()));
        join.add(JoinKind::Right, "b", None, None);
        assert_eq!(
            join.to_sql().unwrap().0,
            "INNER JOIN a ON ( a.id = t.a_id ) RIGHT JOIN b"
        );
    }

    #[test]
    fn test_mixed_raw_and_pairs() {
        let on = JoinOn::new().raw("p.active = 1").eq("p.id", "t.p_id");
        let mut binds = BindParameterList::new();
        assert_eq!(
            on.render(&mut binds, false).as_deref(),
            Some("p.active = 1 AND p.id = t.p_id")
        );
    }
}
