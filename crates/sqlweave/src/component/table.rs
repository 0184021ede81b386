//! FROM / statement target list.

use crate::bind::BindParameterList;
use crate::render::{encapsulate, Expr, Render};

#[derive(Debug, Clone)]
pub struct TableEntry {
    pub expr: Expr,
    pub alias: Option<String>,
}

/// Comma-separated `table [AS alias]` list.
///
/// INSERT and DELETE targets do not accept an alias in this grammar, so their
/// statements switch `use_alias` off and aliases are dropped at render time.
#[derive(Debug, Clone)]
pub struct Table {
    entries: Vec<TableEntry>,
    use_alias: bool,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            use_alias: true,
        }
    }
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// A target list that never renders aliases.
    pub fn without_alias() -> Self {
        Self {
            entries: Vec::new(),
            use_alias: false,
        }
    }

    pub fn add(&mut self, expr: impl Into<Expr>, alias: Option<&str>) {
        self.entries.push(TableEntry {
            expr: expr.into(),
            alias: alias.map(str::to_string),
        });
    }

    pub fn set_use_alias(&mut self, use_alias: bool) {
        self.use_alias = use_alias;
    }

    pub fn uses_alias(&self) -> bool {
        self.use_alias
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Render for Table {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let parts: Vec<String> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let sql = entry.expr.render(binds, entry.expr.is_query())?;
                Some(match &entry.alias {
                    Some(alias) if self.use_alias => format!("{} AS {}", sql, alias),
                    _ => sql,
                })
            })
            .collect();
        if parts.is_empty() {
            return None;
        }
        self::encapsulate(Some(parts.join(", ")), encapsulate)
    }
}
