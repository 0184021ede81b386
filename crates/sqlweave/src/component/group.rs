//! GROUP BY clause.

use crate::bind::BindParameterList;
use crate::render::{encapsulate, Expr, Render};

#[derive(Debug, Clone, Default)]
pub struct Group {
    columns: Vec<Expr>,
    with_rollup: bool,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, expr: impl Into<Expr>) {
        self.columns.push(expr.into());
    }

    pub fn set_with_rollup(&mut self, with_rollup: bool) {
        self.with_rollup = with_rollup;
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Render for Group {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let parts: Vec<String> = self
            .columns
            .iter()
            .filter_map(|column| column.render(binds, column.is_query()))
            .collect();
        if parts.is_empty() {
            return None;
        }
        let mut sql = format!("GROUP BY {}", parts.join(", "));
        if self.with_rollup {
            sql.push_str(" WITH ROLLUP");
        }
        self::encapsulate(Some(sql), encapsulate)
    }
}
